//! Resource discovery
//!
//! Lists every resource kind the diagram needs, one typed API call per kind,
//! and materializes the results into an [`ObjectStore`] before any graph
//! construction begins. Calls run sequentially; the first failing list aborts
//! the whole pass so a diagram is never built from a partial snapshot.

pub mod convert;

pub use convert::{LegacyIngress, upgrade_legacy_ingress};

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::core::v1::{Endpoints, Namespace, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::Client;
use kube::api::{Api, ListParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("listing {kind} failed: {source}")]
    List {
        kind: &'static str,
        #[source]
        source: kube::Error,
    },

    #[error("converting legacy ingress failed: {0}")]
    LegacyIngress(#[from] serde_json::Error),
}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Snapshot of the per-kind resource lists backing one diagram pass
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    pub namespaces: Vec<Namespace>,
    pub endpoints: Vec<Endpoints>,
    pub pods: Vec<Pod>,
    pub services: Vec<Service>,
    pub daemon_sets: Vec<DaemonSet>,
    pub deployments: Vec<Deployment>,
    pub replica_sets: Vec<ReplicaSet>,
    pub stateful_sets: Vec<StatefulSet>,
    pub ingresses: Vec<Ingress>,
}

/// Fetches the resource kinds of one namespace through the typed API
pub struct Discovery {
    client: Client,
}

impl Discovery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List every kind for `namespace`, aborting on the first failure.
    ///
    /// Namespaces are listed cluster-wide so the builder can check that the
    /// requested one actually exists; everything else is scoped.
    pub async fn discover(&self, namespace: &str) -> DiscoveryResult<ObjectStore> {
        let mut store = ObjectStore::default();

        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        store.namespaces = self.list(namespaces, "namespaces").await?;

        let endpoints: Api<Endpoints> = Api::namespaced(self.client.clone(), namespace);
        store.endpoints = self.list(endpoints, "endpoints").await?;

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        store.pods = self.list(pods, "pods").await?;

        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        store.services = self.list(services, "services").await?;

        let daemon_sets: Api<DaemonSet> = Api::namespaced(self.client.clone(), namespace);
        store.daemon_sets = self.list(daemon_sets, "daemonsets").await?;

        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        store.deployments = self.list(deployments, "deployments").await?;

        let replica_sets: Api<ReplicaSet> = Api::namespaced(self.client.clone(), namespace);
        store.replica_sets = self.list(replica_sets, "replicasets").await?;

        let stateful_sets: Api<StatefulSet> = Api::namespaced(self.client.clone(), namespace);
        store.stateful_sets = self.list(stateful_sets, "statefulsets").await?;

        store.ingresses = self.list_ingresses(namespace).await?;

        Ok(store)
    }

    async fn list<K>(&self, api: Api<K>, kind: &'static str) -> DiscoveryResult<Vec<K>>
    where
        K: Clone + DeserializeOwned + Debug,
    {
        tracing::debug!("Listing {}", kind);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| DiscoveryError::List { kind, source })?;
        Ok(list.items)
    }

    /// List ingresses, falling back to `networking.k8s.io/v1beta1` when the
    /// server does not know the v1 resource.
    async fn list_ingresses(&self, namespace: &str) -> DiscoveryResult<Vec<Ingress>> {
        tracing::debug!("Listing ingresses");
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        match api.list(&ListParams::default()).await {
            Ok(list) => Ok(list.items),
            Err(kube::Error::Api(response)) if response.code == 404 => {
                self.list_legacy_ingresses(namespace).await
            }
            Err(source) => Err(DiscoveryError::List {
                kind: "ingresses",
                source,
            }),
        }
    }

    async fn list_legacy_ingresses(&self, namespace: &str) -> DiscoveryResult<Vec<Ingress>> {
        tracing::debug!("Falling back to v1beta1 ingresses");
        let gvk = GroupVersionKind::gvk("networking.k8s.io", "v1beta1", "Ingress");
        let resource = ApiResource::from_gvk(&gvk);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &resource);

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| DiscoveryError::List {
                kind: "ingresses",
                source,
            })?;

        let mut ingresses = Vec::with_capacity(list.items.len());
        for object in list.items {
            let legacy: LegacyIngress = serde_json::from_value(serde_json::to_value(&object)?)?;
            ingresses.push(upgrade_legacy_ingress(legacy));
        }
        Ok(ingresses)
    }
}
