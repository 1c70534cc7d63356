//! Staged construction of the namespace topology diagram
//!
//! The builder walks the object store one kind at a time, in a fixed order in
//! which every stage can resolve nodes created by the stages before it:
//!
//! 1. namespace group
//! 2. deployments
//! 3. daemon sets
//! 4. replica sets (owner: deployment)
//! 5. stateful sets
//! 6. pods (owners: daemon set, replica set, stateful set)
//! 7. services (endpoints and load balancers)
//! 8. ingresses (backends and load balancers)
//!
//! Every lookup against a per-kind table is guarded and absence is a silent
//! skip: a filtered-out controller leaves its pods without that attachment,
//! and an endpoint address pointing at an unknown pod draws no edge. One
//! inconsistent resource never fails the whole diagram.

use std::collections::HashMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use crate::diagram::filters;
use crate::diagram::graph::{Diagram, EdgeKind, GroupId, GroupStyle, NodeId, NodeKind};
use crate::diagram::labels::owned_label;
use crate::diagram::owner::first_owner_of_kind;
use crate::discovery::ObjectStore;

/// Builds a [`Diagram`] from one namespace's object store.
///
/// Construction is a pure function of the store: building twice from the
/// same snapshot yields identical diagrams.
pub struct DiagramBuilder<'a> {
    store: &'a ObjectStore,
    namespace: &'a str,
    diagram: Diagram,
    ns_group: Option<GroupId>,

    // Name lookup tables, one per kind
    deployments: HashMap<String, NodeId>,
    daemon_sets: HashMap<String, NodeId>,
    replica_sets: HashMap<String, NodeId>,
    stateful_sets: HashMap<String, NodeId>,
    pods: HashMap<String, NodeId>,
    services: HashMap<String, NodeId>,

    daemon_set_groups: HashMap<String, GroupId>,
    replica_set_groups: HashMap<String, GroupId>,
    stateful_set_groups: HashMap<String, GroupId>,

    /// Created once, on the first load-balancer address seen
    internet: Option<NodeId>,
}

impl<'a> DiagramBuilder<'a> {
    /// Build the diagram for `namespace` from `store`.
    ///
    /// Returns an empty diagram when the namespace itself is not in the
    /// store; no later stage runs without its enclosing group.
    pub fn build(store: &'a ObjectStore, namespace: &'a str) -> Diagram {
        let mut builder = Self {
            store,
            namespace,
            diagram: Diagram::new(),
            ns_group: None,
            deployments: HashMap::new(),
            daemon_sets: HashMap::new(),
            replica_sets: HashMap::new(),
            stateful_sets: HashMap::new(),
            pods: HashMap::new(),
            services: HashMap::new(),
            daemon_set_groups: HashMap::new(),
            replica_set_groups: HashMap::new(),
            stateful_set_groups: HashMap::new(),
            internet: None,
        };

        if builder.add_namespace() {
            builder.add_deployments();
            builder.add_daemon_sets();
            builder.add_replica_sets();
            builder.add_stateful_sets();
            builder.add_pods();
            builder.add_services();
            builder.add_ingresses();
        }

        builder.diagram
    }

    /// Stage 1: the enclosing namespace group
    fn add_namespace(&mut self) -> bool {
        for namespace in &self.store.namespaces {
            let Some(name) = namespace.metadata.name.as_deref() else {
                continue;
            };
            if name != self.namespace {
                continue;
            }

            tracing::debug!("Generating namespace group: {}", name);
            let group = self
                .diagram
                .add_root_group(name, name, GroupStyle::Namespace);
            self.ns_group = Some(group);
            return true;
        }

        tracing::warn!("Namespace {} not found, nothing to draw", self.namespace);
        false
    }

    /// Stage 2: deployment nodes
    fn add_deployments(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for deployment in &self.store.deployments {
            let Some(name) = deployment.metadata.name.as_deref() else {
                continue;
            };
            if !filters::deployment_included(deployment, self.namespace) {
                continue;
            }

            tracing::debug!("Generating deployment: {}", name);
            let node = self.diagram.add_node(NodeKind::Deployment, name, name);
            self.diagram.add_to_group(ns_group, node);
            self.deployments.insert(name.to_string(), node);
        }
    }

    /// Stage 3: daemon set nodes, each with a child group for its pods
    fn add_daemon_sets(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for daemon_set in &self.store.daemon_sets {
            let Some(name) = daemon_set.metadata.name.as_deref() else {
                continue;
            };
            if !filters::daemon_set_included(daemon_set, self.namespace) {
                continue;
            }

            tracing::debug!("Generating daemon set: {}", name);
            let node = self.diagram.add_node(NodeKind::DaemonSet, name, name);
            self.diagram.add_to_group(ns_group, node);
            let group = self
                .diagram
                .add_child_group(ns_group, name, "ds", GroupStyle::Controller);
            self.daemon_sets.insert(name.to_string(), node);
            self.daemon_set_groups.insert(name.to_string(), group);
        }
    }

    /// Stage 4: replica set nodes, owned by deployments where references say so
    fn add_replica_sets(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for replica_set in &self.store.replica_sets {
            let Some(name) = replica_set.metadata.name.as_deref() else {
                continue;
            };
            if !filters::replica_set_included(replica_set, self.namespace) {
                continue;
            }

            tracing::debug!("Generating replica set: {}", name);
            let node = self.diagram.add_node(NodeKind::ReplicaSet, name, name);
            self.diagram.add_to_group(ns_group, node);
            let group = self
                .diagram
                .add_child_group(ns_group, name, "rs", GroupStyle::Controller);
            self.replica_sets.insert(name.to_string(), node);
            self.replica_set_groups.insert(name.to_string(), group);

            let refs = replica_set
                .metadata
                .owner_references
                .as_deref()
                .unwrap_or_default();
            if let Some(owner) = first_owner_of_kind(refs, "deployment") {
                if let Some(&owner_node) = self.deployments.get(&owner.name) {
                    self.diagram.add_edge(owner_node, node, EdgeKind::Owns, None);
                    self.diagram.set_label(node, owned_label(&owner.name, name));
                }
            }
        }
    }

    /// Stage 5: stateful set nodes, each with a child group for its pods
    fn add_stateful_sets(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for stateful_set in &self.store.stateful_sets {
            let Some(name) = stateful_set.metadata.name.as_deref() else {
                continue;
            };
            if !filters::stateful_set_included(stateful_set, self.namespace) {
                continue;
            }

            tracing::debug!("Generating stateful set: {}", name);
            let node = self.diagram.add_node(NodeKind::StatefulSet, name, name);
            self.diagram.add_to_group(ns_group, node);
            let group = self
                .diagram
                .add_child_group(ns_group, name, "sts", GroupStyle::Controller);
            self.stateful_sets.insert(name.to_string(), node);
            self.stateful_set_groups.insert(name.to_string(), group);
        }
    }

    /// Stage 6: pod nodes, attached per owner reference or to the namespace
    fn add_pods(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for pod in &self.store.pods {
            let Some(name) = pod.metadata.name.as_deref() else {
                continue;
            };
            if !filters::in_namespace(&pod.metadata, self.namespace) {
                continue;
            }

            tracing::debug!("Generating pod: {}", name);
            let node = self.diagram.add_node(NodeKind::Pod, name, name);
            self.pods.insert(name.to_string(), node);

            let refs = pod.metadata.owner_references.as_deref().unwrap_or_default();
            if refs.is_empty() {
                // Bare pod, not managed by any controller
                self.diagram.add_to_group(ns_group, node);
                continue;
            }

            for owner in refs {
                let Some((owner_node, owner_group)) = self.controller_for(owner) else {
                    continue;
                };

                tracing::debug!("Adding pod {} to group {}", name, owner.name);
                self.diagram.add_to_group(owner_group, node);
                self.diagram.add_edge(owner_node, node, EdgeKind::Owns, None);
                self.diagram.set_label(node, owned_label(&owner.name, name));
            }
        }
    }

    /// Stage 7: service nodes, endpoint routes, and load-balancer exposure
    fn add_services(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for service in &self.store.services {
            let Some(name) = service.metadata.name.as_deref() else {
                continue;
            };
            if !filters::in_namespace(&service.metadata, self.namespace) {
                continue;
            }

            tracing::debug!("Generating service: {}", name);
            let node = self.diagram.add_node(NodeKind::Service, name, name);
            self.diagram.add_to_group(ns_group, node);
            self.services.insert(name.to_string(), node);

            self.route_endpoints(name, node);

            let points = service
                .status
                .as_ref()
                .and_then(|status| status.load_balancer.as_ref())
                .and_then(|lb| lb.ingress.as_deref())
                .unwrap_or_default();
            for point in points {
                self.connect_internet(node, point.ip.as_deref(), point.hostname.as_deref());
            }
        }
    }

    /// Stage 8: ingress nodes, backend edges, and load-balancer exposure
    fn add_ingresses(&mut self) {
        let Some(ns_group) = self.ns_group else {
            return;
        };

        for ingress in &self.store.ingresses {
            let Some(name) = ingress.metadata.name.as_deref() else {
                continue;
            };
            if !filters::in_namespace(&ingress.metadata, self.namespace) {
                continue;
            }

            tracing::debug!("Generating ingress: {}", name);
            let node = self.diagram.add_node(NodeKind::Ingress, name, name);
            self.diagram.add_to_group(ns_group, node);

            let rules = ingress
                .spec
                .as_ref()
                .and_then(|spec| spec.rules.as_deref())
                .unwrap_or_default();
            for rule in rules {
                let Some(http) = rule.http.as_ref() else {
                    continue;
                };
                for path in &http.paths {
                    let Some(backend) = path.backend.service.as_ref() else {
                        continue;
                    };
                    if let Some(&service_node) = self.services.get(&backend.name) {
                        self.diagram
                            .add_edge(node, service_node, EdgeKind::Owns, None);
                    }
                }
            }

            let points = ingress
                .status
                .as_ref()
                .and_then(|status| status.load_balancer.as_ref())
                .and_then(|lb| lb.ingress.as_deref())
                .unwrap_or_default();
            for point in points {
                self.connect_internet(node, point.ip.as_deref(), point.hostname.as_deref());
            }
        }
    }

    /// Pod-owning controller node and group for an owner reference, if both
    /// exist. Unrecognized owner kinds resolve to nothing.
    fn controller_for(&self, reference: &OwnerReference) -> Option<(NodeId, GroupId)> {
        let (nodes, groups) = match reference.kind.to_ascii_lowercase().as_str() {
            "daemonset" => (&self.daemon_sets, &self.daemon_set_groups),
            "replicaset" => (&self.replica_sets, &self.replica_set_groups),
            "statefulset" => (&self.stateful_sets, &self.stateful_set_groups),
            _ => return None,
        };

        nodes
            .get(&reference.name)
            .copied()
            .zip(groups.get(&reference.name).copied())
    }

    /// Draw an Internet edge to `to`, labeled with the point's IP when it has
    /// one and its hostname otherwise. Points with neither draw nothing.
    fn connect_internet(&mut self, to: NodeId, ip: Option<&str>, hostname: Option<&str>) {
        let address = match (
            ip.filter(|s| !s.is_empty()),
            hostname.filter(|s| !s.is_empty()),
        ) {
            (Some(ip), _) => ip,
            (None, Some(hostname)) => hostname,
            (None, None) => return,
        };

        let internet = self.internet_node();
        self.diagram
            .add_edge(internet, to, EdgeKind::Routes, Some(address.to_string()));
    }

    /// Endpoint subsets of the same-named endpoints object become pod routes
    fn route_endpoints(&mut self, service_name: &str, service_node: NodeId) {
        for endpoints in &self.store.endpoints {
            if endpoints.metadata.name.as_deref() != Some(service_name) {
                continue;
            }
            if !filters::in_namespace(&endpoints.metadata, self.namespace) {
                continue;
            }

            for subset in endpoints.subsets.as_deref().unwrap_or_default() {
                for address in subset.addresses.as_deref().unwrap_or_default() {
                    let Some(target) = address.target_ref.as_ref() else {
                        continue;
                    };
                    if !target
                        .kind
                        .as_deref()
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("pod"))
                    {
                        continue;
                    }
                    let Some(pod_name) = target.name.as_deref() else {
                        continue;
                    };
                    if let Some(&pod_node) = self.pods.get(pod_name) {
                        self.diagram
                            .add_edge(pod_node, service_node, EdgeKind::Routes, None);
                    }
                }
            }
        }
    }

    /// The memoized Internet node, created on first demand
    fn internet_node(&mut self) -> NodeId {
        if let Some(node) = self.internet {
            return node;
        }

        tracing::debug!("Generating internet node");
        let node = self
            .diagram
            .add_node(NodeKind::Internet, "Internet", "Internet");
        self.internet = Some(node);
        node
    }
}
