//! Inclusion predicates applied before a resource becomes a node
//!
//! Workload controllers with nothing running are omitted entirely, so they
//! cannot produce dangling groups or edges. Pods, services, ingresses, and
//! endpoints only need to live in the target namespace.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// True when `meta` places the resource in `namespace`
pub fn in_namespace(meta: &ObjectMeta, namespace: &str) -> bool {
    meta.namespace.as_deref() == Some(namespace)
}

/// A deployment is shown only while replicas are both desired and available
pub fn deployment_included(deployment: &Deployment, namespace: &str) -> bool {
    if !in_namespace(&deployment.metadata, namespace) {
        return false;
    }
    let Some(status) = deployment.status.as_ref() else {
        return false;
    };
    status.replicas.unwrap_or(0) > 0 && status.available_replicas.unwrap_or(0) > 0
}

/// A daemon set is shown only while at least one pod is scheduled
pub fn daemon_set_included(daemon_set: &DaemonSet, namespace: &str) -> bool {
    in_namespace(&daemon_set.metadata, namespace)
        && daemon_set
            .status
            .as_ref()
            .is_some_and(|status| status.current_number_scheduled > 0)
}

/// A replica set is shown only while it has replicas
pub fn replica_set_included(replica_set: &ReplicaSet, namespace: &str) -> bool {
    in_namespace(&replica_set.metadata, namespace)
        && replica_set
            .status
            .as_ref()
            .is_some_and(|status| status.replicas > 0)
}

/// A stateful set is shown only while it has replicas
pub fn stateful_set_included(stateful_set: &StatefulSet, namespace: &str) -> bool {
    in_namespace(&stateful_set.metadata, namespace)
        && stateful_set
            .status
            .as_ref()
            .is_some_and(|status| status.replicas > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{
        DaemonSetStatus, DeploymentStatus, ReplicaSetStatus, StatefulSetStatus,
    };

    fn meta(name: &str, namespace: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_deployment_needs_available_replicas() {
        let mut deployment = Deployment {
            metadata: meta("web", "default"),
            status: Some(DeploymentStatus {
                replicas: Some(2),
                available_replicas: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(deployment_included(&deployment, "default"));

        deployment.status = Some(DeploymentStatus {
            replicas: Some(2),
            available_replicas: Some(0),
            ..Default::default()
        });
        assert!(!deployment_included(&deployment, "default"));

        deployment.status = Some(DeploymentStatus {
            replicas: Some(0),
            available_replicas: Some(2),
            ..Default::default()
        });
        assert!(!deployment_included(&deployment, "default"));

        deployment.status = None;
        assert!(!deployment_included(&deployment, "default"));
    }

    #[test]
    fn test_deployment_must_match_namespace() {
        let deployment = Deployment {
            metadata: meta("web", "staging"),
            status: Some(DeploymentStatus {
                replicas: Some(1),
                available_replicas: Some(1),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!deployment_included(&deployment, "default"));
    }

    #[test]
    fn test_daemon_set_needs_scheduled_pods() {
        let mut daemon_set = DaemonSet {
            metadata: meta("node-agent", "default"),
            status: Some(DaemonSetStatus {
                current_number_scheduled: 3,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(daemon_set_included(&daemon_set, "default"));

        daemon_set.status = Some(DaemonSetStatus {
            current_number_scheduled: 0,
            ..Default::default()
        });
        assert!(!daemon_set_included(&daemon_set, "default"));
    }

    #[test]
    fn test_replica_set_needs_replicas() {
        let mut replica_set = ReplicaSet {
            metadata: meta("web-7f9c8", "default"),
            status: Some(ReplicaSetStatus {
                replicas: 2,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(replica_set_included(&replica_set, "default"));

        replica_set.status = Some(ReplicaSetStatus {
            replicas: 0,
            ..Default::default()
        });
        assert!(!replica_set_included(&replica_set, "default"));
    }

    #[test]
    fn test_stateful_set_needs_replicas() {
        let mut stateful_set = StatefulSet {
            metadata: meta("db", "default"),
            status: Some(StatefulSetStatus {
                replicas: 1,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(stateful_set_included(&stateful_set, "default"));

        stateful_set.status = None;
        assert!(!stateful_set_included(&stateful_set, "default"));
    }
}
