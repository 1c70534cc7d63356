//! Legacy ingress conversion
//!
//! Older API servers serve ingresses at `networking.k8s.io/v1beta1`, where a
//! backend is a `{serviceName, servicePort}` pair and the port is an
//! int-or-string. This module upgrades that shape to the current v1
//! representation before anything downstream sees it.

use k8s_openapi::api::core::v1::LoadBalancerStatus;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressLoadBalancerIngress,
    IngressLoadBalancerStatus, IngressRule, IngressServiceBackend, IngressSpec, IngressStatus,
    ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::Deserialize;

/// An ingress as served by `networking.k8s.io/v1beta1`
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyIngress {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: Option<LegacyIngressSpec>,
    pub status: Option<LegacyIngressStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressSpec {
    /// Default backend, applied when no rule matches
    pub backend: Option<LegacyIngressBackend>,
    pub rules: Option<Vec<LegacyIngressRule>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressBackend {
    pub service_name: Option<String>,
    pub service_port: Option<IntOrString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyIngressRule {
    pub host: Option<String>,
    pub http: Option<LegacyHttpIngressRuleValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyHttpIngressRuleValue {
    #[serde(default)]
    pub paths: Vec<LegacyHttpIngressPath>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyHttpIngressPath {
    pub path: Option<String>,
    pub backend: Option<LegacyIngressBackend>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressStatus {
    pub load_balancer: Option<LoadBalancerStatus>,
}

/// Upgrade a legacy ingress to the v1 shape.
///
/// Pure data transform: int-or-string service ports become the v1
/// port-by-number-or-name backend, converted paths get the
/// `ImplementationSpecific` path type, and load-balancer addresses map
/// across unchanged. A default backend naming no service is dropped.
pub fn upgrade_legacy_ingress(legacy: LegacyIngress) -> Ingress {
    let spec = legacy.spec.map(|spec| IngressSpec {
        default_backend: spec.backend.as_ref().and_then(default_backend_from_legacy),
        rules: spec
            .rules
            .map(|rules| rules.into_iter().map(rule_from_legacy).collect()),
        ..Default::default()
    });

    let status = legacy.status.map(|status| IngressStatus {
        load_balancer: status.load_balancer.map(|lb| IngressLoadBalancerStatus {
            ingress: lb.ingress.map(|points| {
                points
                    .into_iter()
                    .map(|point| IngressLoadBalancerIngress {
                        hostname: point.hostname,
                        ip: point.ip,
                        ..Default::default()
                    })
                    .collect()
            }),
        }),
    });

    Ingress {
        metadata: legacy.metadata,
        spec,
        status,
    }
}

fn default_backend_from_legacy(backend: &LegacyIngressBackend) -> Option<IngressBackend> {
    let name = backend
        .service_name
        .as_deref()
        .filter(|name| !name.is_empty())?;

    Some(IngressBackend {
        service: Some(IngressServiceBackend {
            name: name.to_string(),
            port: backend.service_port.as_ref().map(backend_port),
        }),
        ..Default::default()
    })
}

fn backend_port(port: &IntOrString) -> ServiceBackendPort {
    match port {
        IntOrString::Int(number) => ServiceBackendPort {
            number: Some(*number),
            ..Default::default()
        },
        IntOrString::String(name) => ServiceBackendPort {
            name: Some(name.clone()),
            ..Default::default()
        },
    }
}

fn rule_from_legacy(rule: LegacyIngressRule) -> IngressRule {
    IngressRule {
        host: rule.host,
        http: rule.http.map(|http| HTTPIngressRuleValue {
            paths: http.paths.into_iter().map(path_from_legacy).collect(),
        }),
    }
}

fn path_from_legacy(path: LegacyHttpIngressPath) -> HTTPIngressPath {
    let backend = path
        .backend
        .map(|backend| IngressBackend {
            service: Some(IngressServiceBackend {
                name: backend.service_name.unwrap_or_default(),
                port: backend.service_port.as_ref().map(backend_port),
            }),
            ..Default::default()
        })
        .unwrap_or_default();

    HTTPIngressPath {
        path: path.path,
        // v1 requires a path type; the legacy shape carried none
        path_type: "ImplementationSpecific".to_string(),
        backend,
    }
}
