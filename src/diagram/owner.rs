//! Owner-reference resolution

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

/// First owner reference whose kind matches `kind`, compared without case.
///
/// Later references of the same kind are ignored; absence means the resource
/// stays attached to the namespace group.
pub fn first_owner_of_kind<'a>(
    refs: &'a [OwnerReference],
    kind: &str,
) -> Option<&'a OwnerReference> {
    refs.iter()
        .find(|reference| reference.kind.eq_ignore_ascii_case(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_ref(kind: &str, name: &str) -> OwnerReference {
        OwnerReference {
            kind: kind.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_finds_first_matching_kind() {
        let refs = vec![
            owner_ref("ReplicaSet", "web-7f9c8"),
            owner_ref("Deployment", "web"),
            owner_ref("Deployment", "other"),
        ];

        let found = first_owner_of_kind(&refs, "deployment");
        assert_eq!(found.map(|r| r.name.as_str()), Some("web"));
    }

    #[test]
    fn test_ignores_case() {
        let refs = vec![owner_ref("DAEMONSET", "node-agent")];
        assert!(first_owner_of_kind(&refs, "daemonset").is_some());
    }

    #[test]
    fn test_missing_kind_is_none() {
        let refs = vec![owner_ref("Job", "migrate")];
        assert!(first_owner_of_kind(&refs, "deployment").is_none());
        assert!(first_owner_of_kind(&[], "deployment").is_none());
    }
}
