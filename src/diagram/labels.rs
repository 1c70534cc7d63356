//! Display-label derivation for owned resources
//!
//! Generated child names carry their controller's name as a prefix, e.g. the
//! pod `web-7f9c8-abcde` under the replica set `web-7f9c8`. Labels show the
//! owner on the first line and the remaining suffix on the second.

/// Strip `"<owner>-"` from the front of `name`.
///
/// Names that do not carry the prefix come back unmodified; the prefix check
/// is a literal comparison, not a generation-hash parse.
pub fn strip_owner_prefix<'a>(name: &'a str, owner: &str) -> &'a str {
    name.strip_prefix(owner)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(name)
}

/// Two-line label for a resource owned by `owner`
pub fn owned_label(owner: &str, name: &str) -> String {
    format!("{}-\n{}", owner, strip_owner_prefix(name, owner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_owner_prefix() {
        assert_eq!(strip_owner_prefix("web-7f9c8", "web"), "7f9c8");
        assert_eq!(strip_owner_prefix("web-7f9c8-abcde", "web-7f9c8"), "abcde");
    }

    #[test]
    fn test_keeps_non_conforming_names() {
        assert_eq!(strip_owner_prefix("frontend", "web"), "frontend");
        // Prefix must be followed by a hyphen
        assert_eq!(strip_owner_prefix("webserver", "web"), "webserver");
    }

    #[test]
    fn test_builds_two_line_labels() {
        assert_eq!(owned_label("web", "web-7f9c8"), "web-\n7f9c8");
        assert_eq!(
            owned_label("web-7f9c8", "web-7f9c8-abcde"),
            "web-7f9c8-\nabcde"
        );
    }

    #[test]
    fn test_label_falls_back_to_full_name() {
        assert_eq!(owned_label("web", "frontend"), "web-\nfrontend");
    }
}
