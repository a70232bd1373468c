//! Resource names and type classification
//!
//! A resource is declared by a name token such as `deployment` or
//! `worker-02`. The trailing `-<digits>` suffix distinguishes several
//! instances of the same type; it is stripped to find the template type and
//! kept for output naming. Names become file names under the service's
//! `output/` directory, so they must be a single plain path component.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CoreError, Result};

static RESOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<kind>\S+?)(?:-(?P<instance>\d+))?$").expect("resource name pattern is valid")
});

/// Derive the resource type from a resource name
///
/// `network-policy-02` yields `network-policy`, `worker` yields `worker`.
pub fn classify(name: &str) -> Result<&str> {
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(unclassifiable(name));
    }

    let captures = RESOURCE_NAME
        .captures(name)
        .ok_or_else(|| unclassifiable(name))?;

    let kind = captures
        .name("kind")
        .map(|m| m.as_str())
        .ok_or_else(|| unclassifiable(name))?;

    if kind.starts_with('-') || kind.ends_with('-') {
        return Err(unclassifiable(name));
    }

    Ok(kind)
}

fn unclassifiable(name: &str) -> CoreError {
    CoreError::UnclassifiableResource {
        name: name.to_string(),
    }
}

/// A declared resource with its classified type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    name: String,
    kind_len: usize,
}

impl ResourceName {
    /// Parse and classify a resource name
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let kind_len = classify(&name)?.len();
        Ok(Self { name, kind_len })
    }

    /// Full name, used for output files
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Resource type, used to select the template
    pub fn kind(&self) -> &str {
        &self.name[..self.kind_len]
    }

    /// Numeric instance suffix, if the name carries one
    pub fn instance(&self) -> Option<&str> {
        self.name[self.kind_len..].strip_prefix('-')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_strips_numeric_suffix() {
        assert_eq!(classify("deployment-03").unwrap(), "deployment");
        assert_eq!(classify("worker-1").unwrap(), "worker");
        assert_eq!(classify("service-0042").unwrap(), "service");
    }

    #[test]
    fn test_classify_without_suffix_is_unchanged() {
        assert_eq!(classify("deployment").unwrap(), "deployment");
        assert_eq!(classify("ingress").unwrap(), "ingress");
    }

    #[test]
    fn test_classify_keeps_inner_dashes() {
        assert_eq!(classify("network-policy").unwrap(), "network-policy");
        assert_eq!(classify("network-policy-02").unwrap(), "network-policy");
        assert_eq!(classify("config-map-v2").unwrap(), "config-map-v2");
    }

    #[test]
    fn test_classify_only_strips_last_suffix() {
        assert_eq!(classify("worker-01-02").unwrap(), "worker-01");
    }

    #[test]
    fn test_classify_rejects_unparsable_names() {
        for name in ["", "-01", "-", "worker-", "a--01", "two words", " padded"] {
            let err = classify(name).unwrap_err();
            assert!(
                matches!(err, CoreError::UnclassifiableResource { name: ref n } if n == name),
                "expected {:?} to be unclassifiable, got {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_classify_rejects_path_like_names() {
        for name in ["../redis", "a/b-01", "..", ".", "dir\\file", "/etc/passwd"] {
            assert!(
                matches!(classify(name), Err(CoreError::UnclassifiableResource { .. })),
                "expected {:?} to be rejected",
                name
            );
        }
        assert_eq!(classify("config.d-01").unwrap(), "config.d");
    }

    #[test]
    fn test_resource_name_rejects_path_like_names() {
        assert!(ResourceName::parse("../x").is_err());
    }

    #[test]
    fn test_classify_generated_suffixes() {
        for kind in ["deployment", "service", "cron-job", "pvc"] {
            for n in [0, 1, 9, 10, 99, 123] {
                let name = format!("{}-{:02}", kind, n);
                assert_eq!(classify(&name).unwrap(), kind);
            }
        }
    }

    #[test]
    fn test_resource_name_parts() {
        let name = ResourceName::parse("worker-02").unwrap();
        assert_eq!(name.as_str(), "worker-02");
        assert_eq!(name.kind(), "worker");
        assert_eq!(name.instance(), Some("02"));

        let single = ResourceName::parse("ingress").unwrap();
        assert_eq!(single.kind(), "ingress");
        assert_eq!(single.instance(), None);
    }
}
