//! Per-provider name canonicalization.
//!
//! Each platform compares names under its own rules. Clients normalize a name
//! before querying so that, for example, `My.Cool_Name` and `my-cool-name`
//! hit the same PyPI project.

use crate::types::ProviderKind;
use regex::Regex;
use std::sync::LazyLock;

static PEP503_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"));

/// Canonicalize `raw` the way `provider` matches names.
///
/// Deterministic and idempotent for every provider.
pub fn normalize(provider: &ProviderKind, raw: &str) -> String {
    let trimmed = raw.trim();
    match provider {
        ProviderKind::PyPi => normalize_pypi(trimmed),
        // The validate endpoint applies the registry's own rules.
        ProviderKind::ComfyPublisher => trimmed.to_string(),
        ProviderKind::ComfyNode
        | ProviderKind::Npm
        | ProviderKind::GithubUser
        | ProviderKind::GithubOrg
        | ProviderKind::Domain(_) => trimmed.to_lowercase(),
    }
}

/// PEP 503: lower-case and collapse runs of `.`, `-`, `_` into one `-`.
pub fn normalize_pypi(name: &str) -> String {
    PEP503_SEPARATORS.replace_all(name, "-").to_lowercase()
}

/// Clean up a user-supplied TLD (`.COM` -> `com`). Returns `None` when blank.
pub fn normalize_tld(raw: &str) -> Option<String> {
    let tld = raw.trim().trim_start_matches('.').trim().to_lowercase();
    if tld.is_empty() {
        None
    } else {
        Some(tld)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_providers() -> Vec<ProviderKind> {
        let mut kinds = ProviderKind::standard();
        kinds.push(ProviderKind::Domain("com".to_string()));
        kinds
    }

    #[test]
    fn test_pypi_normalization() {
        assert_eq!(normalize(&ProviderKind::PyPi, "My.Cool_Name"), "my-cool-name");
        assert_eq!(normalize(&ProviderKind::PyPi, "my-cool-name"), "my-cool-name");
        assert_eq!(normalize(&ProviderKind::PyPi, "a__-.b"), "a-b");
        assert_eq!(normalize(&ProviderKind::PyPi, "Django"), "django");
    }

    #[test]
    fn test_pypi_equivalent_spellings_match() {
        let a = normalize(&ProviderKind::PyPi, "My.Cool_Name");
        let b = normalize(&ProviderKind::PyPi, "my-cool-name");
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent_for_every_provider() {
        let samples = [
            "My.Cool_Name",
            "  padded  ",
            "UPPER--case__x",
            "a.b.c",
            "-leading",
            "trailing_",
            "ÄÖü",
            "",
        ];

        for provider in all_providers() {
            for sample in samples {
                let once = normalize(&provider, sample);
                let twice = normalize(&provider, &once);
                assert_eq!(once, twice, "{} not idempotent on {:?}", provider, sample);
            }
        }
    }

    #[test]
    fn test_case_insensitive_namespaces_lowercase() {
        assert_eq!(normalize(&ProviderKind::GithubUser, "Octocat"), "octocat");
        assert_eq!(normalize(&ProviderKind::GithubOrg, "Rust-Lang"), "rust-lang");
        assert_eq!(normalize(&ProviderKind::Npm, "Left_Pad"), "left_pad");
        assert_eq!(
            normalize(&ProviderKind::Domain("io".to_string()), "Example"),
            "example"
        );
    }

    #[test]
    fn test_publisher_is_identity_after_trim() {
        assert_eq!(normalize(&ProviderKind::ComfyPublisher, " MyName "), "MyName");
    }

    #[test]
    fn test_normalize_tld() {
        assert_eq!(normalize_tld(".COM"), Some("com".to_string()));
        assert_eq!(normalize_tld(" dev "), Some("dev".to_string()));
        assert_eq!(normalize_tld(" . "), None);
        assert_eq!(normalize_tld(""), None);
    }
}
