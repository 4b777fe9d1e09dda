//! Helpers for sanitizing data before it enters logs, spans or analytics.
//!
//! Form ids can identify a study or an organisation and server URLs may
//! carry credentials, so neither goes out verbatim.

use sha2::{Digest, Sha256};

/// Strips userinfo from a URL.
///
/// - `https://user:pw@odk.example.org/submission` → `https://****@odk.example.org/submission`
/// - `https://odk.example.org/submission` → unchanged
pub fn redact_url(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let after_scheme = &url[scheme_end + 3..];
        let authority_end = after_scheme.find('/').unwrap_or(after_scheme.len());
        if let Some(at_pos) = after_scheme[..authority_end].find('@') {
            let scheme = &url[..scheme_end + 3];
            let after_at = &after_scheme[at_pos + 1..];
            return format!("{}****@{}", scheme, after_at);
        }
    }

    url.to_string()
}

/// Returns a short SHA-256 based label identifying a form version, used as
/// the analytics label in place of the raw form id. Stable across builds.
pub fn hash_form_identifier(form_id: &str, version: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(form_id.as_bytes());
    match version {
        Some(version) => {
            hasher.update([1u8]);
            hasher.update(version.as_bytes());
        }
        None => hasher.update([0u8]),
    }
    hasher
        .finalize()
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_strips_userinfo() {
        assert_eq!(
            redact_url("https://user:pw@odk.example.org/submission"),
            "https://****@odk.example.org/submission"
        );
    }

    #[test]
    fn test_redact_url_keeps_at_in_path() {
        let url = "https://odk.example.org/forms/a@b";
        assert_eq!(redact_url(url), url);
    }

    #[test]
    fn test_hash_form_identifier_is_stable_and_version_sensitive() {
        let a = hash_form_identifier("household", Some("2024010101"));
        assert_eq!(a, hash_form_identifier("household", Some("2024010101")));
        assert_ne!(a, hash_form_identifier("household", Some("2024010102")));
        assert_ne!(a, hash_form_identifier("household", None));
        assert_eq!(a.len(), 16);
        assert!(!a.contains("household"));
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_form_identifier_is_a_fixed_digest() {
        // First 8 bytes of SHA-256("household" || 0x00).
        let expected: String = Sha256::digest(b"household\0")
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect();
        assert_eq!(hash_form_identifier("household", None), expected);
        assert_ne!(
            hash_form_identifier("household", None),
            hash_form_identifier("household", Some(""))
        );
    }
}
