//! Duplicate-submission fingerprinting.
//!
//! A fingerprint is a deterministic SHA-256 hex digest of the normalized
//! applicant email, property id, and position. At most one `pending`
//! application per fingerprint may exist at a time; the record store
//! enforces this with a uniqueness constraint rather than a check-then-
//! insert sequence.

use sha2::{Digest, Sha256};

use crate::types::DbId;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Normalize an email or position for fingerprinting: trimmed, lowercased.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Compute the duplicate-detection fingerprint for an application.
pub fn application_fingerprint(email: &str, property_id: DbId, position: &str) -> String {
    let material = format!(
        "{}|{}|{}",
        normalize(email),
        property_id,
        normalize(position)
    );
    sha256_hex(material.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property() -> DbId {
        uuid::Uuid::new_v4()
    }

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let property_id = property();
        let a = application_fingerprint("a@x.com", property_id, "Agent");
        let b = application_fingerprint("a@x.com", property_id, "Agent");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_normalizes_case_and_whitespace() {
        let property_id = property();
        let canonical = application_fingerprint("a@x.com", property_id, "agent");
        assert_eq!(
            application_fingerprint("  A@X.COM ", property_id, " Agent "),
            canonical
        );
    }

    #[test]
    fn fingerprint_differs_by_email() {
        let property_id = property();
        let a = application_fingerprint("a@x.com", property_id, "Agent");
        let b = application_fingerprint("b@x.com", property_id, "Agent");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_differs_by_property() {
        let a = application_fingerprint("a@x.com", property(), "Agent");
        let b = application_fingerprint("a@x.com", property(), "Agent");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_differs_by_position() {
        let property_id = property();
        let a = application_fingerprint("a@x.com", property_id, "Agent");
        let b = application_fingerprint("a@x.com", property_id, "Night Auditor");
        assert_ne!(a, b);
    }
}
