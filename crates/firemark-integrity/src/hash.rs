//! SHA-256 content hashing over the canonical encoding.
//!
//! Pure and side-effect free; safe to call concurrently and repeatedly.
//! The digest is the security boundary here, not the comparison timing,
//! so `verify_hash` uses an ordinary case-insensitive hex comparison.

use sha2::{Digest, Sha256};

use firemark_contracts::{content::InspectionContent, error::FiremarkResult};

use crate::canonical::canonicalize;

/// Compute the SHA-256 hash of the content's canonical encoding.
///
/// Returns a lowercase 64-character hex string.
///
/// # Errors
///
/// Propagates `Serialization` from the canonicalizer when the content has
/// unanswered critical checklist items.
pub fn compute_hash(content: &InspectionContent) -> FiremarkResult<String> {
    let canonical = canonicalize(content)?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);

    Ok(hex::encode(hasher.finalize()))
}

/// Recompute the content hash and compare it to a stored value.
///
/// Hex case is ignored; a stored uppercase hash from another system still
/// verifies. Returns `false` on any mismatch, including a stored value
/// that is not hex at all.
pub fn verify_hash(content: &InspectionContent, stored_hash: &str) -> FiremarkResult<bool> {
    let recomputed = compute_hash(content)?;
    Ok(recomputed.eq_ignore_ascii_case(stored_hash))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use firemark_contracts::content::{
        ChecklistItem, GeoPoint, InspectionContent, InspectionType,
    };
    use firemark_contracts::inspection::{AssetId, InspectorId};

    use super::*;

    fn answered_content() -> InspectionContent {
        let mut content = InspectionContent::new(
            AssetId::new("EXT-0042"),
            InspectorId::new("insp-mchen"),
            InspectionType::Monthly,
            Utc.with_ymd_and_hms(2026, 8, 1, 10, 30, 0).unwrap(),
        );
        for item in ChecklistItem::ALL {
            content.checklist.insert(item, true);
        }
        content
    }

    #[test]
    fn compute_hash_is_deterministic() {
        let content = answered_content();
        assert_eq!(compute_hash(&content).unwrap(), compute_hash(&content).unwrap());
    }

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        let digest = compute_hash(&answered_content()).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Flipping any single field changes the hash.
    #[test]
    fn hash_is_sensitive_to_every_field() {
        let baseline = compute_hash(&answered_content()).unwrap();

        let mut flipped = answered_content();
        flipped.checklist.insert(ChecklistItem::SealIntact, false);
        assert_ne!(compute_hash(&flipped).unwrap(), baseline, "checklist flip");

        let mut renamed = answered_content();
        renamed.asset_id = AssetId::new("EXT-0043");
        assert_ne!(compute_hash(&renamed).unwrap(), baseline, "asset id change");

        let mut noted = answered_content();
        noted.notes = Some("x".to_string());
        assert_ne!(compute_hash(&noted).unwrap(), baseline, "notes change");

        let mut measured = answered_content();
        measured.gauge_pressure_psi = Some(180.0);
        assert_ne!(compute_hash(&measured).unwrap(), baseline, "pressure change");

        let mut located = answered_content();
        located.location = Some(GeoPoint { lat: 0.0, lon: 0.0, accuracy_m: 1.0 });
        assert_ne!(compute_hash(&located).unwrap(), baseline, "location change");

        let mut flagged = answered_content();
        flagged.needs_service = true;
        assert_ne!(compute_hash(&flagged).unwrap(), baseline, "service flag change");

        let mut shifted = answered_content();
        shifted.inspected_at += chrono::Duration::milliseconds(1);
        assert_ne!(compute_hash(&shifted).unwrap(), baseline, "1ms timestamp shift");
    }

    #[test]
    fn verify_hash_accepts_stored_value_case_insensitively() {
        let content = answered_content();
        let digest = compute_hash(&content).unwrap();

        assert!(verify_hash(&content, &digest).unwrap());
        assert!(verify_hash(&content, &digest.to_uppercase()).unwrap());
    }

    #[test]
    fn verify_hash_rejects_mismatch_and_garbage() {
        let content = answered_content();
        let mut digest = compute_hash(&content).unwrap();

        // One nibble off.
        let last = digest.pop().unwrap();
        digest.push(if last == '0' { '1' } else { '0' });
        assert!(!verify_hash(&content, &digest).unwrap());

        assert!(!verify_hash(&content, "not-a-hash").unwrap());
        assert!(!verify_hash(&content, "").unwrap());
    }
}
