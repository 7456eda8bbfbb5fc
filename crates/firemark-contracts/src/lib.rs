//! # firemark-contracts
//!
//! Shared types, lifecycle vocabulary, and error taxonomy for the FIREMARK
//! inspection integrity core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod content;
pub mod error;
pub mod inspection;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::content::{ChecklistItem, InspectionContent, InspectionType};
    use super::error::FiremarkError;
    use super::inspection::{
        AssetId, Inspection, InspectionId, InspectionStatus, InspectorId,
    };
    use super::verify::VerificationResult;

    fn make_content() -> InspectionContent {
        InspectionContent::new(
            AssetId::new("EXT-0001"),
            InspectorId::new("insp-jgarcia"),
            InspectionType::Monthly,
            Utc::now(),
        )
    }

    // ── ChecklistItem ────────────────────────────────────────────────────────

    #[test]
    fn checklist_all_covers_every_key_once() {
        let keys: std::collections::HashSet<&'static str> =
            ChecklistItem::ALL.iter().map(|i| i.key()).collect();
        assert_eq!(keys.len(), ChecklistItem::ALL.len(), "keys must be distinct");
    }

    #[test]
    fn checklist_ordering_matches_all_slice() {
        // BTreeMap iteration must follow the canonical ALL ordering, since
        // the canonical byte layout depends on it.
        let mut sorted = ChecklistItem::ALL;
        sorted.sort();
        assert_eq!(sorted, ChecklistItem::ALL);
    }

    #[test]
    fn unanswered_items_starts_full_and_drains() {
        let mut content = make_content();
        assert_eq!(content.unanswered_items().len(), 10);

        content.checklist.insert(ChecklistItem::SealIntact, true);
        content.checklist.insert(ChecklistItem::PinIntact, false);

        let remaining = content.unanswered_items();
        assert_eq!(remaining.len(), 8);
        assert!(!remaining.contains(&ChecklistItem::SealIntact));
        assert!(!remaining.contains(&ChecklistItem::PinIntact));
    }

    // ── Inspection aggregate ─────────────────────────────────────────────────

    #[test]
    fn new_in_progress_has_no_integrity_fields() {
        let inspection = Inspection::new_in_progress(make_content(), Utc::now());

        assert_eq!(inspection.status, InspectionStatus::InProgress);
        assert!(inspection.content_hash.is_none());
        assert!(inspection.previous_hash.is_none());
        assert!(inspection.inspector_signature.is_none());
        assert!(inspection.signed_at.is_none());
        assert!(inspection.computed_result.is_none());
    }

    #[test]
    fn inspection_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| InspectionId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn inspection_serde_round_trips() {
        let inspection = Inspection::new_in_progress(make_content(), Utc::now());
        let json = serde_json::to_string(&inspection).unwrap();
        let decoded: Inspection = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, inspection.id);
        assert_eq!(decoded.status, InspectionStatus::InProgress);
        assert_eq!(decoded.content.asset_id, inspection.content.asset_id);
    }

    // ── VerificationResult ───────────────────────────────────────────────────

    #[test]
    fn verification_result_is_valid_is_conjunction() {
        let mut result = VerificationResult {
            inspection_id: InspectionId::new(),
            content_valid: true,
            signature_valid: true,
            chain_valid: true,
            message: "all integrity checks passed".to_string(),
        };
        assert!(result.is_valid());

        for flag in 0..3 {
            result.content_valid = flag != 0;
            result.signature_valid = flag != 1;
            result.chain_valid = flag != 2;
            assert!(!result.is_valid(), "any single false flag invalidates");
        }
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_invalid_state_display() {
        let err = FiremarkError::InvalidState {
            operation: "update".to_string(),
            status: InspectionStatus::Completed,
        };
        let msg = err.to_string();
        assert!(msg.contains("update"));
        assert!(msg.contains("completed"));
    }

    #[test]
    fn error_not_found_display() {
        let id = InspectionId::new();
        let err = FiremarkError::NotFound { inspection_id: id };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn error_serialization_display() {
        let err = FiremarkError::Serialization {
            reason: "checklist item 'seal_intact' unanswered".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cannot be canonicalized"));
        assert!(msg.contains("seal_intact"));
    }

    #[test]
    fn error_signing_unavailable_display() {
        let err = FiremarkError::SigningUnavailable {
            reason: "FIREMARK_SIGNING_KEY is not set".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("signing key unavailable"));
        assert!(msg.contains("FIREMARK_SIGNING_KEY"));
    }

    #[test]
    fn error_store_display() {
        let err = FiremarkError::Store {
            reason: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("store error"));
        assert!(msg.contains("connection reset"));
    }
}
