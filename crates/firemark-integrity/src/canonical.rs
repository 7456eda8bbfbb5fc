//! Canonical byte encoding of inspection content.
//!
//! The hash must be stable forever, including across runtimes and future
//! reimplementations, so the encoding is an explicit, versioned field list.
//! Nothing here is reflection-driven: adding a field to the content type
//! without touching this file does not silently change existing hashes.
//!
//! Canonical layout (bytes, in order):
//!   1. version tag `firemark-canonical/1` followed by LF
//!   2. every attested field as: field name UTF-8, u32 little-endian byte
//!      length of the value, value bytes
//!
//! The length prefix means no value can forge a field boundary, so free
//! text (notes, damage descriptions) needs no escaping. Absent optionals
//! emit a zero-length value, which is distinct from any present value.
//!
//! Fixed formatting rules:
//!   - timestamps: RFC 3339 UTC with exactly millisecond precision
//!   - GPS lat/lon: 6 decimal places; accuracy: 1 decimal place
//!   - pressure and weight: 2 decimal places
//!   - booleans: `true` / `false`
//!
//! Excluded on purpose: the inspection's own id, its hash/signature/status
//! fields, and the created/updated audit columns. Those are not attested
//! content.

use chrono::{DateTime, SecondsFormat, Utc};

use firemark_contracts::{
    content::{ChecklistItem, InspectionContent},
    error::{FiremarkError, FiremarkResult},
};

/// The version tag prefixed to every canonical encoding.
///
/// Bump only with a new tag value; existing stored hashes were computed
/// under this layout and must remain verifiable.
pub const CANONICAL_VERSION: &str = "firemark-canonical/1";

/// Format a timestamp the one way canonical encoding allows.
///
/// RFC 3339, UTC, exactly three fractional digits: `2026-08-30T14:05:09.120Z`.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append one `name -> value` field to the canonical buffer.
fn put_field(buf: &mut Vec<u8>, name: &str, value: &[u8]) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(value);
}

fn put_str(buf: &mut Vec<u8>, name: &str, value: &str) {
    put_field(buf, name, value.as_bytes());
}

fn put_opt_str(buf: &mut Vec<u8>, name: &str, value: Option<&str>) {
    put_field(buf, name, value.unwrap_or("").as_bytes());
}

fn put_bool(buf: &mut Vec<u8>, name: &str, value: bool) {
    put_str(buf, name, if value { "true" } else { "false" });
}

/// Turn inspection content into its canonical byte sequence.
///
/// Pure: identical field values produce identical bytes regardless of how
/// the value was constructed. The checklist is iterated in the fixed
/// `ChecklistItem::ALL` order, never in insertion order.
///
/// # Errors
///
/// Returns `FiremarkError::Serialization` when a critical checklist item
/// is unanswered. Content that claims to be completable must answer all
/// ten items; an unanswered item is a data-integrity bug upstream, not a
/// failing inspection.
pub fn canonicalize(content: &InspectionContent) -> FiremarkResult<Vec<u8>> {
    if let Some(missing) = content.unanswered_items().first() {
        return Err(FiremarkError::Serialization {
            reason: format!("checklist item '{}' unanswered", missing.key()),
        });
    }

    let mut buf = Vec::with_capacity(512);
    buf.extend_from_slice(CANONICAL_VERSION.as_bytes());
    buf.push(b'\n');

    put_str(&mut buf, "asset_id", &content.asset_id.0);
    put_str(&mut buf, "inspector_id", &content.inspector_id.0);
    put_str(
        &mut buf,
        "inspected_at",
        &canonical_timestamp(&content.inspected_at),
    );
    put_str(&mut buf, "inspection_type", content.inspection_type.as_str());

    match &content.location {
        Some(point) => {
            let fix = format!(
                "{:.6},{:.6},{:.1}",
                point.lat, point.lon, point.accuracy_m
            );
            put_str(&mut buf, "location", &fix);
        }
        None => put_str(&mut buf, "location", ""),
    }

    // Checklist answers in canonical item order. The unanswered check above
    // guarantees every lookup succeeds.
    for item in ChecklistItem::ALL {
        let answered = *content
            .checklist
            .get(&item)
            .expect("all checklist items answered, checked above");
        put_bool(&mut buf, item.key(), answered);
    }

    match content.gauge_pressure_psi {
        Some(psi) => put_str(&mut buf, "gauge_pressure_psi", &format!("{:.2}", psi)),
        None => put_str(&mut buf, "gauge_pressure_psi", ""),
    }
    match content.weight_kg {
        Some(kg) => put_str(&mut buf, "weight_kg", &format!("{:.2}", kg)),
        None => put_str(&mut buf, "weight_kg", ""),
    }

    put_opt_str(&mut buf, "damage_description", content.damage_description.as_deref());
    put_opt_str(&mut buf, "notes", content.notes.as_deref());

    put_bool(&mut buf, "needs_service", content.needs_service);
    put_opt_str(&mut buf, "service_reason", content.service_reason.as_deref());
    put_bool(&mut buf, "needs_replacement", content.needs_replacement);
    put_opt_str(
        &mut buf,
        "replacement_reason",
        content.replacement_reason.as_deref(),
    );

    // Photo references are order-significant; the index is part of the name
    // so insertion and deletion both move every later reference.
    put_str(&mut buf, "photo_count", &content.photo_refs.len().to_string());
    for (idx, photo_ref) in content.photo_refs.iter().enumerate() {
        put_str(&mut buf, &format!("photo.{idx}"), photo_ref);
    }

    Ok(buf)
}

// ── Tests ────────────────────────────────────────────────────────────────────
