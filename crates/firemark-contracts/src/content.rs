//! The attested inspection payload and checklist vocabulary.
//!
//! `InspectionContent` is a value object, not a database row. It carries
//! exactly the fields the content hash commits to; identifiers, hashes,
//! signatures, status, and audit columns live on the `Inspection`
//! aggregate and are excluded from canonicalization on purpose.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inspection::{AssetId, InspectorId};

/// The category of service visit being recorded.
///
/// The variants follow the NFPA-10 maintenance cadence for portable
/// extinguishers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionType {
    /// Routine monthly visual check.
    Monthly,
    /// Annual maintenance inspection.
    Annual,
    /// Six-year internal teardown and refill.
    SixYearTeardown,
    /// Hydrostatic cylinder test.
    HydrostaticTest,
}

impl InspectionType {
    /// Stable lowercase token used in canonicalization and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionType::Monthly => "monthly",
            InspectionType::Annual => "annual",
            InspectionType::SixYearTeardown => "six_year_teardown",
            InspectionType::HydrostaticTest => "hydrostatic_test",
        }
    }
}

/// A GPS fix captured at the point of inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Reported horizontal accuracy in meters.
    pub accuracy_m: f64,
}

/// One item on the extinguisher inspection checklist.
///
/// Every variant is a *critical* check: a single `false` answer forces the
/// computed result to `Fail` regardless of what the inspector declared.
/// The `ALL` ordering is part of the canonical byte layout and must never
/// be reordered; append new items at the end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ChecklistItem {
    /// The unit is reachable without moving equipment or stock.
    Accessible,
    /// Nothing blocks view of or access to the unit.
    Unobstructed,
    /// The location signage is present and visible.
    SignageVisible,
    /// The tamper seal is unbroken.
    SealIntact,
    /// The safety pin is in place.
    PinIntact,
    /// The nozzle is clear of debris and corrosion.
    NozzleClear,
    /// The hose shows no cracking or blockage.
    HoseIntact,
    /// The pressure gauge needle is in the green zone.
    GaugeInGreen,
    /// No dents, rust, or chemical damage on the cylinder.
    NoPhysicalDamage,
    /// The service tag is attached to the unit.
    TagAttached,
}

impl ChecklistItem {
    /// Every checklist item, in canonical order.
    pub const ALL: [ChecklistItem; 10] = [
        ChecklistItem::Accessible,
        ChecklistItem::Unobstructed,
        ChecklistItem::SignageVisible,
        ChecklistItem::SealIntact,
        ChecklistItem::PinIntact,
        ChecklistItem::NozzleClear,
        ChecklistItem::HoseIntact,
        ChecklistItem::GaugeInGreen,
        ChecklistItem::NoPhysicalDamage,
        ChecklistItem::TagAttached,
    ];

    /// Stable snake_case key used in canonicalization and API payloads.
    pub fn key(&self) -> &'static str {
        match self {
            ChecklistItem::Accessible => "accessible",
            ChecklistItem::Unobstructed => "unobstructed",
            ChecklistItem::SignageVisible => "signage_visible",
            ChecklistItem::SealIntact => "seal_intact",
            ChecklistItem::PinIntact => "pin_intact",
            ChecklistItem::NozzleClear => "nozzle_clear",
            ChecklistItem::HoseIntact => "hose_intact",
            ChecklistItem::GaugeInGreen => "gauge_in_green",
            ChecklistItem::NoPhysicalDamage => "no_physical_damage",
            ChecklistItem::TagAttached => "tag_attached",
        }
    }
}

/// One inspector answer to a checklist item, delivered in a batch upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    /// The item being answered.
    pub item: ChecklistItem,
    /// The answer. `false` on any item forces the computed result to `Fail`.
    pub passed: bool,
}

/// Everything the content hash attests to.
///
/// Two values with identical fields canonicalize to identical bytes no
/// matter how they were constructed; `checklist` is a `BTreeMap` so its
/// iteration order is a property of the keys, not of insertion history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionContent {
    /// The extinguisher this inspection was performed on.
    pub asset_id: AssetId,
    /// The inspector of record.
    pub inspector_id: InspectorId,
    /// When the inspection was performed (UTC).
    pub inspected_at: DateTime<Utc>,
    /// The kind of service visit.
    pub inspection_type: InspectionType,
    /// GPS fix at the point of inspection, if captured.
    pub location: Option<GeoPoint>,
    /// Checklist answers recorded so far, keyed by item.
    pub checklist: BTreeMap<ChecklistItem, bool>,
    /// Gauge reading in PSI, if measured.
    pub gauge_pressure_psi: Option<f64>,
    /// Gross weight in kilograms, if measured.
    pub weight_kg: Option<f64>,
    /// Free-text description of any physical damage found.
    pub damage_description: Option<String>,
    /// Inspector notes.
    pub notes: Option<String>,
    /// The unit needs servicing before the next cycle.
    pub needs_service: bool,
    /// Why servicing is needed.
    pub service_reason: Option<String>,
    /// The unit must be replaced.
    pub needs_replacement: bool,
    /// Why replacement is needed.
    pub replacement_reason: Option<String>,
    /// Ordered references to photos taken during the inspection.
    pub photo_refs: Vec<String>,
}

impl InspectionContent {
    /// A fresh, unanswered content record for a newly opened inspection.
    pub fn new(
        asset_id: AssetId,
        inspector_id: InspectorId,
        inspection_type: InspectionType,
        inspected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            asset_id,
            inspector_id,
            inspected_at,
            inspection_type,
            location: None,
            checklist: BTreeMap::new(),
            gauge_pressure_psi: None,
            weight_kg: None,
            damage_description: None,
            notes: None,
            needs_service: false,
            service_reason: None,
            needs_replacement: false,
            replacement_reason: None,
            photo_refs: Vec::new(),
        }
    }

    /// The checklist items that have not been answered yet.
    pub fn unanswered_items(&self) -> Vec<ChecklistItem> {
        ChecklistItem::ALL
            .iter()
            .copied()
            .filter(|item| !self.checklist.contains_key(item))
            .collect()
    }
}
