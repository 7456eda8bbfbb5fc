//! FIREMARK Inspection Integrity — Demo CLI
//!
//! Runs one or all of the three compliance scenarios against real FIREMARK
//! components (lifecycle, in-memory store, signer, verifier) wired together
//! the way a deployment would wire them.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- clean-pass
//!   cargo run -p demo -- critical-failure
//!   cargo run -p demo -- tamper-detection

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use firemark_contracts::{
    content::{ChecklistItem, ChecklistResponse, InspectionType},
    error::FiremarkResult,
    inspection::{AssetId, InspectionResult, InspectorId},
};
use firemark_core::Lifecycle;
use firemark_integrity::{InspectorSigner, SigningKey};
use firemark_store::InMemoryInspectionStore;
use firemark_verify::VerifyEngine;

// ── CLI definition ────────────────────────────────────────────────────────────

/// FIREMARK — tamper-evident fire-safety inspection records demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "FIREMARK inspection integrity demo",
    long_about = "Runs FIREMARK compliance scenarios showing lifecycle gating,\n\
                  hash chaining, inspector attestation, and tamper detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: all checks pass, chain grows across two inspections.
    CleanPass,
    /// Scenario 2: a broken seal forces Fail over a declared Pass.
    CriticalFailure,
    /// Scenario 3: out-of-band edits and deletions are detected.
    TamperDetection,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::CleanPass => run_clean_pass(),
        Command::CriticalFailure => run_critical_failure(),
        Command::TamperDetection => run_tamper_detection(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Shared wiring ─────────────────────────────────────────────────────────────

/// One deployment's worth of FIREMARK components over a shared store.
struct Platform {
    store: Arc<InMemoryInspectionStore>,
    lifecycle: Lifecycle,
    verifier: VerifyEngine,
}

/// Build the platform the way a service process would at startup.
///
/// The key comes from FIREMARK_SIGNING_KEY when set; the demo falls back
/// to a baked-in key so it runs out of the box. A real service treats the
/// `SigningUnavailable` error as fatal and refuses to start.
fn build_platform() -> FiremarkResult<Platform> {
    let key = SigningKey::from_env("FIREMARK_SIGNING_KEY")
        .or_else(|_| SigningKey::from_bytes(b"firemark-demo-key-not-for-production".to_vec()))?;
    let signer = InspectorSigner::new(key);

    let store = Arc::new(InMemoryInspectionStore::new());
    let lifecycle = Lifecycle::new(store.clone(), signer.clone());
    let verifier = VerifyEngine::new(store.clone(), signer);

    Ok(Platform {
        store,
        lifecycle,
        verifier,
    })
}

fn all_pass_responses() -> Vec<ChecklistResponse> {
    ChecklistItem::ALL
        .iter()
        .map(|item| ChecklistResponse {
            item: *item,
            passed: true,
        })
        .collect()
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> FiremarkResult<()> {
    run_clean_pass()?;
    run_critical_failure()?;
    run_tamper_detection()?;
    Ok(())
}

/// Two clean monthly inspections on one extinguisher: the second links to
/// the first, and both verify.
fn run_clean_pass() -> FiremarkResult<()> {
    println!("── Scenario 1: clean pass and chain growth ──");
    let platform = build_platform()?;
    let asset = AssetId::new("EXT-0101");
    let inspector = InspectorId::new("insp-jgarcia");

    let first = platform.lifecycle.create(
        asset.clone(),
        inspector.clone(),
        InspectionType::Monthly,
    )?;
    platform
        .lifecycle
        .record_checklist_responses(&first, &all_pass_responses())?;
    let first_receipt =
        platform
            .lifecycle
            .complete(&first, InspectionResult::Pass, Some("lobby unit".to_string()))?;

    println!("  first inspection:  result={}", first_receipt.computed_result.as_str());
    println!("    content_hash  = {}", first_receipt.content_hash);
    println!("    previous_hash = {:?}", first_receipt.previous_hash);

    let second = platform
        .lifecycle
        .create(asset, inspector, InspectionType::Monthly)?;
    platform
        .lifecycle
        .record_checklist_responses(&second, &all_pass_responses())?;
    let second_receipt = platform
        .lifecycle
        .complete(&second, InspectionResult::Pass, None)?;

    println!("  second inspection: result={}", second_receipt.computed_result.as_str());
    println!("    previous_hash = {:?}", second_receipt.previous_hash);
    assert_eq!(
        second_receipt.previous_hash.as_deref(),
        Some(first_receipt.content_hash.as_str())
    );

    for id in [&first, &second] {
        let verdict = platform.verifier.verify(id)?;
        println!("  verify {}: {}", id, verdict.message);
    }
    println!();
    Ok(())
}

/// A broken tamper seal: the inspector declares Pass, the platform records
/// Fail anyway.
fn run_critical_failure() -> FiremarkResult<()> {
    println!("── Scenario 2: critical failure overrides declared result ──");
    let platform = build_platform()?;

    let id = platform.lifecycle.create(
        AssetId::new("EXT-0202"),
        InspectorId::new("insp-mchen"),
        InspectionType::Annual,
    )?;

    let mut responses = all_pass_responses();
    for response in &mut responses {
        if response.item == ChecklistItem::SealIntact {
            response.passed = false;
        }
    }
    platform.lifecycle.record_checklist_responses(&id, &responses)?;

    let receipt = platform
        .lifecycle
        .complete(&id, InspectionResult::Pass, None)?;

    println!("  declared = pass, computed = {}", receipt.computed_result.as_str());
    assert_eq!(receipt.computed_result, InspectionResult::Fail);
    println!();
    Ok(())
}

/// Out-of-band store edits: content mutation and predecessor deletion are
/// both detected, each by a different check.
fn run_tamper_detection() -> FiremarkResult<()> {
    println!("── Scenario 3: tamper detection ──");
    let platform = build_platform()?;
    let asset = AssetId::new("EXT-0303");
    let inspector = InspectorId::new("insp-jgarcia");

    let mut ids = Vec::new();
    for _ in 0..2 {
        let id = platform
            .lifecycle
            .create(asset.clone(), inspector.clone(), InspectionType::Monthly)?;
        platform
            .lifecycle
            .record_checklist_responses(&id, &all_pass_responses())?;
        platform.lifecycle.complete(&id, InspectionResult::Pass, None)?;
        ids.push(id);
    }

    // Edit a completed record directly through the store, bypassing the
    // lifecycle, the way a rogue write would.
    use firemark_core::traits::InspectionStore;
    let mut row = platform.store.get(&ids[1])?.expect("row exists");
    row.content.notes = Some("retroactively edited".to_string());
    platform.store.put(row)?;

    let verdict = platform.verifier.verify(&ids[1])?;
    println!("  after content edit:       {}", verdict.message);
    assert!(!verdict.content_valid);

    // Hard-delete the chain predecessor and verify the successor.
    let platform2 = build_platform()?;
    let mut chain = Vec::new();
    for _ in 0..2 {
        let id = platform2
            .lifecycle
            .create(asset.clone(), inspector.clone(), InspectionType::Monthly)?;
        platform2
            .lifecycle
            .record_checklist_responses(&id, &all_pass_responses())?;
        platform2.lifecycle.complete(&id, InspectionResult::Pass, None)?;
        chain.push(id);
    }
    platform2.store.remove(&chain[0])?;

    let verdict = platform2.verifier.verify(&chain[1])?;
    println!("  after predecessor delete: {}", verdict.message);
    assert!(verdict.content_valid && verdict.signature_valid && !verdict.chain_valid);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("FIREMARK — Tamper-Evident Inspection Records");
    println!("Compliance Integrity Demo");
    println!("============================================");
    println!();
    println!("Completion pipeline per inspection:");
    println!("  [1] Assemble final content from checklist, notes, and measurements");
    println!("  [2] Chain link: previous_hash := last completed hash for the asset");
    println!("  [3] content_hash := SHA-256 over the canonical field encoding");
    println!("  [4] signature := HMAC(key, inspector | hash | timestamp)");
    println!("  [5] Persist all three with status=Completed; immutable thereafter");
    println!();
}
