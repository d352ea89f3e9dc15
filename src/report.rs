use std::fmt::Write;

use crate::types::RunSummary;

/// Render the run outcome as an aligned text table. This is the pipeline's
/// only success output: one row per asset balance, then the derived metrics
/// and the attestation handle when a record was created.
pub fn render(summary: &RunSummary) -> String {
    let snapshot = &summary.snapshot;
    let mut out = String::new();

    let _ = writeln!(out, "user: {:?}", summary.user);
    let _ = writeln!(out);
    let _ = writeln!(out, "asset        |        balance");
    let _ = writeln!(out, "-------------+---------------");
    for (label, value) in [
        ("collateral", snapshot.collateral),
        ("debt", snapshot.debt),
        ("underlying", snapshot.underlying),
    ] {
        let _ = writeln!(out, "{label:<12} | {value:>14.6}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "borrow capacity: {:.6}", snapshot.borrow_capacity);
    let _ = writeln!(out, "utilization:     {}%", snapshot.percentage_score);
    match &summary.attestation {
        Some(handle) => {
            let _ = writeln!(out, "attestation:     id={} tx={:?}", handle.id, handle.tx_hash);
        }
        None => {
            let _ = writeln!(out, "attestation:     skipped (publish disabled)");
        }
    }

    out
}
