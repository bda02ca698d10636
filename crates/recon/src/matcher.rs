use std::collections::HashMap;

use crate::evidence::compute_summary;
use crate::model::{MatchedPair, Mismatch, ReconResult, Transaction};

/// Absolute amount tolerance used when the caller has no opinion. Absorbs
/// float rounding noise, not semantic near-equality.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Match two transaction sets by exact, case-sensitive id.
///
/// Each side is indexed id → transaction with last-write-wins, so when an id
/// repeats inside B only its last occurrence is reachable from A. A is walked
/// directly, so every A row (duplicates included) is classified once:
/// matched if `|a - b| <= tolerance`, mismatched otherwise, or missing in B.
/// B rows whose id never occurs in A are missing in A.
pub fn reconcile(a: &[Transaction], b: &[Transaction], tolerance: f64) -> ReconResult {
    let index_a: HashMap<&str, &Transaction> = a.iter().map(|t| (t.id.as_str(), t)).collect();
    let index_b: HashMap<&str, &Transaction> = b.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut matches = Vec::new();
    let mut mismatches = Vec::new();
    let mut missing_in_a = Vec::new();
    let mut missing_in_b = Vec::new();

    for item_a in a {
        match index_b.get(item_a.id.as_str()) {
            Some(item_b) => {
                let diff = (item_a.amount - item_b.amount).abs();
                if diff <= tolerance {
                    matches.push(MatchedPair {
                        a: item_a.clone(),
                        b: (*item_b).clone(),
                    });
                } else {
                    mismatches.push(Mismatch {
                        a: item_a.clone(),
                        b: (*item_b).clone(),
                        reason: mismatch_reason(item_a.amount, item_b.amount, diff),
                    });
                }
            }
            None => missing_in_b.push(item_a.clone()),
        }
    }

    for item_b in b {
        if !index_a.contains_key(item_b.id.as_str()) {
            missing_in_a.push(item_b.clone());
        }
    }

    tracing::debug!(
        total_a = a.len(),
        total_b = b.len(),
        unique_a = index_a.len(),
        unique_b = index_b.len(),
        matched = matches.len(),
        mismatched = mismatches.len(),
        "reconciled datasets"
    );

    let summary = compute_summary(
        a.len(),
        b.len(),
        matches.len(),
        mismatches.len(),
        missing_in_a.len(),
        missing_in_b.len(),
    );

    ReconResult {
        summary,
        matches,
        mismatches,
        missing_in_a,
        missing_in_b,
    }
}

/// [`reconcile`] with [`DEFAULT_TOLERANCE`].
pub fn reconcile_default(a: &[Transaction], b: &[Transaction]) -> ReconResult {
    reconcile(a, b, DEFAULT_TOLERANCE)
}

fn mismatch_reason(amount_a: f64, amount_b: f64, diff: f64) -> String {
    format!(
        "Amount Mismatch: {amount_a} vs {amount_b} (Diff: {})",
        two_decimals(diff)
    )
}

/// Two-decimal text with exact ties rounded away from zero (`0.125` is
/// `"0.13"`); `{:.2}` alone rounds them to even.
///
/// A binary float sits exactly halfway between two cents only when it is an
/// odd number of eighths, so only those values are pre-rounded.
fn two_decimals(value: f64) -> String {
    let eighths = value * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths.abs() % 2.0 == 1.0;
    if is_tie {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        format!("{value:.2}")
    }
}
