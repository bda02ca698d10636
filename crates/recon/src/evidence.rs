use crate::model::ReconSummary;

/// Compute summary statistics from the four output list lengths.
///
/// `total_a`/`total_b` are raw input cardinalities, not distinct-id counts.
/// The percentage denominator is the number of classified records; two empty
/// datasets give 0, not NaN.
pub fn compute_summary(
    total_a: usize,
    total_b: usize,
    matched: usize,
    mismatched: usize,
    missing_in_a: usize,
    missing_in_b: usize,
) -> ReconSummary {
    let classified = matched + mismatched + missing_in_a + missing_in_b;
    let match_percentage = if classified > 0 {
        matched as f64 / classified as f64 * 100.0
    } else {
        0.0
    };

    ReconSummary {
        total_a,
        total_b,
        matched_count: matched,
        mismatch_count: mismatched,
        missing_in_a_count: missing_in_a,
        missing_in_b_count: missing_in_b,
        match_percentage,
    }
}

impl ReconSummary {
    /// One-line human summary, e.g. for stderr.
    pub fn describe(&self) -> String {
        format!(
            "{} vs {} records: {} matched, {} amount mismatches, {} missing in A, {} missing in B ({:.1}% match)",
            self.total_a,
            self.total_b,
            self.matched_count,
            self.mismatch_count,
            self.missing_in_a_count,
            self.missing_in_b_count,
            self.match_percentage,
        )
    }
}
