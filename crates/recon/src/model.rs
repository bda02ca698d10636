use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single raw cell value, exactly as the row extractor produced it.
pub type RawValue = serde_json::Value;

/// One record keyed by column name. Key order is the source's native column
/// order (serde_json is built with `preserve_order`).
pub type RawRow = serde_json::Map<String, RawValue>;

/// Which columns of a dataset carry the identifier, amount and (optionally) date.
///
/// `None` means the heuristic could not resolve a column at all (a row with
/// fewer columns than the positional fallback needs). Reading through a `None`
/// column yields an empty field, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub id_col: Option<String>,
    pub amount_col: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_col: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// The normalized unit of comparison derived from one raw row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub description: String,
    pub original_row: RawRow,
}

// ---------------------------------------------------------------------------
// Matching output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub a: Transaction,
    pub b: Transaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub a: Transaction,
    pub b: Transaction,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconSummary {
    /// Input cardinality of dataset A, duplicates included.
    pub total_a: usize,
    /// Input cardinality of dataset B, duplicates included.
    pub total_b: usize,
    pub matched_count: usize,
    pub mismatch_count: usize,
    pub missing_in_a_count: usize,
    pub missing_in_b_count: usize,
    /// `matched / (matched + mismatched + missing_in_a + missing_in_b) * 100`, or 0.
    pub match_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconResult {
    pub summary: ReconSummary,
    pub matches: Vec<MatchedPair>,
    pub mismatches: Vec<Mismatch>,
    /// Records of B whose id never occurs in A.
    pub missing_in_a: Vec<Transaction>,
    /// Records of A whose id never occurs in B.
    pub missing_in_b: Vec<Transaction>,
}

impl ReconResult {
    /// True when every record on both sides matched within tolerance.
    pub fn is_reconciled(&self) -> bool {
        self.mismatches.is_empty() && self.missing_in_a.is_empty() && self.missing_in_b.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Report envelope
// ---------------------------------------------------------------------------

/// Both datasets as handed over by the row extractor, with their display names.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub name_a: String,
    pub rows_a: Vec<RawRow>,
    pub name_b: String,
    pub rows_b: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconMeta {
    pub name: String,
    pub file_name_a: String,
    pub file_name_b: String,
    pub mapping_a: ColumnMapping,
    pub mapping_b: ColumnMapping,
    pub tolerance: f64,
    pub engine_version: String,
    pub run_at: String,
}

/// What the storage/presentation layer receives for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub result: ReconResult,
}
