use std::sync::OnceLock;

use regex::Regex;

use crate::model::{ColumnMapping, RawRow};

const ID_PATTERN: &str = "(?i)id|ref|no|inv";
const AMOUNT_PATTERN: &str = "(?i)amount|total|val|price";

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ID_PATTERN).expect("id pattern compiles"))
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern compiles"))
}

/// Infer identifier and amount columns from one sample row.
///
/// - id: first column whose name contains `id|ref|no|inv` (case-insensitive),
///   else the first column.
/// - amount: first column whose name contains `amount|total|val|price`,
///   else the second column, regardless of which column became the id.
///
/// Never fails. A row with fewer than two columns leaves the fallback `None`,
/// which later reads as an empty field. The date column is never inferred.
pub fn infer_mapping(sample: &RawRow) -> ColumnMapping {
    let id_col = sample
        .keys()
        .find(|k| id_regex().is_match(k))
        .or_else(|| sample.keys().next())
        .cloned();

    let amount_col = sample
        .keys()
        .find(|k| amount_regex().is_match(k))
        .or_else(|| sample.keys().nth(1))
        .cloned();

    ColumnMapping {
        id_col,
        amount_col,
        date_col: None,
    }
}

/// Mapping for a whole dataset: inferred from its first row only.
/// An empty dataset resolves nothing.
pub fn infer_mapping_for(rows: &[RawRow]) -> ColumnMapping {
    rows.first().map(infer_mapping).unwrap_or_default()
}

/// Explicit column choices that replace inferred ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnOverrides {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ColumnOverrides {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

impl ColumnMapping {
    /// Replace only the fields the overrides name.
    pub fn with_overrides(mut self, overrides: &ColumnOverrides) -> Self {
        if let Some(ref id) = overrides.id {
            self.id_col = Some(id.clone());
        }
        if let Some(ref amount) = overrides.amount {
            self.amount_col = Some(amount.clone());
        }
        if let Some(ref date) = overrides.date {
            self.date_col = Some(date.clone());
        }
        self
    }
}
