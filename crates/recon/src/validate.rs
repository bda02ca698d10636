//! Opt-in precondition checks.
//!
//! The engine accepts anything: unknown amount formats read as 0 and missing
//! ids become `ROW-{i}`. Callers that want to refuse such input run these
//! checks *before* reconciling. Nothing here changes how the engine
//! classifies rows.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::ReconError;
use crate::model::{ColumnMapping, RawRow, RawValue};
use crate::normalize::{amount_literal, value_text};

/// Which dataset a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// The dataset has no rows at all.
    EmptyDataset,
    /// Inference resolved no identifier column.
    NoIdColumn,
    /// Inference resolved no amount column.
    NoAmountColumn,
    /// A mapped column is absent from some rows (0-based row indices).
    MissingColumn { column: String, rows: Vec<usize> },
    /// Non-blank amount cells that normalize to 0 anyway, e.g. `"abc"`.
    UnparsedAmount { rows: Vec<usize> },
    /// Rows whose id was replaced by a `ROW-{i}` placeholder.
    SynthesizedIds { rows: Vec<usize> },
    /// Ids occurring more than once; only the last occurrence is visible
    /// to the other side's lookup.
    DuplicateIds { ids: Vec<String> },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyDataset | Self::NoIdColumn | Self::NoAmountColumn => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "dataset has no rows"),
            Self::NoIdColumn => write!(f, "no identifier column could be resolved"),
            Self::NoAmountColumn => write!(f, "no amount column could be resolved"),
            Self::MissingColumn { column, rows } => {
                write!(f, "column '{column}' missing from {} row(s)", rows.len())
            }
            Self::UnparsedAmount { rows } => {
                write!(f, "{} amount value(s) could not be parsed and read as 0", rows.len())
            }
            Self::SynthesizedIds { rows } => {
                write!(f, "{} row(s) have no identifier and get a ROW-n placeholder", rows.len())
            }
            Self::DuplicateIds { ids } => {
                write!(f, "{} identifier(s) repeat; only the last occurrence is matched", ids.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetReport {
    pub side: Side,
    pub rows: usize,
    pub mapping: ColumnMapping,
    pub issues: Vec<Issue>,
}

impl DatasetReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    /// Fail on the first error-severity issue; warnings pass through.
    pub fn into_result(self) -> Result<DatasetReport, ReconError> {
        match self.issues.iter().find(|i| i.severity() == Severity::Error) {
            Some(issue) => Err(ReconError::Precondition {
                side: self.side,
                message: issue.to_string(),
            }),
            None => Ok(self),
        }
    }
}

/// Inspect one dataset against the mapping the engine would use for it.
pub fn check_dataset(side: Side, rows: &[RawRow], mapping: &ColumnMapping) -> DatasetReport {
    let mut issues = Vec::new();

    if rows.is_empty() {
        issues.push(Issue::EmptyDataset);
        return DatasetReport {
            side,
            rows: 0,
            mapping: mapping.clone(),
            issues,
        };
    }

    if mapping.id_col.is_none() {
        issues.push(Issue::NoIdColumn);
    }
    if mapping.amount_col.is_none() {
        issues.push(Issue::NoAmountColumn);
    }

    let mapped = [&mapping.id_col, &mapping.amount_col, &mapping.date_col];
    let mut seen_columns: Vec<&str> = Vec::new();
    for column in mapped.into_iter().flatten() {
        if seen_columns.contains(&column.as_str()) {
            continue;
        }
        seen_columns.push(column);
        let absent: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.contains_key(column))
            .map(|(i, _)| i)
            .collect();
        if !absent.is_empty() {
            issues.push(Issue::MissingColumn {
                column: column.clone(),
                rows: absent,
            });
        }
    }

    if let Some(ref amount_col) = mapping.amount_col {
        let unparsed: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(amount_col).is_some_and(reads_as_silent_zero))
            .map(|(i, _)| i)
            .collect();
        if !unparsed.is_empty() {
            issues.push(Issue::UnparsedAmount { rows: unparsed });
        }
    }

    let ids: Vec<Option<String>> = rows
        .iter()
        .map(|row| {
            mapping
                .id_col
                .as_deref()
                .and_then(|c| row.get(c))
                .and_then(value_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .collect();

    let synthesized: Vec<usize> = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| id.is_none())
        .map(|(i, _)| i)
        .collect();
    if !synthesized.is_empty() {
        issues.push(Issue::SynthesizedIds { rows: synthesized });
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for id in ids.iter().flatten() {
        let count = counts.entry(id.as_str()).or_insert(0);
        if *count == 1 {
            order.push(id.as_str());
        }
        *count += 1;
    }
    if !order.is_empty() {
        issues.push(Issue::DuplicateIds {
            ids: order.into_iter().map(str::to_string).collect(),
        });
    }

    tracing::debug!(%side, rows = rows.len(), issues = issues.len(), "checked dataset");

    DatasetReport {
        side,
        rows: rows.len(),
        mapping: mapping.clone(),
        issues,
    }
}

/// A non-blank cell that the permissive normalizer turns into 0 without it
/// spelling a number: no leading literal parsed (`"abc"`, `"--5"`, `true`)
/// or the literal overflowed.
fn reads_as_silent_zero(raw: &RawValue) -> bool {
    match raw {
        RawValue::Null | RawValue::Bool(false) | RawValue::Number(_) => false,
        RawValue::String(s) if s.trim().is_empty() => false,
        other => amount_literal(other).map_or(true, |v| !v.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::infer_mapping_for;
    use serde_json::json;

    fn rows(values: Vec<serde_json::Value>) -> Vec<RawRow> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn clean_dataset_has_no_issues() {
        let data = rows(vec![
            json!({"id": "1", "amount": "10.00"}),
            json!({"id": "2", "amount": "0"}),
        ]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn empty_dataset_is_error() {
        let report = check_dataset(Side::B, &[], &ColumnMapping::default());
        assert_eq!(report.issues, vec![Issue::EmptyDataset]);
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "dataset B: dataset has no rows");
    }

    #[test]
    fn single_column_has_no_amount() {
        let data = rows(vec![json!({"alpha": "1"})]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert!(report.issues.contains(&Issue::NoAmountColumn));
        assert!(report.has_errors());
    }

    #[test]
    fn warnings_do_not_fail() {
        let data = rows(vec![
            json!({"id": "1", "amount": "abc"}),
            json!({"id": "", "amount": "5"}),
            json!({"id": "1", "amount": "-"}),
            json!({"id": "3"}),
        ]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert!(!report.has_errors());
        assert!(report.issues.contains(&Issue::MissingColumn {
            column: "amount".into(),
            rows: vec![3],
        }));
        assert!(report.issues.contains(&Issue::UnparsedAmount { rows: vec![0, 2] }));
        assert!(report.issues.contains(&Issue::SynthesizedIds { rows: vec![1] }));
        assert!(report.issues.contains(&Issue::DuplicateIds { ids: vec!["1".into()] }));
    }

    #[test]
    fn digits_outside_the_leading_literal_are_flagged() {
        let data = rows(vec![
            json!({"id": "1", "amount": "--5"}),
            json!({"id": "2", "amount": "5-"}),
            json!({"id": "3", "amount": "9".repeat(400)}),
            json!({"id": "4", "amount": "CR -12.00"}),
        ]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert_eq!(report.issues, vec![Issue::UnparsedAmount { rows: vec![0, 2] }]);
    }

    #[test]
    fn literal_zero_is_not_flagged() {
        let data = rows(vec![
            json!({"id": "1", "amount": "$0.00"}),
            json!({"id": "2", "amount": ""}),
            json!({"id": "3", "amount": 0}),
        ]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn duplicate_ids_listed_once_in_order_of_first_repeat() {
        let data = rows(vec![
            json!({"id": "b", "amount": "1"}),
            json!({"id": "a", "amount": "1"}),
            json!({"id": "a", "amount": "1"}),
            json!({"id": "b", "amount": "1"}),
            json!({"id": "a", "amount": "1"}),
        ]);
        let report = check_dataset(Side::A, &data, &infer_mapping_for(&data));
        assert_eq!(
            report.issues,
            vec![Issue::DuplicateIds { ids: vec!["a".into(), "b".into()] }]
        );
    }

    #[test]
    fn issue_serializes_with_kind_tag() {
        let v = serde_json::to_value(Issue::SynthesizedIds { rows: vec![2] }).unwrap();
        assert_eq!(v, json!({"kind": "synthesized_ids", "rows": [2]}));
    }
}
