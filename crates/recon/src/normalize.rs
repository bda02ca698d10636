//! Raw rows into typed transactions.
//!
//! Everything here is best-effort and total: malformed amounts become `0`,
//! missing identifiers become a positional `ROW-{i}` placeholder. Callers that
//! need to reject such input run [`crate::validate`] first.

use crate::model::{ColumnMapping, RawRow, RawValue, Transaction};

/// Normalize a raw amount cell to a finite number.
///
/// - numbers pass through
/// - null, `""` and `false` are 0
/// - anything else is stringified, every char outside `[0-9.-]` is dropped
///   (currency symbols, thousands separators, whitespace), and the longest
///   leading decimal literal is parsed; nothing parsable is 0
///
/// Ambiguous locale formats are not special-cased: `"1.234,50"` reads as `1.2345`.
pub fn normalize_amount(raw: &RawValue) -> f64 {
    let value = amount_literal(raw).unwrap_or(0.0);

    // Keep the amount finite and drop the sign of zero.
    if value.is_finite() && value != 0.0 {
        value
    } else {
        0.0
    }
}

/// The number a raw cell actually spells, before the finite/zero clamp.
/// `None` when [`normalize_amount`] falls back to 0 because nothing parsed
/// (empty cells included).
pub fn amount_literal(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) => n.as_f64(),
        RawValue::Null | RawValue::Bool(false) => None,
        RawValue::String(s) if s.is_empty() => None,
        other => {
            let text = value_text(other).unwrap_or_default();
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_leading_decimal(&cleaned)
        }
    }
}

/// Parse the longest prefix of the form `-?digits*(.digits*)?` holding at least
/// one digit. `"1.2.3"` reads as `1.2`, `"12-5"` as `12`, `"-"` as nothing.
fn parse_leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_part = &s[frac_start..j];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let literal = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
    );
    literal.parse().ok()
}

/// Display text of a raw cell, `None` for null.
///
/// Whole numbers print without a fractional part (`7`, not `7.0`); nested
/// arrays/objects print as compact JSON.
pub fn value_text(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Null => None,
        RawValue::String(s) => Some(s.clone()),
        RawValue::Bool(b) => Some(b.to_string()),
        RawValue::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        nested => Some(nested.to_string()),
    }
}

fn field<'a>(row: &'a RawRow, col: Option<&str>) -> Option<&'a RawValue> {
    col.and_then(|c| row.get(c))
}

/// Convert a dataset's rows into transactions, in input order.
///
/// A missing or blank identifier becomes `ROW-{index}`. Placeholders are
/// positional, so two datasets that both lack an id at the same index will
/// pair those rows with each other.
pub fn parse_transactions(rows: &[RawRow], mapping: &ColumnMapping) -> Vec<Transaction> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let id = field(row, mapping.id_col.as_deref())
                .and_then(value_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("ROW-{index}"));

            let amount = field(row, mapping.amount_col.as_deref())
                .map(normalize_amount)
                .unwrap_or(0.0);

            let date = field(row, mapping.date_col.as_deref())
                .and_then(value_text)
                .filter(|s| !s.trim().is_empty());

            Transaction {
                id,
                amount,
                date,
                description: RawValue::Object(row.clone()).to_string(),
                original_row: row.clone(),
            }
        })
        .collect()
}
