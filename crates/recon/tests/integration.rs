use std::path::PathBuf;

use serde_json::json;
use tally_recon::{
    check_dataset, infer_mapping, normalize_amount, parse_transactions, reconcile_default, run,
    ColumnMapping, Issue, RawRow, ReconConfig, ReconInput, Side,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_rows(name: &str) -> Vec<RawRow> {
    let path = fixtures_dir().join(name);
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&data).unwrap()
}

fn rows(values: Vec<serde_json::Value>) -> Vec<RawRow> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn id_amount() -> ColumnMapping {
    ColumnMapping {
        id_col: Some("id".into()),
        amount_col: Some("amount".into()),
        date_col: None,
    }
}

fn fixture_input() -> ReconInput {
    ReconInput {
        name_a: "ledger.json".into(),
        rows_a: load_rows("ledger.json"),
        name_b: "bank.json".into(),
        rows_b: load_rows("bank.json"),
    }
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn identical_single_record_matches() {
    let a = parse_transactions(&rows(vec![json!({"id": "1", "amount": 100})]), &id_amount());
    let b = parse_transactions(&rows(vec![json!({"id": "1", "amount": 100})]), &id_amount());
    let out = reconcile_default(&a, &b);

    assert_eq!(out.summary.matched_count, 1);
    assert_eq!(out.summary.mismatch_count, 0);
    assert_eq!(out.summary.missing_in_a_count, 0);
    assert_eq!(out.summary.missing_in_b_count, 0);
    assert_eq!(out.summary.match_percentage, 100.0);
}

#[test]
fn differing_amount_is_mismatch() {
    let a = parse_transactions(&rows(vec![json!({"id": "1", "amount": 100})]), &id_amount());
    let b = parse_transactions(&rows(vec![json!({"id": "1", "amount": 105})]), &id_amount());
    let out = reconcile_default(&a, &b);

    assert_eq!(out.summary.matched_count, 0);
    assert_eq!(out.mismatches.len(), 1);
    let reason = &out.mismatches[0].reason;
    assert!(reason.contains("100") && reason.contains("105"), "{reason}");
    assert_eq!(out.summary.match_percentage, 0.0);
}

#[test]
fn one_sided_record_is_missing_in_b() {
    let a = parse_transactions(&rows(vec![json!({"id": "1", "amount": 50})]), &id_amount());
    let out = reconcile_default(&a, &[]);

    assert_eq!(out.missing_in_b.len(), 1);
    assert_eq!(out.missing_in_b[0].id, "1");
    assert_eq!(out.missing_in_b[0].amount, 50.0);
    assert!(out.missing_in_a.is_empty());
    assert_eq!(out.summary.match_percentage, 0.0);
}

#[test]
fn empty_id_synthesizes_positional_placeholder() {
    let data = rows(vec![
        json!({"id": "a", "amount": 1}),
        json!({"id": "b", "amount": 2}),
        json!({"id": "", "amount": 3}),
    ]);
    let txs = parse_transactions(&data, &id_amount());
    assert_eq!(txs[2].id, "ROW-2");
}

#[test]
fn placeholders_collide_only_at_same_index() {
    let a = rows(vec![json!({"id": "", "amount": 1}), json!({"id": "x", "amount": 1})]);
    let b = rows(vec![json!({"id": "", "amount": 1}), json!({"id": "", "amount": 1})]);
    let out = reconcile_default(
        &parse_transactions(&a, &id_amount()),
        &parse_transactions(&b, &id_amount()),
    );
    assert_eq!(out.matches.len(), 1);
    assert_eq!(out.matches[0].a.id, "ROW-0");
    assert_eq!(out.missing_in_a[0].id, "ROW-1");
}

#[test]
fn currency_text_normalizes() {
    assert_eq!(normalize_amount(&json!("$1,234.56")), 1234.56);
    assert_eq!(normalize_amount(&json!("abc")), 0.0);
}

// -------------------------------------------------------------------------
// Fixture datasets through the engine
// -------------------------------------------------------------------------

#[test]
fn fixture_run_with_inferred_mapping() {
    let report = run(&ReconConfig::default(), &fixture_input());

    assert_eq!(report.meta.mapping_a.id_col.as_deref(), Some("Invoice No"));
    assert_eq!(report.meta.mapping_a.amount_col.as_deref(), Some("Total"));
    assert_eq!(report.meta.mapping_b.id_col.as_deref(), Some("Reference"));
    assert_eq!(report.meta.mapping_b.amount_col.as_deref(), Some("Amount"));

    let s = &report.result.summary;
    assert_eq!(s.total_a, 5);
    assert_eq!(s.total_b, 4);
    assert_eq!(s.matched_count, 2);
    assert_eq!(s.mismatch_count, 1);
    assert_eq!(s.missing_in_a_count, 1);
    assert_eq!(s.missing_in_b_count, 2);
    assert!((s.match_percentage - 100.0 / 3.0).abs() < 1e-9);

    let m = &report.result.mismatches[0];
    assert_eq!(m.a.id, "INV-1003");
    assert_eq!(m.reason, "Amount Mismatch: 2000 vs 1950 (Diff: 50.00)");

    let missing_b: Vec<&str> = report.result.missing_in_b.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(missing_b, ["INV-1004", "ROW-4"]);
    assert_eq!(report.result.missing_in_a[0].id, "DEP-0042");
}

#[test]
fn fixture_run_with_config_file() {
    let toml = std::fs::read_to_string(fixtures_dir().join("march.recon.toml")).unwrap();
    let config = ReconConfig::from_toml(&toml).unwrap();
    let report = run(&config, &fixture_input());

    assert_eq!(report.meta.name, "March close");
    assert_eq!(report.meta.mapping_a.date_col.as_deref(), Some("Issued"));
    assert_eq!(report.meta.mapping_b.date_col.as_deref(), Some("Date"));

    let first = &report.result.matches[0];
    assert_eq!(first.a.id, "INV-1001");
    assert_eq!(first.a.date.as_deref(), Some("2024-03-01"));
    assert_eq!(first.b.date.as_deref(), Some("2024-03-02"));
}

#[test]
fn wide_tolerance_absorbs_the_short_payment() {
    let config = ReconConfig::default().with_tolerance(50.0);
    let report = run(&config, &fixture_input());
    assert_eq!(report.result.summary.matched_count, 3);
    assert_eq!(report.result.summary.mismatch_count, 0);
}

#[test]
fn original_row_kept_verbatim() {
    let report = run(&ReconConfig::default(), &fixture_input());
    let b = &report.result.matches[0].b;
    assert_eq!(b.original_row.get("Description"), Some(&json!("WIRE ACME CORP")));
    let keys: Vec<&str> = b.original_row.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Date", "Reference", "Description", "Amount"]);
}

// -------------------------------------------------------------------------
// Report envelope
// -------------------------------------------------------------------------

#[test]
fn report_serializes_with_camel_case_fields() {
    let report = run(&ReconConfig::default(), &fixture_input());
    let v = serde_json::to_value(&report).unwrap();

    assert_eq!(v["meta"]["fileNameA"], "ledger.json");
    assert_eq!(v["meta"]["fileNameB"], "bank.json");
    assert_eq!(v["meta"]["mappingA"]["idCol"], "Invoice No");
    assert_eq!(v["result"]["summary"]["totalA"], 5);
    assert_eq!(v["result"]["summary"]["missingInBCount"], 2);
    assert!(v["result"]["missingInA"].is_array());
    assert!(v["result"]["matches"][0]["a"]["originalRow"].is_object());

    let back: tally_recon::ReconReport = serde_json::from_value(v).unwrap();
    assert_eq!(back.result, report.result);
}

// -------------------------------------------------------------------------
// Preconditions
// -------------------------------------------------------------------------

#[test]
fn fixture_preconditions_warn_on_missing_id() {
    let rows_a = load_rows("ledger.json");
    let report = check_dataset(Side::A, &rows_a, &infer_mapping(&rows_a[0]));
    assert!(!report.has_errors());
    assert_eq!(report.issues, vec![Issue::SynthesizedIds { rows: vec![4] }]);

    let rows_b = load_rows("bank.json");
    let report = check_dataset(Side::B, &rows_b, &infer_mapping(&rows_b[0]));
    assert!(report.issues.is_empty());
}
