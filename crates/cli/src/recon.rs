//! `tally run`, `tally mapping`, `tally validate`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tally_recon::{
    check_dataset, infer_mapping_for, resolve_mapping, run, DatasetReport, RawRow, ReconConfig,
    ReconInput, ReconReport, Severity, Side, Transaction,
};

use crate::exit_codes::EXIT_DIFFERENCES;
use crate::load::{display_name, load_rows};
use crate::CliError;

// ============================================================================
// shared
// ============================================================================

/// Config from file (or defaults), then the `--tolerance` override.
fn load_config(path: Option<&Path>, tolerance: Option<f64>) -> Result<ReconConfig, CliError> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::config(format!("cannot read config {}: {e}", path.display()))
            })?;
            ReconConfig::from_toml(&text)
                .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?
        }
        None => ReconConfig::default(),
    };

    match tolerance {
        Some(t) => {
            let config = config.with_tolerance(t);
            config.validate().map_err(|e| {
                CliError::usage(format!("--tolerance: {e}"))
                    .with_hint("tolerance is an absolute amount, e.g. --tolerance 0.01")
            })?;
            Ok(config)
        }
        None => Ok(config),
    }
}

fn load_side(path: &Path) -> Result<Vec<RawRow>, CliError> {
    load_rows(path).map_err(CliError::load)
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::general(e.to_string()))
}

fn column_label(col: &Option<String>) -> &str {
    col.as_deref().unwrap_or("(none)")
}

fn print_issues(report: &DatasetReport, label: &str) {
    eprintln!(
        "dataset {} ({}): {} rows, id={}, amount={}",
        report.side,
        label,
        report.rows,
        column_label(&report.mapping.id_col),
        column_label(&report.mapping.amount_col),
    );
    for issue in &report.issues {
        let level = match issue.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("  {level}: {issue}");
    }
}

// ============================================================================
// run
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_run(
    a: PathBuf,
    b: PathBuf,
    config_path: Option<PathBuf>,
    tolerance: Option<f64>,
    json: bool,
    output: Option<PathBuf>,
    strict: bool,
    fail_on_diff: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref(), tolerance)?;
    let rows_a = load_side(&a)?;
    let rows_b = load_side(&b)?;

    if strict {
        for (side, rows, path) in [(Side::A, &rows_a, &a), (Side::B, &rows_b, &b)] {
            let mapping = resolve_mapping(rows, &config, side);
            let report = check_dataset(side, rows, &mapping);
            if !report.issues.is_empty() {
                print_issues(&report, &display_name(path));
            }
            report.into_result().map_err(|e| {
                CliError::precondition(e.to_string())
                    .with_hint("set the column explicitly under [side_a]/[side_b] in --config")
            })?;
        }
    }

    let input = ReconInput {
        name_a: display_name(&a),
        rows_a,
        name_b: display_name(&b),
        rows_b,
    };
    let report = run(&config, &input);

    if json || output.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::general(format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }
        if json {
            write_stdout(&json_str)?;
        }
    }

    if !json {
        write_stdout(&render_differences(&report))?;
    }

    let m = &report.meta;
    let s = &report.result.summary;
    eprintln!("{}: {} vs {} (tolerance {})", m.name, m.file_name_a, m.file_name_b, m.tolerance);
    eprintln!("matched:      {}", s.matched_count);
    eprintln!("mismatched:   {}", s.mismatch_count);
    eprintln!("missing_in_a: {}", s.missing_in_a_count);
    eprintln!("missing_in_b: {}", s.missing_in_b_count);
    eprintln!("match:        {:.1}%", s.match_percentage);

    if fail_on_diff && !report.result.is_reconciled() {
        return Err(CliError {
            code: EXIT_DIFFERENCES,
            message: "datasets differ".into(),
            hint: None,
        });
    }

    Ok(())
}

/// One tab-separated line per record that did not reconcile, in report order.
fn render_differences(report: &ReconReport) -> String {
    let r = &report.result;
    if r.is_reconciled() {
        return format!("all {} records reconciled", r.summary.matched_count);
    }

    let mut lines = Vec::new();
    for m in &r.mismatches {
        lines.push(format!("mismatch\t{}\t{}", m.a.id, m.reason));
    }
    let one_sided = |kind: &str, t: &Transaction| format!("{kind}\t{}\t{}", t.id, t.amount);
    for t in &r.missing_in_b {
        lines.push(one_sided("missing_in_b", t));
    }
    for t in &r.missing_in_a {
        lines.push(one_sided("missing_in_a", t));
    }
    lines.join("\n")
}

// ============================================================================
// mapping
// ============================================================================

pub fn cmd_mapping(file: PathBuf, json: bool) -> Result<(), CliError> {
    let rows = load_side(&file)?;
    let mapping = infer_mapping_for(&rows);
    let columns: Vec<&str> = rows
        .first()
        .map(|r| r.keys().map(String::as_str).collect())
        .unwrap_or_default();

    if json {
        let value = serde_json::json!({
            "file": display_name(&file),
            "rows": rows.len(),
            "columns": columns,
            "mapping": mapping,
        });
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        return write_stdout(&text);
    }

    write_stdout(&format!(
        "file:    {}\nrows:    {}\ncolumns: {}\nid:      {}\namount:  {}",
        display_name(&file),
        rows.len(),
        columns.join(", "),
        column_label(&mapping.id_col),
        column_label(&mapping.amount_col),
    ))
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(
    a: PathBuf,
    b: PathBuf,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref(), None)?;
    let rows_a = load_side(&a)?;
    let rows_b = load_side(&b)?;

    let reports = [
        check_dataset(Side::A, &rows_a, &resolve_mapping(&rows_a, &config, Side::A)),
        check_dataset(Side::B, &rows_b, &resolve_mapping(&rows_b, &config, Side::B)),
    ];

    if json {
        let value = serde_json::json!({
            "ok": !reports.iter().any(DatasetReport::has_errors),
            "datasets": reports,
        });
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        write_stdout(&text)?;
    } else {
        print_issues(&reports[0], &display_name(&a));
        print_issues(&reports[1], &display_name(&b));
    }

    let failed: Vec<String> = reports
        .iter()
        .filter(|r| r.has_errors())
        .map(|r| r.side.to_string())
        .collect();
    if !failed.is_empty() {
        return Err(CliError::precondition(format!(
            "dataset {} failed precondition checks",
            failed.join(" and ")
        )));
    }

    if !json {
        write_stdout("ok")?;
    }
    Ok(())
}
