use crate::config::ReconConfig;
use crate::mapping::infer_mapping_for;
use crate::matcher::reconcile;
use crate::model::{ColumnMapping, RawRow, ReconInput, ReconMeta, ReconReport};
use crate::normalize::parse_transactions;
use crate::validate::Side;

/// Run reconciliation per config. Returns the result wrapped with run metadata.
///
/// Each side's mapping is inferred from its own first row, then the config's
/// overrides for that side are applied. Infallible and stateless: identical
/// inputs give identical results (only `meta.run_at` differs).
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconReport {
    let mapping_a = resolve_mapping(&input.rows_a, config, Side::A);
    let mapping_b = resolve_mapping(&input.rows_b, config, Side::B);

    tracing::debug!(file = %input.name_a, rows = input.rows_a.len(), mapping = ?mapping_a, "dataset A");
    tracing::debug!(file = %input.name_b, rows = input.rows_b.len(), mapping = ?mapping_b, "dataset B");

    let tx_a = parse_transactions(&input.rows_a, &mapping_a);
    let tx_b = parse_transactions(&input.rows_b, &mapping_b);

    let result = reconcile(&tx_a, &tx_b, config.tolerance);

    tracing::info!(
        name = %config.name,
        matched = result.summary.matched_count,
        mismatched = result.summary.mismatch_count,
        missing_in_a = result.summary.missing_in_a_count,
        missing_in_b = result.summary.missing_in_b_count,
        "reconciliation complete"
    );

    ReconReport {
        meta: ReconMeta {
            name: config.name.clone(),
            file_name_a: input.name_a.clone(),
            file_name_b: input.name_b.clone(),
            mapping_a,
            mapping_b,
            tolerance: config.tolerance,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        result,
    }
}

/// The mapping [`run`] will use for one side: inferred, then overridden.
pub fn resolve_mapping(rows: &[RawRow], config: &ReconConfig, side: Side) -> ColumnMapping {
    let overrides = match side {
        Side::A => &config.side_a,
        Side::B => &config.side_b,
    };
    infer_mapping_for(rows).with_overrides(overrides)
}
