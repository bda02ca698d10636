//! `tally-recon`: two-dataset reconciliation engine.
//!
//! Pure engine crate: receives rows already extracted from their source
//! files, infers which columns carry the id and amount, normalizes amounts,
//! and classifies every record as matched, mismatched, or missing on one side.
//! No file formats and no IO.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod mapping;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod validate;

pub use config::ReconConfig;
pub use engine::{resolve_mapping, run};
pub use error::ReconError;
pub use evidence::compute_summary;
pub use mapping::{infer_mapping, infer_mapping_for, ColumnOverrides};
pub use matcher::{reconcile, reconcile_default, DEFAULT_TOLERANCE};
pub use model::{
    ColumnMapping, MatchedPair, Mismatch, RawRow, RawValue, ReconInput, ReconMeta, ReconReport,
    ReconResult, ReconSummary, Transaction,
};
pub use normalize::{amount_literal, normalize_amount, parse_transactions, value_text};
pub use validate::{check_dataset, DatasetReport, Issue, Severity, Side};
