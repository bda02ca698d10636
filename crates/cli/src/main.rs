// tally - reconcile two tabular datasets from the command line

mod exit_codes;
mod load;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{
    EXIT_CONFIG, EXIT_ERROR, EXIT_LOAD, EXIT_PRECONDITION, EXIT_SUCCESS, EXIT_USAGE,
};
use load::LoadError;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile two tabular datasets by identifier and amount")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile dataset A against dataset B
    #[command(after_help = "\
Examples:
  tally run ledger.csv bank.csv
  tally run ledger.csv bank.csv --json
  tally run ledger.csv bank.json --config march.recon.toml --output report.json
  tally run ledger.csv bank.csv --tolerance 0.5 --strict --fail-on-diff

Columns are inferred per file from its first row: the first header containing
id/ref/no/inv is the identifier, the first containing amount/total/val/price is
the amount. Override either per side in the config file.")]
    Run {
        /// Dataset A (.csv or .json)
        a: PathBuf,

        /// Dataset B (.csv or .json)
        b: PathBuf,

        /// TOML config with name, tolerance and per-side column overrides
        #[arg(long, short = 'c', env = "TALLY_CONFIG")]
        config: Option<PathBuf>,

        /// Absolute amount tolerance (overrides the config value)
        #[arg(long, short = 't')]
        tolerance: Option<f64>,

        /// Print the full report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the full report as JSON to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Refuse datasets that fail precondition checks (exit 5)
        #[arg(long)]
        strict: bool,

        /// Exit 6 when any record is mismatched or one-sided
        #[arg(long)]
        fail_on_diff: bool,
    },

    /// Show which columns would be used as id and amount for a file
    #[command(after_help = "\
Examples:
  tally mapping bank.csv
  tally mapping export.json --json")]
    Mapping {
        /// Dataset file (.csv or .json)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check both datasets for problems the engine would silently absorb
    #[command(after_help = "\
Examples:
  tally validate ledger.csv bank.csv
  tally validate ledger.csv bank.csv --config march.recon.toml --json

Exits 5 when either dataset has an error-severity issue. Warnings alone exit 0.")]
    Validate {
        /// Dataset A (.csv or .json)
        a: PathBuf,

        /// Dataset B (.csv or .json)
        b: PathBuf,

        /// TOML config with per-side column overrides
        #[arg(long, short = 'c', env = "TALLY_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            a,
            b,
            config,
            tolerance,
            json,
            output,
            strict,
            fail_on_diff,
        } => recon::cmd_run(a, b, config, tolerance, json, output, strict, fail_on_diff),
        Commands::Mapping { file, json } => recon::cmd_mapping(file, json),
        Commands::Validate { a, b, config, json } => recon::cmd_validate(a, b, config, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Diagnostics go to stderr only; stdout is reserved for command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PRECONDITION, message: msg.into(), hint: None }
    }

    /// Create error from a dataset load failure, with a hint where one helps.
    pub fn load(err: LoadError) -> Self {
        let hint = err.hint().map(str::to_string);
        Self { code: EXIT_LOAD, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
