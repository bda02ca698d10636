use serde::Deserialize;

use crate::error::ReconError;
use crate::mapping::ColumnOverrides;
use crate::matcher::DEFAULT_TOLERANCE;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Per-run settings. A plain value handed to [`crate::run`]; nothing here is
/// global or cached between runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Absolute amount tolerance; `|a - b| <= tolerance` is a match.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Column overrides for dataset A, applied on top of inference.
    #[serde(default)]
    pub side_a: ColumnOverrides,
    /// Column overrides for dataset B, applied on top of inference.
    #[serde(default)]
    pub side_b: ColumnOverrides,
}

fn default_name() -> String {
    "reconciliation".into()
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tolerance: DEFAULT_TOLERANCE,
            side_a: ColumnOverrides::default(),
            side_b: ColumnOverrides::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style tolerance override; re-validate before use.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be a finite number >= 0, got {}",
                self.tolerance
            )));
        }

        for (side, overrides) in [("side_a", &self.side_a), ("side_b", &self.side_b)] {
            let named = [
                ("id", &overrides.id),
                ("amount", &overrides.amount),
                ("date", &overrides.date),
            ];
            for (field, value) in named {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    return Err(ReconError::ConfigValidation(format!(
                        "{side}.{field} must not be empty"
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
