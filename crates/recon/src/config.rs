use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    pub files: FilesConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default = "default_acceptance")]
    pub acceptance: Vec<AcceptanceRule>,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Input files for one season, resolved relative to the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Council audit export (raw rows, any supported date format).
    pub audit: String,
    /// The troop's recorded orders.
    pub orders: String,
    pub sellers: String,
    /// Season cookie catalog; its abbreviations drive quantity comparison.
    pub cookies: String,
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    /// Partial pass accepts dates up to this many days apart.
    #[serde(default = "default_date_window_days")]
    pub date_window_days: u32,
    /// Maximum Levenshtein distance for a fuzzy name match.
    #[serde(default = "default_max_name_edits")]
    pub max_name_edits: usize,
    /// Per-cookie quantity delta still counted as agreement.
    #[serde(default = "default_cookie_qty_slack")]
    pub cookie_qty_slack: i64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            date_window_days: default_date_window_days(),
            max_name_edits: default_max_name_edits(),
            cookie_qty_slack: default_cookie_qty_slack(),
        }
    }
}

fn default_date_window_days() -> u32 {
    2
}

fn default_max_name_edits() -> usize {
    2
}

fn default_cookie_qty_slack() -> i64 {
    1
}

// ---------------------------------------------------------------------------
// Acceptance
// ---------------------------------------------------------------------------

/// One acceptance tier for the partial pass.
///
/// A candidate is kept when ANY tier holds: at least `min_fields_matched`
/// of the five non-cookie comparisons are true AND the cookie percentage is
/// strictly above `min_cookie_percent`.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptanceRule {
    pub min_fields_matched: u8,
    pub min_cookie_percent: f64,
}

/// The stock tiers: (>=1 field AND >50%) or (>=2 fields AND >20%).
pub fn default_acceptance() -> Vec<AcceptanceRule> {
    vec![
        AcceptanceRule {
            min_fields_matched: 1,
            min_cookie_percent: 50.0,
        },
        AcceptanceRule {
            min_fields_matched: 2,
            min_cookie_percent: 20.0,
        },
    ]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        // Without any tier the partial pass can never accept a candidate.
        if self.acceptance.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one acceptance rule is required".into(),
            ));
        }

        for (i, rule) in self.acceptance.iter().enumerate() {
            if rule.min_fields_matched > 5 {
                return Err(ReconError::ConfigValidation(format!(
                    "acceptance rule {i}: min_fields_matched must be 0-5, got {}",
                    rule.min_fields_matched
                )));
            }
            if !(0.0..=100.0).contains(&rule.min_cookie_percent) {
                return Err(ReconError::ConfigValidation(format!(
                    "acceptance rule {i}: min_cookie_percent must be 0-100, got {}",
                    rule.min_cookie_percent
                )));
            }
        }

        if self.tolerance.cookie_qty_slack < 0 {
            return Err(ReconError::ConfigValidation(format!(
                "cookie_qty_slack must be >= 0, got {}",
                self.tolerance.cookie_qty_slack
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
