//! `tledger audit` — config-driven reconciliation of a council audit export.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use troopledger_recon::engine::{
    load_audit_csv, load_cookies_csv, load_orders_csv, load_sellers_csv,
};
use troopledger_recon::{run, AuditInput, MatchConfig};

use crate::exit_codes::{
    EXIT_AUDIT_BAD_SCHEMA, EXIT_AUDIT_INVALID_CONFIG, EXIT_AUDIT_RUNTIME,
    EXIT_AUDIT_UNRECONCILED,
};
use crate::CliError;

#[derive(Subcommand)]
pub enum AuditCommands {
    /// Run reconciliation from a TOML season config file
    #[command(after_help = "\
Examples:
  tledger audit run season.audit.toml
  tledger audit run season.audit.toml --json
  tledger audit run season.audit.toml --output report.json")]
    Run {
        /// Path to the .audit.toml season config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a season config without running
    #[command(after_help = "\
Examples:
  tledger audit validate season.audit.toml")]
    Validate {
        /// Path to the .audit.toml season config file
        config: PathBuf,
    },
}

pub fn cmd_audit(cmd: AuditCommands) -> Result<(), CliError> {
    match cmd {
        AuditCommands::Run { config, json, output } => cmd_audit_run(config, json, output),
        AuditCommands::Validate { config } => cmd_audit_validate(config),
    }
}

fn audit_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn cmd_audit_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| audit_err(EXIT_AUDIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| audit_err(EXIT_AUDIT_INVALID_CONFIG, e.to_string()))?;

    // Input files resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let input = load_input(base_dir, &config)?;

    let report = run(&config, &input);

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| audit_err(EXIT_AUDIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| audit_err(EXIT_AUDIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprintln!(
        "audit '{}': {} rows vs {} orders — {} perfect, {} partial, {} orders unmatched, {} extra rows",
        config.name,
        report.total_audit_rows,
        report.total_orders,
        report.match_count,
        report.partial_match_count,
        report.unmatched_orders.len(),
        report.audit_extra_rows.len(),
    );

    if let Some(error) = report.error {
        return Err(audit_err(EXIT_AUDIT_BAD_SCHEMA, error)
            .with_hint("the export must carry DATE, TYPE, FROM and TO columns"));
    }

    if report.partial_match_count > 0
        || !report.unmatched_orders.is_empty()
        || !report.audit_extra_rows.is_empty()
    {
        return Err(audit_err(EXIT_AUDIT_UNRECONCILED, "unreconciled items found"));
    }

    Ok(())
}

fn load_input(base_dir: &Path, config: &MatchConfig) -> Result<AuditInput, CliError> {
    let read = |file: &str| -> Result<String, CliError> {
        let path = base_dir.join(file);
        std::fs::read_to_string(&path)
            .map_err(|e| audit_err(EXIT_AUDIT_RUNTIME, format!("cannot read {}: {e}", path.display())))
    };
    let engine = |e: troopledger_recon::ReconError| audit_err(EXIT_AUDIT_RUNTIME, e.to_string());

    let (headers, rows) = load_audit_csv(&read(&config.files.audit)?).map_err(engine)?;
    Ok(AuditInput {
        headers,
        rows,
        orders: load_orders_csv(&read(&config.files.orders)?).map_err(engine)?,
        sellers: load_sellers_csv(&read(&config.files.sellers)?).map_err(engine)?,
        cookies: load_cookies_csv(&read(&config.files.cookies)?).map_err(engine)?,
    })
}

fn cmd_audit_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| audit_err(EXIT_AUDIT_RUNTIME, format!("cannot read config: {e}")))?;

    match MatchConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: season '{}' with {} acceptance tier(s), date window {}d, {} name edit(s)",
                config.name,
                config.acceptance.len(),
                config.tolerance.date_window_days,
                config.tolerance.max_name_edits,
            );
            Ok(())
        }
        Err(e) => Err(audit_err(EXIT_AUDIT_INVALID_CONFIG, e.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
