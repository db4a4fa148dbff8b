//! CLI argument definitions for the trade importer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tj_model::TradingMode;

#[derive(Parser)]
#[command(
    name = "trade-import",
    version,
    about = "Import trade journals from CSV",
    long_about = "Import trades from an arbitrary CSV export into a trade journal.\n\n\
                  Columns are matched to journal fields by header name and sampled values,\n\
                  categorical values are normalized, and every row is validated on its own."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in logs (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the journal fields columns can be mapped to.
    Fields,

    /// Show the detected mapping and validation results without storing.
    Preview(PreviewArgs),

    /// Validate a CSV file and store its trades.
    Import(ImportArgs),
}

/// Options shared by every command that reads a CSV file.
#[derive(Args)]
pub struct InputArgs {
    /// CSV file to import.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Map a column by hand, e.g. `--map "Pair=market"`. An empty field unmaps it.
    #[arg(long = "map", value_name = "HEADER=FIELD")]
    pub map: Vec<String>,

    /// Ask the configured translator for unrecognized headers and values.
    #[arg(long = "translate")]
    pub translate: bool,

    /// Default risk % for rows without one.
    #[arg(long = "risk", value_name = "PERCENT")]
    pub risk: Option<f64>,

    /// Default risk:reward ratio for rows without one.
    #[arg(long = "rr", value_name = "RATIO")]
    pub rr: Option<f64>,

    /// Account balance used to compute monetary profit.
    #[arg(long = "balance", value_name = "AMOUNT")]
    pub balance: Option<f64>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// List every failed row instead of the first few.
    #[arg(long = "all-errors")]
    pub all_errors: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Target account.
    #[arg(long = "account", value_name = "ID")]
    pub account: Option<String>,

    /// Strategy attached to every imported trade.
    #[arg(long = "strategy", value_name = "ID")]
    pub strategy: Option<String>,

    /// Journal the trades go into.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// JSON-lines file trades are appended to.
    #[arg(long = "store", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Validate and report without storing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Live,
    Backtesting,
    Demo,
}

impl From<ModeArg> for TradingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Live => Self::Live,
            ModeArg::Backtesting => Self::Backtesting,
            ModeArg::Demo => Self::Demo,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Splits a `HEADER=FIELD` override. The field part may be empty.
pub fn parse_map_override(raw: &str) -> Result<(String, Option<String>), String> {
    let (header, field) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected HEADER=FIELD, got '{raw}'"))?;
    let header = header.trim();
    if header.is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }
    let field = field.trim();
    Ok((
        header.to_string(),
        (!field.is_empty()).then(|| field.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_map_override() {
        assert_eq!(
            parse_map_override("Buy/Sell = direction"),
            Ok(("Buy/Sell".to_string(), Some("direction".to_string())))
        );
        assert_eq!(
            parse_map_override("Notes="),
            Ok(("Notes".to_string(), None))
        );
        assert!(parse_map_override("Notes").is_err());
        assert!(parse_map_override("=notes").is_err());
    }

    #[test]
    fn test_import_flags() {
        let cli = Cli::parse_from([
            "trade-import",
            "import",
            "trades.csv",
            "--rr",
            "2",
            "--map",
            "Pair=market",
            "--mode",
            "demo",
            "--account",
            "acc-1",
            "--dry-run",
        ]);
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.input.rr, Some(2.0));
        assert_eq!(args.input.map, vec!["Pair=market".to_string()]);
        assert!(matches!(args.mode, Some(ModeArg::Demo)));
        assert!(args.dry_run);
    }
}
