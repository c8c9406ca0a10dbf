//! CLI argument parsing for frameprof

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for profile reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text tables (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "frameprof")]
#[command(version)]
#[command(about = "Aggregate a replay profiling stream into call, program, and frame statistics", long_about = None)]
pub struct Cli {
    /// Event stream to aggregate ("-" or absent reads stdin)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show the per-call listing (text) or per-call rows (csv) instead of
    /// program statistics only
    #[arg(short = 'l', long = "calls")]
    pub calls: bool,

    /// Rows in the per-call listing, most expensive first; 0 shows all
    #[arg(long = "top", value_name = "N", default_value = "20")]
    pub top: usize,

    /// Only list calls whose name matches a regular expression
    #[arg(short = 'e', long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Only list calls issued under one program id
    #[arg(short = 'p', long = "program", value_name = "ID")]
    pub program: Option<u32>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_stdin_and_text() {
        let cli = Cli::parse_from(["frameprof"]);
        assert!(cli.input.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.calls);
        assert_eq!(cli.top, 20);
        assert!(cli.filter.is_none());
        assert!(cli.program.is_none());
    }

    #[test]
    fn test_cli_parses_input_path() {
        let cli = Cli::parse_from(["frameprof", "replay.prof"]);
        assert_eq!(cli.input, Some(PathBuf::from("replay.prof")));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["frameprof", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_format_csv() {
        let cli = Cli::parse_from(["frameprof", "--format", "csv"]);
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_cli_calls_flag() {
        let cli = Cli::parse_from(["frameprof", "-l"]);
        assert!(cli.calls);
    }

    #[test]
    fn test_cli_top_custom() {
        let cli = Cli::parse_from(["frameprof", "--top", "5"]);
        assert_eq!(cli.top, 5);
    }

    #[test]
    fn test_cli_filter_expression() {
        let cli = Cli::parse_from(["frameprof", "-e", "^glDraw"]);
        assert_eq!(cli.filter.as_deref(), Some("^glDraw"));
    }

    #[test]
    fn test_cli_program_id() {
        let cli = Cli::parse_from(["frameprof", "-p", "3"]);
        assert_eq!(cli.program, Some(3));
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["frameprof"]);
        assert!(!cli.debug);
    }
}
