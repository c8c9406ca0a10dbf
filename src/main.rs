use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use frameprof::aggregator::{Aggregator, ParseSummary};
use frameprof::cli::{Cli, OutputFormat};
use frameprof::json_output::JsonProfile;
use frameprof::profile::Profile;
use frameprof::report::ReportOptions;
use frameprof::{csv_output, filter, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Aggregate the event stream named on the command line, or stdin.
fn aggregate_input(
    input: Option<&Path>,
    aggregator: &mut Aggregator,
    profile: &mut Profile,
) -> Result<ParseSummary> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            aggregator
                .parse_reader(BufReader::new(file), profile)
                .with_context(|| format!("failed to parse {}", path.display()))
        }
        _ => aggregator
            .parse_reader(io::stdin().lock(), profile)
            .context("failed to parse event stream from stdin"),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    // Parse the call filter up front so a bad pattern fails fast
    let filter = if let Some(pattern) = &args.filter {
        filter::CallFilter::from_pattern(pattern)?
    } else {
        filter::CallFilter::all()
    };

    let mut profile = Profile::new();
    let mut aggregator = Aggregator::new();
    let summary = aggregate_input(args.input.as_deref(), &mut aggregator, &mut profile)?;

    tracing::debug!(
        "aggregated {} lines: {} calls, {} frames, {} skipped",
        summary.lines,
        summary.calls,
        summary.frames,
        summary.skipped
    );

    match args.format {
        OutputFormat::Text => {
            let options = ReportOptions {
                calls: args.calls,
                top: args.top,
                filter,
                program: args.program,
            };
            report::print_report(&profile, summary.skipped, &options);
        }
        OutputFormat::Json => {
            let output = JsonProfile::from_profile(&profile, summary.skipped);
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => {
            if args.calls {
                print!("{}", csv_output::calls_to_csv(&profile));
            } else {
                print!("{}", csv_output::programs_to_csv(&profile));
            }
        }
    }

    Ok(())
}
