//! scoresheet CLI - score report generator
//!
//! Reads a score CSV, computes summary statistics and writes a styled Excel
//! report with a Details and a Summary sheet.

mod diagnostics;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scoresheet_core::{Metrics, ReportAssembler, ReportConfig, DEFAULT_PASS_THRESHOLD};
use scoresheet_render::XlsxRenderer;

use crate::diagnostics::ExitCode;

#[derive(Parser)]
#[command(name = "scoresheet")]
#[command(author, version, about = "Generate a styled Excel report from a score CSV", long_about = None)]
struct Cli {
    /// Input CSV file with `name` and `score` columns
    #[arg(value_name = "INPUT_CSV")]
    input: PathBuf,

    /// Output Excel file
    #[arg(value_name = "OUTPUT_XLSX")]
    output: PathBuf,

    /// Pass score threshold (inclusive)
    #[arg(
        long = "pass-score",
        env = "SCORESHEET_PASS_SCORE",
        default_value_t = DEFAULT_PASS_THRESHOLD,
        value_parser = parse_threshold
    )]
    pass_score: f64,

    /// Add a Pass/Fail bar chart to the Summary sheet
    #[arg(long)]
    chart: bool,

    /// Format of the success message
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Success payload for `--format json`
#[derive(Serialize)]
struct RunSummary<'a> {
    output: &'a Path,
    metrics: &'a Metrics,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = ReportConfig::new().pass_threshold(cli.pass_score);
    if cli.chart {
        config = config.with_chart();
    }

    let table = scoresheet_parser::read_csv(&cli.input)?;
    let plan = ReportAssembler::new(config).assemble(&table)?;
    scoresheet_render::save_xlsx(&XlsxRenderer::new(), &plan, &cli.output)?;
    info!(output = %cli.output.display(), "report saved");

    match cli.format {
        OutputFormat::Text => {
            println!("Styled Excel report generated successfully.");
            println!("Output: {}", cli.output.display());
        }
        OutputFormat::Json => {
            let summary = RunSummary {
                output: &cli.output,
                metrics: &plan.metrics,
            };
            let json = serde_json::to_string_pretty(&summary)
                .context("failed to serialize run summary")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(err) => diagnostics::emit_error(&mut io::stderr().lock(), &err),
    };
    code.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["scoresheet", "in.csv", "out.xlsx"]).unwrap();
        assert_eq!(cli.pass_score, 60.0);
        assert!(!cli.chart);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "scoresheet",
            "in.csv",
            "out.xlsx",
            "--pass-score",
            "72.5",
            "--chart",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.pass_score, 72.5);
        assert!(cli.chart);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn threshold_must_be_finite() {
        assert_eq!(parse_threshold(" 60 "), Ok(60.0));
        assert!(parse_threshold("nan").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(parse_threshold("sixty").is_err());
    }
}
