use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use gridstitch::{
    CsvOptions, EngineOptions, HeaderMode, QualityMode, ReconstructionReport, ToleranceTier,
    fragment_reader, reconstruct_to_csv_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "fragments2csv",
    version,
    about = "Reconstruct tables from positioned text fragments into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconstruct tables and write merged CSV output.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input fragment list (JSON array of {text, page, bbox, confidence}).
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    /// Tolerance tier as row_tol,col_tol; repeat for a retry ladder.
    #[arg(long = "tier")]
    tiers: Vec<String>,

    /// Minimum rows for a grid to count as a table.
    #[arg(long, default_value_t = 2)]
    min_rows: usize,

    /// Minimum columns for a grid to count as a table.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Force header interpretation on first row of each table.
    #[arg(long, conflicts_with = "no_header")]
    has_header: bool,

    /// Disable header interpretation; keep first row as data.
    #[arg(long, conflicts_with = "has_header")]
    no_header: bool,

    /// Fail instead of keeping low-confidence tables.
    #[arg(long, conflicts_with = "skip_ambiguous")]
    strict: bool,

    /// Drop low-confidence tables instead of keeping them.
    #[arg(long, conflicts_with = "strict")]
    skip_ambiguous: bool,

    /// Longest cell text (chars) still spliced across a page break.
    #[arg(long, default_value_t = 12)]
    splice_chars: usize,

    /// Drop page column from output CSV.
    #[arg(long = "nopage")]
    no_page: bool,

    /// Drop table_id column from output CSV.
    #[arg(long = "notable")]
    no_table: bool,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<(EngineOptions, CsvOptions)> {
    let mut engine = EngineOptions::default();

    if !args.tiers.is_empty() {
        engine.tiers = args
            .tiers
            .iter()
            .map(|value| {
                ToleranceTier::from_str(value)
                    .map_err(|error| anyhow!("invalid tolerance tier: {error}"))
                    .with_context(|| format!("failed to parse --tier '{value}'"))
            })
            .collect::<Result<Vec<_>>>()?;
    }
    engine.min_rows = args.min_rows;
    engine.min_cols = args.min_cols;
    engine.boundary.max_splice_chars = args.splice_chars;
    engine.quality_mode = if args.strict {
        QualityMode::Strict
    } else if args.skip_ambiguous {
        QualityMode::SkipAmbiguous
    } else {
        QualityMode::BestEffort
    };

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let header_mode = if args.has_header {
        HeaderMode::HasHeader
    } else if args.no_header {
        HeaderMode::NoHeader
    } else {
        HeaderMode::AutoDetect
    };

    let csv = CsvOptions {
        delimiter: args.delimiter as u8,
        header_mode,
        include_page: !args.no_page,
        include_table_id: !args.no_table,
    };

    Ok((engine, csv))
}

fn log_report(report: &ReconstructionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} tier={:?} count={:?} confidence={:?}: {}",
                warning.code,
                warning.page,
                warning.tier,
                warning.count,
                warning.confidence,
                warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ReconstructionReport> {
    let (engine, csv) = parse_options(args)?;
    let pages = fragment_reader::read_fragments_file(&args.input)
        .with_context(|| format!("failed to read fragments from '{}'", args.input.display()))?;
    reconstruct_to_csv_file(&pages, &args.output, &engine, &csv)
        .with_context(|| format!("failed to reconstruct tables from '{}'", args.input.display()))
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridstitch=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.row_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
