//! deepdiff command-line interface.
//!
//! Parses two structured documents and reports every path where they differ,
//! using the same deep comparison engine the library exposes for Rust values.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use deepdiff::{
    compare_as_list_with, compare_as_map_with, format_list, format_map, parse_file, parse_stdin,
    DiffConfig, Node, OutputFormat, OutputOptions,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// deepdiff - Deep structural comparison of structured data
///
/// Compares JSON, YAML and TOML documents and prints each difference with the
/// dotted path where it occurs. Use `-` for one of the files to read stdin.
#[derive(Parser)]
#[command(name = "deepdiff")]
#[command(version)]
#[command(about = "Deep structural comparison of structured data", long_about = None)]
struct Cli {
    /// First file to compare
    #[arg(value_name = "FILE1")]
    file1: PathBuf,

    /// Second file to compare
    #[arg(value_name = "FILE2")]
    file2: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Report differences as a path → old/new map instead of lines
    #[arg(short, long)]
    map: bool,

    /// Decimal places numbers are rounded to before comparing
    #[arg(long, default_value_t = DiffConfig::default().float_precision)]
    float_precision: usize,

    /// Stop after this many differences
    #[arg(long, default_value_t = DiffConfig::default().max_diff)]
    max_diff: usize,

    /// Maximum recursion depth (each document level counts twice)
    #[arg(long, default_value_t = DiffConfig::default().max_depth)]
    max_depth: usize,

    /// Log anomalies (depth cut-offs, type mismatches) to stderr
    #[arg(long)]
    log_errors: bool,

    /// Maximum length for displayed values in map output
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Verbose output (show parsing progress)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only show differences, suppress summary)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    if is_stdin(&cli.file1) && is_stdin(&cli.file2) {
        bail!("only one of FILE1 and FILE2 can be read from stdin");
    }

    let config = DiffConfig {
        float_precision: cli.float_precision,
        max_diff: cli.max_diff,
        max_depth: cli.max_depth,
        log_errors: cli.log_errors,
        ..Default::default()
    };
    config.validate()?;

    let old = load(&cli.file1).context("Failed to parse first file")?;
    let new = load(&cli.file2).context("Failed to parse second file")?;

    tracing::info!(max_depth = config.max_depth, max_diff = config.max_diff, "Computing diff");

    let output_format: OutputFormat = cli.format.into();
    let output_options = OutputOptions {
        max_value_length: cli.max_value_length,
        summary: !cli.quiet,
    };

    let (output, found) = if cli.map {
        let (diffs, found) = compare_as_map_with(&old, &new, &config);
        let output = format_map(&diffs, &output_format, &output_options)
            .context("Failed to format diff output")?;
        (output, found)
    } else {
        let (diffs, found) = compare_as_list_with(&old, &new, &config);
        let output = format_list(&diffs, &output_format, &output_options)
            .context("Failed to format diff output")?;
        (output, found)
    };

    println!("{}", output);

    Ok(if found { 1 } else { 0 })
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn load(path: &Path) -> Result<Node> {
    if is_stdin(path) {
        tracing::info!("Parsing <stdin>");
        return Ok(parse_stdin()?);
    }
    tracing::info!("Parsing {}", path.display());
    parse_file(path).with_context(|| path.display().to_string())
}
