//! Linebolt CLI - count lines in source files under a directory.

use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use linebolt::config::ScanConfig;
use linebolt::errors::{exit_code, LineboltError};
use linebolt::report::{format_json, timed, ReportFormat, TextReporter};
use linebolt::walker::{scan, scan_with_observer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linebolt")]
#[command(about = "Count lines in source files under a directory")]
#[command(version)]
struct Cli {
    /// Root directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// File extensions to count, replacing the defaults (e.g. c,h,inc)
    #[arg(long = "ext", value_name = "LIST", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Directory names to skip, replacing the defaults (e.g. .git,build)
    #[arg(long = "skip-dir", value_name = "LIST", value_delimiter = ',')]
    skip_dirs: Vec<String>,

    /// Config file [default: <PATH>/.linebolt.toml if present]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Keep filesystem order instead of sorting entries by name
    #[arg(long)]
    unsorted: bool,

    /// Report elapsed scan time
    #[arg(long)]
    time: bool,

    /// Log directory visits and skipped directories to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "linebolt", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose);
    let json_output = cli.json;

    if let Err(e) = run(cli) {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,linebolt=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ScanConfig, LineboltError> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::discover(&cli.path)?,
    };

    if !cli.extensions.is_empty() {
        config = config.with_extensions(&cli.extensions)?;
    }
    if !cli.skip_dirs.is_empty() {
        config = config.with_skip_dirs(cli.skip_dirs.iter().cloned())?;
    }
    if cli.unsorted {
        config = config.unsorted();
    }

    Ok(config)
}

fn run(cli: Cli) -> Result<(), LineboltError> {
    let config = resolve_config(&cli)?;
    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    match format {
        ReportFormat::Text => {
            let stdout = io::stdout();
            let mut reporter = TextReporter::new(BufWriter::new(stdout.lock()));

            let (result, elapsed) =
                timed(|| scan_with_observer(&cli.path, &config, &mut reporter));
            let result = result?;

            reporter.finish(&result, cli.time.then_some(elapsed))?;
        }
        ReportFormat::Json => {
            let (result, elapsed) = timed(|| scan(&cli.path, &config));
            let result = result?;

            println!(
                "{}",
                format_json(&cli.path, &result, cli.time.then_some(elapsed))?
            );
        }
    }

    Ok(())
}
