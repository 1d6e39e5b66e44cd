/*
cargo run --bin add_explanations

cargo run --bin add_explanations -- \
    -i public/data/SOA-C03.json \
    -e data/soa-c03-explanations.json \
    --dry-run
*/

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

use qbank_tools::{explanations, merge_file_with};

/// Write the SOA-C03 answer explanations into the exam question bank.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Question bank JSON to update in place
    #[arg(short, long, default_value = "public/data/SOA-C03.json")]
    input: PathBuf,

    /// JSON object of questionNumber -> explanation to use instead of the built-in set
    #[arg(short, long, value_name = "PATH")]
    explanations: Option<PathBuf>,

    /// Report what would change without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Directory for the run log
    #[arg(long = "log-dir", value_name = "PATH", default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging: full run log to file, warnings to the terminal
    fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("creating {}", cli.log_dir.display()))?;
    let ts = Local::now().format("%Y%m%d-%H%M%S");
    let log_path = cli.log_dir.join(format!("add_explanations_{ts}.log"));
    CombinedLogger::init(vec![
        WriteLogger::new(
            LevelFilter::Info,
            Config::default(),
            fs::File::create(&log_path)
                .with_context(|| format!("creating {}", log_path.display()))?,
        ),
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    ])?;

    let map = match &cli.explanations {
        Some(path) => explanations::load(path)?,
        None => explanations::embedded()?,
    };
    info!(
        "input={} explanations={} ({} entries) dry_run={}",
        cli.input.display(),
        cli.explanations
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        map.len(),
        cli.dry_run
    );

    let report = merge_file_with(&cli.input, &map, cli.dry_run)?;
    info!("report: {}", serde_json::to_string(&report)?);

    if !report.overwritten.is_empty() {
        eprintln!(
            "note: replaced {} existing explanation(s): {:?}",
            report.overwritten.len(),
            report.overwritten
        );
    }
    println!("{}", report.summary(cli.dry_run));
    Ok(())
}
