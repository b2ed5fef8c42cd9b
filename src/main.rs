use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

mod analysis;
mod config;
mod domain;
mod error;
mod ingest;
mod logging;

use crate::analysis::{engagement, keywords, sentiment};
use crate::config::Config;
use crate::domain::{RawPostData, SourceKind};
use crate::error::{ListeningError, Result};
use crate::ingest::NormalizeOutcome;

#[derive(Parser)]
#[command(name = "social_listening")]
#[command(about = "Social listening post-data ingestion and analysis")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to an explicit config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and normalize a collected data file
    Normalize {
        /// Input file: JSON array of rows, or CSV with a header row
        file: PathBuf,
        /// Where the rows came from
        #[arg(long)]
        source: SourceKindArg,
        /// Fail the batch if any row was rejected
        #[arg(long)]
        strict: bool,
        /// Write the canonical dataset to this file as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Normalize a file and print the engagement/sentiment report
    Report {
        /// Input file: JSON array of rows, or CSV with a header row
        file: PathBuf,
        /// Where the rows came from
        #[arg(long)]
        source: SourceKindArg,
        /// How many top posts and hashtags to list
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SourceKindArg {
    Api,
    Csv,
    Scrape,
}

impl From<SourceKindArg> for SourceKind {
    fn from(arg: SourceKindArg) -> Self {
        match arg {
            SourceKindArg::Api => SourceKind::Api,
            SourceKindArg::Csv => SourceKind::Csv,
            SourceKindArg::Scrape => SourceKind::Scrape,
        }
    }
}

/// Read a batch of raw rows from disk. CSV goes through the minimal CSV
/// reader; anything else must be a JSON array of objects.
fn load_rows(path: &Path) -> Result<Vec<RawPostData>> {
    let content = fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        return ingest::csv::read_rows(&content);
    }
    let value: serde_json::Value = serde_json::from_str(&content)?;
    match value {
        serde_json::Value::Array(rows) => Ok(rows),
        _ => Err(ListeningError::MalformedInput {
            expected: "JSON array of rows",
            context: format!("top-level value in '{}' is not an array", path.display()),
        }),
    }
}

/// Strict mode lives here in the caller, not in the normalizer.
fn enforce_strict(outcome: &NormalizeOutcome, config: &Config, cli_strict: bool) -> Result<()> {
    if !(cli_strict || config.ingest.strict) {
        return Ok(());
    }
    let total = outcome.errors.len();
    let fatal = outcome.fatal_errors();
    let counted = if config.ingest.fail_on_coerced {
        total
    } else {
        fatal
    };
    if counted > 0 {
        return Err(ListeningError::StrictMode { fatal, total });
    }
    Ok(())
}

fn print_outcome(outcome: &NormalizeOutcome, input_rows: usize) {
    // A rejected row can carry several fatal errors, so count rows, not errors
    let rejected = input_rows - outcome.records.len();
    println!("\n📊 Normalization results:");
    println!("   Input rows: {}", input_rows);
    println!("   Accepted:   {}", outcome.records.len());
    println!("   Rejected:   {}", rejected);
    println!("   Errors:     {}", outcome.errors.len());

    if !outcome.errors.is_empty() {
        warn!(count = outcome.errors.len(), "row errors during normalization");
        println!("\n⚠️  Row errors:");
        for err in &outcome.errors {
            println!("   - {}", err);
        }
    }
}

fn print_report(outcome: &NormalizeOutcome, config: &Config, top_n: usize) {
    let weights = config.report.weights();
    let summary = engagement::summarize(&outcome.records, &weights);

    println!("\n📊 Overview:");
    println!("   Total posts:      {}", summary.total_posts);
    println!("   Total engagement: {}", summary.total_engagement);
    println!("   Avg engagement:   {:.0}", summary.mean_engagement);
    println!("   Est. total reach: {}", summary.total_reach);

    println!("\n🔥 Top posts:");
    for (record, score) in engagement::top_posts(&outcome.records, top_n, &weights) {
        let mood = sentiment::analyze(&record.text);
        let title = record.title.as_deref().unwrap_or("-");
        println!(
            "   {:>6}  {}  [{}]  {} ({})",
            score, record.date, mood.label, record.author, title
        );
    }

    let moods = sentiment::breakdown(&outcome.records);
    println!("\n💬 Sentiment:");
    println!(
        "   Positive: {}  Neutral: {}  Negative: {}  (mean polarity {:+.2})",
        moods.positive, moods.neutral, moods.negative, moods.mean_polarity
    );

    let tags = keywords::top_hashtags(&outcome.records, top_n);
    if !tags.is_empty() {
        println!("\n🏷️  Top hashtags:");
        for (tag, count) in tags {
            println!("   #{} ({})", tag, count);
        }
    }
}


fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Normalize {
            file,
            source,
            strict,
            output,
        } => {
            let source = SourceKind::from(source);
            let rows = load_rows(&file)?;
            info!(file = %file.display(), source = %source, rows = rows.len(), "normalizing batch");

            let outcome = ingest::normalize(&rows, source)?;
            print_outcome(&outcome, rows.len());

            if let Err(e) = enforce_strict(&outcome, &config, strict) {
                error!("batch rejected: {}", e);
                return Err(e.into());
            }

            if let Some(out_path) = output {
                fs::write(&out_path, serde_json::to_string_pretty(&outcome.records)?)?;
                info!(file = %out_path.display(), "canonical dataset written");
                println!("\n💾 Canonical dataset written to {}", out_path.display());
            }
        }
        Commands::Report { file, source, top } => {
            let source = SourceKind::from(source);
            let rows = load_rows(&file)?;
            info!(file = %file.display(), source = %source, rows = rows.len(), "normalizing batch");

            let outcome = ingest::normalize(&rows, source)?;
            print_outcome(&outcome, rows.len());
            enforce_strict(&outcome, &config, false)?;
            print_report(&outcome, &config, top.unwrap_or(config.report.top_n));
        }
    }

    Ok(())
}
