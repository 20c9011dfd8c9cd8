//! CLI binary for credence.

use clap::{Parser, Subcommand};
use credence::{CredenceConfig, CredibilityChecker, QueryReport, RankedSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Credence: discover, score and rank sources for a research question.
#[derive(Parser)]
#[command(name = "credence", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Find and rank sources for a research query.
    Query {
        /// The research question.
        text: String,

        /// Unique sources to discover.
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Show only the best K sources.
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Score a URL from its domain alone, without fetching it.
    Score {
        /// URL to score.
        url: String,
    },

    /// Print the effective configuration.
    Config {
        /// Write the default configuration to the default path.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("credence=info,credence_search=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CredenceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Query {
            text,
            max_results,
            top,
            json,
        } => run_query(config, &text, max_results, top, json).await,
        Command::Score { url } => score_url(&config, &url),
        Command::Config { write } => show_config(&config, write),
    }
}

async fn run_query(
    config: CredenceConfig,
    text: &str,
    max_results: Option<usize>,
    top: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let max_results = max_results.unwrap_or(config.discovery.max_results);
    let checker = CredibilityChecker::from_config(&config)?
        .with_top_k(top)
        .with_event_callback(Box::new(|event| tracing::info!("{event}")));

    let report = checker.run_report(text, max_results).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &QueryReport) {
    if report.results.is_empty() {
        println!("No sources found for \"{}\".", report.query);
        return;
    }

    println!("{:>4}  {:>5}  {:<6}  {:<48}  URL", "RANK", "SCORE", "TIER", "TITLE");
    for source in &report.results {
        print_source(source);
    }
    println!(
        "\n{} of {} discovered sources in {:.1}s",
        report.results.len(),
        report.candidates_discovered,
        report.elapsed_ms as f64 / 1000.0
    );
}

fn print_source(source: &RankedSource) {
    println!(
        "{:>4}  {:>5.2}  {:<6}  {:<48}  {}",
        source.rank,
        source.assessment.score,
        source.assessment.tier,
        clip(source.display_title(), 48),
        source.candidate.url
    );
    println!("        {}", source.assessment.summary_line());
    if let Some(ref detail) = source.extraction.error_detail {
        println!("        extraction {}: {detail}", source.extraction.status);
    }
    if let Some(ref summary) = source.summary {
        println!("        {summary}");
    }
}

fn score_url(config: &CredenceConfig, url: &str) -> anyhow::Result<()> {
    let scorer = credence::CredibilityScorer::from_config(&config.scoring)?;
    let assessment = scorer.score(url, None);
    println!("{}", assessment.summary_line());
    for factor in &assessment.reasoning {
        println!("  {factor}");
    }
    println!("authority table {}", scorer.table_version());
    Ok(())
}

fn show_config(config: &CredenceConfig, write: bool) -> anyhow::Result<()> {
    if write {
        let path = CredenceConfig::default_config_path();
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        CredenceConfig::default().save_to_file(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Shorten `text` to `width` characters, ending with `…` when cut.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
