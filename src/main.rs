//! Evaluation CLI: score a predictions JSONL file against TSV qrels.

use anyhow::{Context, Result};
use clap::Parser;
use rankeval::eval::{evaluate, Predictions, Qrels};
use rankeval::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rankeval")]
#[command(about = "Evaluate re-ranking predictions against qrels")]
struct Args {
    /// Path to JSONL predictions file.
    #[arg(long)]
    predictions: PathBuf,

    /// Path to TSV qrels file.
    #[arg(long)]
    qrels: PathBuf,

    /// Metrics to compute, e.g. ndcg@10 mrr@10 recall@50 (default from config).
    #[arg(long, num_args = 0..)]
    metrics: Option<Vec<String>>,

    /// Optional path to write metrics as JSON.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    // Log to stderr; stdout carries only the report
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.rankeval.log_level.as_str())
    ).init();

    let metrics = args.metrics.unwrap_or_else(|| config.eval.metrics.clone());
    let output = args.output.or_else(|| config.eval.output.clone());

    let qrels = Qrels::load(&args.qrels)
        .with_context(|| format!("Failed to load qrels from {}", args.qrels.display()))?;
    let predictions = Predictions::load(&args.predictions).with_context(|| {
        format!("Failed to load predictions from {}", args.predictions.display())
    })?;

    let report = evaluate(&predictions, &qrels, metrics.as_slice())?;

    print!("{}", report);

    if let Some(path) = output {
        report
            .write_json(&path)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    }

    Ok(())
}
