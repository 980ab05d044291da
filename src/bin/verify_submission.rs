//! Submission checker: validate the structure of a predictions JSONL file.

use anyhow::{Context, Result};
use clap::Parser;
use rankeval::eval::verify_predictions;
use rankeval::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "verify_submission")]
#[command(about = "Validate the structure of a predictions JSONL file")]
struct Args {
    /// Path to JSONL file to verify.
    predictions: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    // Only the log level is read here; a bad eval section must not block the check
    let (config, config_err) = Config::load_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.rankeval.log_level.as_str())
    ).init();

    if let Some(e) = config_err {
        log::warn!("Ignoring config, using defaults: {:#}", e);
    }

    let count = verify_predictions(&args.predictions)
        .with_context(|| format!("{} is not a valid submission", args.predictions.display()))?;

    println!("OK: {} contains {} queries.", args.predictions.display(), count);
    Ok(())
}
