//! Training entrypoint invoked by the hosting platform

use clap::Parser;
use molino::training::{self, TrainingConfig};
use std::path::PathBuf;

/// The hosting platform forwards arbitrary extra hyperparameters on the
/// command line; unknown arguments are ignored rather than rejected.
#[derive(Parser, Debug)]
#[command(name = "molino")]
#[command(version)]
#[command(about = "Train the mill throughput random-forest model")]
#[command(ignore_errors = true)]
struct Args {
    /// Number of trees in the forest
    #[arg(long, default_value_t = 400)]
    n_estimators: usize,

    /// Seed for bootstrap sampling
    #[arg(long, default_value_t = 42)]
    random_state: u64,

    /// Directory the model artifact is written to
    #[arg(long, env = "SM_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Directory containing train.csv
    #[arg(long, env = "SM_CHANNEL_TRAIN")]
    train: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "molino=info".into()),
        )
        .init();

    let args = Args::parse();

    let model_dir = args
        .model_dir
        .ok_or_else(|| anyhow::anyhow!("--model-dir is required (or set SM_MODEL_DIR)"))?;
    let train_dir = args
        .train
        .ok_or_else(|| anyhow::anyhow!("--train is required (or set SM_CHANNEL_TRAIN)"))?;

    let config = TrainingConfig {
        n_estimators: args.n_estimators,
        random_state: args.random_state,
        model_dir,
        train_dir,
    };

    training::run(&config)?;

    Ok(())
}
