//! Command-line driver: train a digit classifier on IDX files, or score a
//! saved model on a held-out set.
//!
//!   cargo run --release -- train \
//!       --train-images data/train-images-idx3-ubyte.gz \
//!       --train-labels data/train-labels-idx1-ubyte.gz \
//!       --test-images  data/t10k-images-idx3-ubyte.gz \
//!       --test-labels  data/t10k-labels-idx1-ubyte.gz \
//!       --out trained_models/digits.json.gz

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_mlp::{load_idx_pair, train_loop, Network, Sample, TrainConfig};

#[derive(Parser, Debug)]
#[command(name = "ferrite-mlp")]
#[command(about = "Train and evaluate a sigmoid MLP on IDX digit data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a new network and save it
    Train(TrainArgs),
    /// Report the accuracy of a saved network
    Test(TestArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// IDX3 training images (optionally .gz)
    #[arg(long)]
    train_images: PathBuf,

    /// IDX1 training labels (optionally .gz)
    #[arg(long)]
    train_labels: PathBuf,

    /// IDX3 held-out images, evaluated after training
    #[arg(long, requires = "test_labels")]
    test_images: Option<PathBuf>,

    /// IDX1 held-out labels
    #[arg(long, requires = "test_images")]
    test_labels: Option<PathBuf>,

    /// Layer sizes, input first; the last entry is the number of classes
    #[arg(long, value_delimiter = ',', default_value = "784,16,16,10")]
    layers: Vec<usize>,

    /// Number of passes over the training set
    #[arg(long, default_value_t = TrainConfig::default().epochs)]
    epochs: usize,

    /// SGD step size
    #[arg(long, default_value_t = TrainConfig::default().learning_rate)]
    learning_rate: f64,

    /// Seed for the per-epoch shuffle
    #[arg(long, default_value_t = TrainConfig::default().seed)]
    seed: u64,

    /// Seed for parameter initialization
    #[arg(long, default_value_t = Network::DEFAULT_SEED)]
    init_seed: u64,

    /// Use only the first N training samples
    #[arg(long)]
    limit: Option<usize>,

    /// Where to write the trained model
    #[arg(long, default_value = "trained_models/model.json.gz")]
    out: PathBuf,

    /// Also write per-epoch statistics as JSON
    #[arg(long)]
    history: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TestArgs {
    /// Model written by `train`
    #[arg(long)]
    model: PathBuf,

    /// IDX3 images (optionally .gz)
    #[arg(long)]
    images: PathBuf,

    /// IDX1 labels (optionally .gz)
    #[arg(long)]
    labels: PathBuf,

    /// Use only the first N samples
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Train(args) => train(args),
        Command::Test(args) => test(args),
    }
}

fn train(args: TrainArgs) -> Result<()> {
    let mut network = Network::with_seed(args.layers.clone(), args.init_seed)
        .context("invalid --layers")?;
    let n_classes = network.output_size();

    let samples = load_samples(&args.train_images, &args.train_labels, n_classes, args.limit)?;
    info!(
        samples = samples.len(),
        layers = ?network.layer_sizes(),
        epochs = args.epochs,
        learning_rate = args.learning_rate,
        "training"
    );

    let config = TrainConfig {
        epochs: args.epochs,
        learning_rate: args.learning_rate,
        seed: args.seed,
    };
    let history = train_loop(&mut network, &samples, &config)?;

    if let (Some(images), Some(labels)) = (&args.test_images, &args.test_labels) {
        let held_out = load_samples(images, labels, n_classes, None)?;
        let evaluation = network.test(&held_out)?;
        info!(accuracy = %evaluation, "held-out evaluation");
    }

    network
        .save_model(&args.out)
        .with_context(|| format!("saving model to {}", args.out.display()))?;
    info!(path = %args.out.display(), "model saved");

    if let Some(path) = &args.history {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &history)?;
    }
    Ok(())
}

fn test(args: TestArgs) -> Result<()> {
    let network = Network::load_model(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;
    let samples = load_samples(&args.images, &args.labels, network.output_size(), args.limit)?;
    let evaluation = network.test(&samples)?;
    info!(layers = ?network.layer_sizes(), "evaluated");
    println!("Accuracy: {}", evaluation);
    Ok(())
}

fn load_samples(
    images: &Path,
    labels: &Path,
    n_classes: usize,
    limit: Option<usize>,
) -> Result<Vec<Sample>> {
    let mut samples = load_idx_pair(images, labels, n_classes)
        .with_context(|| format!("reading {} / {}", images.display(), labels.display()))?;
    if let Some(limit) = limit {
        samples.truncate(limit);
    }
    Ok(samples)
}
