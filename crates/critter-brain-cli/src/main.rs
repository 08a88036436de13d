mod population;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use critter_brain_core::{LayerUpdate, NetworkConfig};
use population::Population;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayerUpdateArg {
    DoubleBuffered,
    Aliased,
}

impl From<LayerUpdateArg> for LayerUpdate {
    fn from(arg: LayerUpdateArg) -> Self {
        match arg {
            LayerUpdateArg::DoubleBuffered => LayerUpdate::DoubleBuffered,
            LayerUpdateArg::Aliased => LayerUpdate::Aliased,
        }
    }
}

/// Drive a population of randomly wired critters with random percepts and
/// report which actions their brains pick.
#[derive(Parser, Debug)]
#[command(name = "critter-sim", version)]
struct Args {
    /// Number of critters, each with its own network
    #[arg(long, default_value_t = 500)]
    critters: usize,

    /// Percepts fed to each critter
    #[arg(long, default_value_t = 100)]
    steps: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON network config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    hidden_size: Option<usize>,

    #[arg(long)]
    max_weight: Option<f64>,

    #[arg(long, value_enum)]
    layer_update: Option<LayerUpdateArg>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<NetworkConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => NetworkConfig::default(),
    };
    if let Some(hidden_size) = args.hidden_size {
        config.hidden_size = hidden_size;
    }
    if let Some(max_weight) = args.max_weight {
        config.max_weight = max_weight;
    }
    if let Some(layer_update) = args.layer_update {
        config.layer_update = layer_update.into();
    }
    config.validate().context("invalid network config")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "critter_sim=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let start = Instant::now();
    let mut population = Population::new(config, args.critters, args.seed)
        .context("building population")?;
    if population.is_empty() {
        tracing::warn!("no critters to run");
    }
    tracing::debug!(critters = population.len(), steps = args.steps, "running");
    let summary = population.run(args.steps).context("running population")?;
    let elapsed = start.elapsed();
    tracing::info!(?elapsed, "done");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let total = summary.actions.total().max(1) as f64;
    println!(
        "{} critters x {} percepts (seed {}, hidden {}, {:?}, {} weights each)",
        summary.critters,
        summary.steps,
        summary.seed,
        summary.config.hidden_size,
        summary.config.layer_update,
        summary.weights_per_critter
    );
    for (name, count) in [
        ("hop", summary.actions.hop),
        ("left", summary.actions.left),
        ("right", summary.actions.right),
        ("infect", summary.actions.infect),
    ] {
        println!("  {name:<7}{count:>10}  {:>6.2}%", 100.0 * count as f64 / total);
    }
    match summary.best_hopper {
        Some(id) => println!(
            "longest hop streak: {} (critter {id})",
            summary.longest_hop_streak
        ),
        None => println!("longest hop streak: none"),
    }
    println!("elapsed: {elapsed:?}");
    Ok(())
}
