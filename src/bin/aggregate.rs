// Headless aggregation training run.
//
//   cargo run --features cli --bin aggregate -- --ticks 20000 --robots 30 -v

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use aggrl::rl::{
    AggregationEnv, Driver, PolicyGradient, PolicyLearner, RandomPolicy, SimulationConfig,
    TrainingConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LearnerKind {
    Gradient,
    Random,
}

/// Train robots to aggregate with policy gradient.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file with `simulation` and `training` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of robots
    #[arg(long)]
    robots: Option<usize>,

    /// Close the display after this many ticks
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Admitted transitions per training episode
    #[arg(long)]
    threshold: Option<usize>,

    /// Learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Training passes per episode
    #[arg(long)]
    repeats: Option<u32>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Policy learner
    #[arg(long, value_enum, default_value_t = LearnerKind::Gradient)]
    learner: LearnerKind,

    /// Log a population summary every N frames (0 disables)
    #[arg(long, default_value_t = 500)]
    log_every: u64,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    simulation: SimulationConfig,
    training: TrainingConfig,
}

fn load_config(cli: &Cli) -> anyhow::Result<ConfigFile> {
    let mut file = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ConfigFile::default(),
    };

    if let Some(robots) = cli.robots {
        file.simulation.robot_quantity = robots;
    }
    if let Some(seed) = cli.seed {
        file.simulation.seed = seed;
    }
    if let Some(threshold) = cli.threshold {
        file.training.episode_threshold = threshold;
    }
    if let Some(lr) = cli.learning_rate {
        file.training.learning_rate = lr;
    }
    if let Some(repeats) = cli.repeats {
        file.training.training_repeats = repeats;
    }

    file.training.validate()?;
    Ok(file)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let ConfigFile {
        simulation,
        training,
    } = load_config(&cli)?;
    log::info!("aggregate v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "  robots {}, world {}, sensor range {}, view divisions {}",
        simulation.robot_quantity,
        simulation.world_size_physical,
        simulation.sensor_range,
        simulation.view_div
    );
    log::info!(
        "  learning rate {}, repeats {}, threshold {}",
        training.learning_rate,
        training.training_repeats,
        training.episode_threshold
    );

    let dim = simulation.observation_dim();
    let seed = simulation.seed;
    let env = AggregationEnv::new(simulation)?
        .with_frame_limit(cli.ticks)
        .with_log_every(cli.log_every);

    let learner: Box<dyn PolicyLearner> = match cli.learner {
        LearnerKind::Gradient => Box::new(PolicyGradient::new(dim, training.clone(), seed)),
        LearnerKind::Random => Box::new(RandomPolicy::new(seed)),
    };

    let mut driver = Driver::new(env, learner, &training)?;
    let stats = driver.run()?;
    println!("{}", stats);
    Ok(())
}
