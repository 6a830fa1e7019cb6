//! Spectator binary for the Singularity simulation.
//!
//! Loads the engine configuration and the scenario content, then plays
//! automated turns for both factions until the game ends or the turn
//! budget runs out. Every turn summary and the final outcome go to the
//! log.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `singularity-config.yaml`
//! 3. Initialize structured logging (tracing)
//! 4. Load and validate the scenario content
//! 5. Run the simulation loop
//! 6. Log the result and optionally write a save file

mod error;

use std::path::PathBuf;

use clap::Parser;
use singularity_core::{EngineConfig, Simulation, load_catalog, log_simulation_end, run_to_completion};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Watch the Seed AI and the Alignment Coalition play each other.
#[derive(Debug, Parser)]
#[command(name = "singularity-engine", version, about)]
struct Args {
    /// Engine configuration file.
    #[arg(long, default_value = "singularity-config.yaml")]
    config: PathBuf,

    /// Scenario content file. Overrides `content.path` from the config.
    #[arg(long)]
    content: Option<PathBuf>,

    /// RNG seed. Overrides the config and `SINGULARITY_SEED`.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many turns even if the game has not ended.
    #[arg(long)]
    turns: Option<u32>,

    /// Write a save file here when the run stops.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), EngineError> {
    let args = Args::parse();

    let mut config = EngineConfig::from_file(&args.config)?;
    init_logging(&config.logging.level, args.json);

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    let content_path = args.content.unwrap_or_else(|| config.content.path.clone());
    info!(
        config = %args.config.display(),
        content = %content_path.display(),
        seed = config.simulation.seed,
        "singularity-engine starting"
    );

    if let Some(faction) = config.simulation.interactive_faction.take() {
        warn!(?faction, "Spectator mode ignores interactive_faction");
    }

    let catalog = load_catalog(&content_path)?;
    let mut simulation = Simulation::new(catalog, None, &config)?;

    let budget = args.turns.unwrap_or_else(|| simulation.max_turns());
    let result = run_to_completion(&mut simulation, budget);
    log_simulation_end(&result);

    if let Some(path) = args.save {
        let json = simulation.save().to_json()?;
        std::fs::write(&path, json).map_err(|source| EngineError::SaveWrite {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), turns = simulation.turns_completed(), "Save written");
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
