//! Save blobs.
//!
//! A save records only the seed, the interactive faction, and how many
//! turns were completed. Restoring rebuilds the simulation from the catalog
//! and replays that many *automated* turns, so a game whose interactive
//! choices differed from the automated policy will not be reproduced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use singularity_types::{ContentCatalog, FactionId};
use tracing::info;

use crate::config::EngineConfig;
use crate::simulation::{Simulation, SimulationError};

/// Save format version this build writes and reads.
pub const SAVE_VERSION: u32 = 1;

/// Persisted simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Format version.
    pub version: u32,
    /// RNG seed.
    pub seed: u64,
    /// Interactive faction, if any.
    pub interactive_faction: Option<FactionId>,
    /// Turns completed when the save was taken.
    pub turn_count: u32,
    /// When the save was taken.
    pub saved_at: DateTime<Utc>,
}

impl SaveGame {
    /// Encode as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::SaveFormat`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON and check the version.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::SaveFormat`] for malformed JSON, or
    /// [`SimulationError::SaveVersion`] for an unsupported version.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let save: Self = serde_json::from_str(json)?;
        save.check_version()?;
        Ok(save)
    }

    /// Fail unless this blob was written by a supported version.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::SaveVersion`] on mismatch.
    pub const fn check_version(&self) -> Result<(), SimulationError> {
        if self.version == SAVE_VERSION {
            Ok(())
        } else {
            Err(SimulationError::SaveVersion {
                found: self.version,
                supported: SAVE_VERSION,
            })
        }
    }
}

impl Simulation {
    /// Capture a save blob for the current state.
    pub fn save(&self) -> SaveGame {
        SaveGame {
            version: SAVE_VERSION,
            seed: self.seed(),
            interactive_faction: self.interactive_faction(),
            turn_count: self.turns_completed(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild a simulation from `save` by replaying automated turns.
    ///
    /// The save's seed replaces `config.simulation.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::SaveVersion`] for an unsupported save,
    /// any construction error from [`Simulation::new`], or
    /// [`SimulationError::ReplayEnded`] if the game ends before the saved
    /// turn count is reached.
    pub fn restore(
        catalog: ContentCatalog,
        config: &EngineConfig,
        save: &SaveGame,
    ) -> Result<Self, SimulationError> {
        save.check_version()?;
        let mut config = config.clone();
        config.simulation.seed = save.seed;

        let mut simulation = Self::new(catalog, save.interactive_faction, &config)?;
        let played = u32::try_from(simulation.run(save.turn_count).count()).unwrap_or(u32::MAX);
        if played < save.turn_count {
            return Err(SimulationError::ReplayEnded {
                requested: save.turn_count,
                played,
            });
        }
        info!(seed = save.seed, turns = played, "Simulation restored from save");
        Ok(simulation)
    }
}
