//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `singularity-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid config.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use singularity_types::FactionId;

/// Environment variable that overrides `simulation.seed`.
pub const SEED_ENV_VAR: &str = "SINGULARITY_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `singularity-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Seed, interactive faction, turn limit, and automated policy.
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Event gate and automated option policy.
    #[serde(default)]
    pub events: EventConfig,

    /// Victory thresholds and the optional containment rule.
    #[serde(default)]
    pub victory: VictoryConfig,

    /// Rolling news feed.
    #[serde(default)]
    pub news: NewsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the scenario content lives.
    #[serde(default)]
    pub content: ContentConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `SINGULARITY_SEED` environment variable, when set, overrides
    /// `simulation.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_seed_override(std::env::var(SEED_ENV_VAR).ok().as_deref())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the seed with `value` if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `value` is not a `u64`.
    pub fn apply_seed_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            self.simulation.seed = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                field: "simulation.seed",
                message: format!("{SEED_ENV_VAR}={raw:?}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chance = self.events.base_fire_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::Invalid {
                field: "events.base_fire_chance",
                message: format!("{chance} is not a probability"),
            });
        }
        let thresholds = [
            ("victory.ai_capability", self.victory.ai_capability),
            ("victory.ai_autonomy", self.victory.ai_autonomy),
            ("victory.coalition_alignment", self.victory.coalition_alignment),
            ("victory.coalition_governance", self.victory.coalition_governance),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("{value} must be a finite, non-negative threshold"),
                });
            }
        }
        if let Some(rule) = &self.victory.containment {
            let value = rule.suspicion_threshold;
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "victory.containment.suspicion_threshold",
                    message: format!("{value} must be finite and positive"),
                });
            }
        }
        if self.news.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "news.capacity",
                message: String::from("must hold at least one entry"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Which built-in policy drives an automated faction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Always pass.
    Pass,
    /// Uniform over legal actions.
    Random,
    /// Greedy toward the faction's own victory condition.
    #[default]
    Progress,
}

/// Simulation-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSettings {
    /// Seed for the simulation RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// The human-controlled faction, if any.
    #[serde(default)]
    pub interactive_faction: Option<FactionId>,

    /// Turn limit override. Zero means use the scenario's own limit.
    #[serde(default)]
    pub max_turns: u32,

    /// Policy for the Seed AI when automated.
    #[serde(default)]
    pub seed_ai_policy: PolicyKind,

    /// Policy for the Alignment Coalition when automated.
    #[serde(default)]
    pub coalition_policy: PolicyKind,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            interactive_faction: None,
            max_turns: 0,
            seed_ai_policy: PolicyKind::default(),
            coalition_policy: PolicyKind::default(),
        }
    }
}

impl SimulationSettings {
    /// The configured policy for `faction`.
    pub const fn policy_for(&self, faction: FactionId) -> PolicyKind {
        match faction {
            FactionId::SeedAi => self.seed_ai_policy,
            FactionId::AlignmentCoalition => self.coalition_policy,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// How automated turns pick an event option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionPolicyKind {
    /// Uniform random over the event's options.
    #[default]
    Uniform,
    /// Always the first option.
    First,
}

/// Event selection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventConfig {
    /// Probability that any event fires in a turn, given at least one is
    /// eligible.
    #[serde(default = "default_base_fire_chance")]
    pub base_fire_chance: f64,

    /// Option policy for automated turns.
    #[serde(default)]
    pub option_policy: OptionPolicyKind,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            base_fire_chance: default_base_fire_chance(),
            option_policy: OptionPolicyKind::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Victory
// ---------------------------------------------------------------------------

/// Victory thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VictoryConfig {
    /// FCI the Seed AI needs.
    #[serde(default = "default_index_threshold")]
    pub ai_capability: f64,

    /// Seed AI autonomy needed alongside the FCI threshold.
    #[serde(default = "default_secondary_threshold")]
    pub ai_autonomy: f64,

    /// ARI the Coalition needs.
    #[serde(default = "default_index_threshold")]
    pub coalition_alignment: f64,

    /// Governance control needed alongside the ARI threshold.
    #[serde(default = "default_secondary_threshold")]
    pub coalition_governance: f64,

    /// Optional suspicion-driven loss for the Seed AI. Disabled when absent.
    #[serde(default)]
    pub containment: Option<ContainmentConfig>,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        Self {
            ai_capability: default_index_threshold(),
            ai_autonomy: default_secondary_threshold(),
            coalition_alignment: default_index_threshold(),
            coalition_governance: default_secondary_threshold(),
            containment: None,
        }
    }
}

/// Containment rule settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContainmentConfig {
    /// Seed AI suspicion at or above which the AI is contained.
    pub suspicion_threshold: f64,
}

// ---------------------------------------------------------------------------
// News, logging, content
// ---------------------------------------------------------------------------

/// News feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsConfig {
    /// Maximum retained turn summaries.
    #[serde(default = "default_news_capacity")]
    pub capacity: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            capacity: default_news_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Content location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// Path to the scenario YAML.
    #[serde(default = "default_content_path")]
    pub path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: default_content_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_base_fire_chance() -> f64 {
    1.0
}

const fn default_index_threshold() -> f64 {
    10.0
}

const fn default_secondary_threshold() -> f64 {
    1.5
}

const fn default_news_capacity() -> usize {
    12
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_content_path() -> PathBuf {
    PathBuf::from("content/default-scenario.yaml")
}
