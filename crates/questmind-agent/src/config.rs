//! Configuration loading and typed config structures for the agent.
//!
//! The canonical configuration lives in `questmind.yaml`. Every field has a
//! default, so an empty file (or no file at all) yields a working setup.
//! A handful of environment variables override the file after parsing:
//!
//! - `QUESTMIND_CONFIG` selects the file itself
//! - `QUESTMIND_WEIGHTS_PATH` overrides `optimizer.weights_path`
//! - `QUESTMIND_MAX_CONCURRENT` overrides `agent.max_concurrent_executions`
//! - `QUESTMIND_LOG_LEVEL` overrides `logging.level`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use questmind_engine::GameRules;
use questmind_types::QuestType;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "QUESTMIND_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "questmind.yaml";

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

    /// A value parsed but is out of range, or an override is malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level agent configuration. Mirrors the structure of `questmind.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestMindConfig {
    /// Game bounds enforced by the validator.
    #[serde(default)]
    pub game: GameConfig,

    /// Runtime limits for the worker pool and cache.
    #[serde(default)]
    pub agent: AgentSettings,

    /// Optimizer tunables and weight persistence.
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QuestMindConfig {
    /// Load the file named by `QUESTMIND_CONFIG`, or `questmind.yaml`.
    ///
    /// A missing default file is not an error and yields the defaults; a
    /// missing file named explicitly through the environment is.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) if !Path::new(DEFAULT_CONFIG_PATH).exists() => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                Ok(config)
            }
            Err(_) => Self::from_file(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply env overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse and validate a YAML string, ignoring the environment.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document, so treat it as `{}`.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Split out from [`apply_env_overrides`](Self::apply_env_overrides) so
    /// callers can supply variables without touching the process
    /// environment.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup("QUESTMIND_WEIGHTS_PATH") {
            self.optimizer.weights_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("QUESTMIND_MAX_CONCURRENT") {
            self.agent.max_concurrent_executions = raw.trim().parse().map_err(|e| {
                ConfigError::Invalid(format!("QUESTMIND_MAX_CONCURRENT={raw:?}: {e}"))
            })?;
        }
        if let Some(level) = lookup("QUESTMIND_LOG_LEVEL") {
            self.logging.level = level;
        }
        self.validate()
    }

    /// Reject values the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if game.quest_types.is_empty() {
            return Err(ConfigError::Invalid(
                "game.quest_types must name at least one quest type".to_owned(),
            ));
        }
        if !(game.min_quest_duration > 0.0 && game.min_quest_duration <= game.max_quest_duration)
        {
            return Err(ConfigError::Invalid(format!(
                "quest duration bounds [{}, {}] are not a positive range",
                game.min_quest_duration, game.max_quest_duration
            )));
        }
        if game.max_level == 0 {
            return Err(ConfigError::Invalid("game.max_level must be at least 1".to_owned()));
        }
        if self.agent.max_concurrent_executions == 0 || self.agent.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_concurrent_executions and agent.queue_capacity must be positive"
                    .to_owned(),
            ));
        }
        if !self.optimizer.time_efficiency_multiplier.is_finite() {
            return Err(ConfigError::Invalid(
                "optimizer.time_efficiency_multiplier must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Game rules for the validator and optimizer.
    pub fn rules(&self) -> GameRules {
        GameRules {
            quest_types: self.game.quest_types.clone(),
            min_quest_duration: self.game.min_quest_duration,
            max_quest_duration: self.game.max_quest_duration,
            max_level: self.game.max_level,
            time_efficiency_multiplier: self.optimizer.time_efficiency_multiplier,
        }
    }
}

/// Game bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Quest sub-types the validator accepts.
    #[serde(default = "default_quest_types")]
    pub quest_types: Vec<QuestType>,

    /// Shortest allowed quest in hours.
    #[serde(default = "default_min_quest_duration")]
    pub min_quest_duration: f64,

    /// Longest allowed quest in hours.
    #[serde(default = "default_max_quest_duration")]
    pub max_quest_duration: f64,

    /// Level ceiling.
    #[serde(default = "default_max_level")]
    pub max_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            quest_types: default_quest_types(),
            min_quest_duration: default_min_quest_duration(),
            max_quest_duration: default_max_quest_duration(),
            max_level: default_max_level(),
        }
    }
}

/// Worker pool, cache, and instruction limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentSettings {
    /// Instructions executing at once.
    #[serde(default = "default_max_concurrent_executions")]
    pub max_concurrent_executions: usize,

    /// Longest accepted instruction, in characters.
    #[serde(default = "default_max_instruction_length")]
    pub max_instruction_length: usize,

    /// Wall-clock limit for one instruction.
    #[serde(default = "default_instruction_timeout_secs")]
    pub instruction_timeout_secs: u64,

    /// Submitted instructions buffered before `submit` waits.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long a cached hero snapshot is trusted.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Seed for reward and generation rolls. Unset means OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl AgentSettings {
    /// [`instruction_timeout_secs`](Self::instruction_timeout_secs) as a [`Duration`].
    pub const fn instruction_timeout(&self) -> Duration {
        Duration::from_secs(self.instruction_timeout_secs)
    }

    /// [`cache_ttl_secs`](Self::cache_ttl_secs) as a [`Duration`].
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_concurrent_executions: default_max_concurrent_executions(),
            max_instruction_length: default_max_instruction_length(),
            instruction_timeout_secs: default_instruction_timeout_secs(),
            queue_capacity: default_queue_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            rng_seed: None,
        }
    }
}

/// Optimizer tunables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizerConfig {
    /// JSON file the optimization weights persist to.
    #[serde(default = "default_weights_path")]
    pub weights_path: PathBuf,

    /// `k` in the duration cap `max(1, stamina/5 * time_efficiency * k)`.
    #[serde(default = "default_time_efficiency_multiplier")]
    pub time_efficiency_multiplier: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights_path: default_weights_path(),
            time_efficiency_multiplier: default_time_efficiency_multiplier(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

fn default_quest_types() -> Vec<QuestType> {
    QuestType::ALL.to_vec()
}

const fn default_min_quest_duration() -> f64 {
    1.0
}

const fn default_max_quest_duration() -> f64 {
    24.0
}

const fn default_max_level() -> u32 {
    100
}

const fn default_max_concurrent_executions() -> usize {
    50
}

const fn default_max_instruction_length() -> usize {
    500
}

const fn default_instruction_timeout_secs() -> u64 {
    300
}

const fn default_queue_capacity() -> usize {
    256
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_weights_path() -> PathBuf {
    PathBuf::from("data/optimization_weights.json")
}

const fn default_time_efficiency_multiplier() -> f64 {
    2.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
