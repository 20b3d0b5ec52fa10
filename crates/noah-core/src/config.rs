//! Configuration loading and typed config structures for the Noah's Ark
//! simulation.
//!
//! The optional `noah-config.yaml` at the project root mirrors
//! [`SimulationConfig`]. Every field has a default, so an empty file (or no
//! file) is a valid configuration. The scenario fields that have no sensible
//! default (helper count, animal populations, ark position, turn count) are
//! optional here and usually supplied from the command line or a map file;
//! [`SimulationConfig::resolve`] checks that they are present and valid.

use std::path::Path;

use noah_types::CellCoord;
use noah_world::Rules;
use serde::Deserialize;

/// Errors that can occur when loading or validating configuration.
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

    /// A value is missing or violates its constraints.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Geometry and protocol constants.
    #[serde(default)]
    pub rules: Rules,

    /// Turn counts and the rain deadline.
    #[serde(default)]
    pub time: TimeConfig,

    /// Helpers, animal populations, and the ark.
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Message channel settings.
    #[serde(default)]
    pub messages: MessageConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every invariant and produce the concrete scenario to run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn resolve(&self) -> Result<Scenario, ConfigError> {
        validate_rules(&self.rules)?;
        self.time.validate()?;

        let num_helpers = self
            .scenario
            .num_helpers
            .ok_or_else(|| invalid("scenario.num_helpers", "missing"))?;
        if num_helpers < 2 {
            return Err(invalid("scenario.num_helpers", "must be >= 2"));
        }

        let animals = self
            .scenario
            .animals
            .clone()
            .ok_or_else(|| invalid("scenario.animals", "missing animal populations"))?;
        if animals.iter().any(|&count| count < 2) {
            return Err(invalid(
                "scenario.animals",
                "every species needs a population >= 2",
            ));
        }

        let [x, y] = self
            .scenario
            .ark
            .ok_or_else(|| invalid("scenario.ark", "missing ark position"))?;
        let ark = CellCoord::new(x, y);
        if !self.rules.contains_cell(ark) {
            return Err(invalid(
                "scenario.ark",
                format!(
                    "{ark} is outside the {}x{} grid",
                    self.rules.width, self.rules.height
                ),
            ));
        }

        let turns = self
            .time
            .turns
            .ok_or_else(|| invalid("time.turns", "missing turn count"))?;
        if !(self.time.min_turns..=self.time.max_turns).contains(&turns) {
            return Err(invalid(
                "time.turns",
                format!(
                    "{turns} is not between {} and {}",
                    self.time.min_turns, self.time.max_turns
                ),
            ));
        }

        Ok(Scenario {
            num_helpers,
            animals,
            ark,
            turns,
        })
    }
}

fn validate_rules(rules: &Rules) -> Result<(), ConfigError> {
    if rules.width == 0 || rules.height == 0 {
        return Err(invalid("rules.width", "grid dimensions must be positive"));
    }
    if !rules.sight_radius.is_finite() || rules.sight_radius < 0.0 {
        return Err(invalid("rules.sight_radius", "must be finite and >= 0"));
    }
    if !rules.communication_radius.is_finite() || rules.communication_radius < 0.0 {
        return Err(invalid("rules.communication_radius", "must be finite and >= 0"));
    }
    if !rules.max_step.is_finite() || rules.max_step <= 0.0 {
        return Err(invalid("rules.max_step", "must be finite and > 0"));
    }
    if rules.flock_capacity == 0 {
        return Err(invalid("rules.flock_capacity", "must be >= 1"));
    }
    if !rules.ark_epsilon.is_finite() || rules.ark_epsilon < 0.0 {
        return Err(invalid("rules.ark_epsilon", "must be finite and >= 0"));
    }
    if !(0.0..=1.0).contains(&rules.animal_move_probability) {
        return Err(invalid(
            "rules.animal_move_probability",
            "must be within [0, 1]",
        ));
    }
    if rules.score_single_gender > rules.score_both_genders {
        return Err(invalid(
            "rules.score_single_gender",
            "must not exceed score_both_genders",
        ));
    }
    Ok(())
}

/// A fully validated scenario, ready for setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Total helpers including Noah.
    pub num_helpers: u32,
    /// Initial population per species, indexed by species id.
    pub animals: Vec<u32>,
    /// Ark cell.
    pub ark: CellCoord,
    /// Number of turns to play.
    pub turns: u32,
}

/// World-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility; generated at startup when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Turn count configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Turns to play; chosen at random within the bounds when absent.
    #[serde(default)]
    pub turns: Option<u32>,

    /// Rain starts this many turns before the end.
    #[serde(default = "default_rain_lead_turns")]
    pub rain_lead_turns: u32,

    /// Smallest accepted turn count.
    #[serde(default = "default_min_turns")]
    pub min_turns: u32,

    /// Largest accepted turn count.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            turns: None,
            rain_lead_turns: default_rain_lead_turns(),
            min_turns: default_min_turns(),
            max_turns: default_max_turns(),
        }
    }
}

impl TimeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_turns > self.max_turns {
            return Err(invalid("time.min_turns", "must not exceed max_turns"));
        }
        Ok(())
    }
}

/// Scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Registry key of the strategy every helper runs.
    #[serde(default = "default_player")]
    pub player: String,

    /// Total helpers including Noah (>= 2).
    #[serde(default)]
    pub num_helpers: Option<u32>,

    /// Initial population per species (each >= 2).
    #[serde(default)]
    pub animals: Option<Vec<u32>>,

    /// Ark cell as `[x, y]`.
    #[serde(default)]
    pub ark: Option<[u32; 2]>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            num_helpers: None,
            animals: None,
            ark: None,
        }
    }
}

/// How out-of-range message values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    /// Keep the low 8 bits and log a warning.
    #[default]
    Mask,
    /// Abort the run with a protocol violation.
    Reject,
}

/// Message channel configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MessageConfig {
    /// Treatment of observation values above 255.
    #[serde(default)]
    pub overflow: MessagePolicy,
}

const fn default_rain_lead_turns() -> u32 {
    1008
}

const fn default_min_turns() -> u32 {
    2016
}

const fn default_max_turns() -> u32 {
    4032
}

fn default_player() -> String {
    "r".to_owned()
}
