//! JSON map files.
//!
//! A map file pins the scenario of a run so it can be replayed with
//! different strategies:
//!
//! ```json
//! { "num_helpers": 4, "animals": [2, 5, 3], "ark": [500, 500] }
//! ```
//!
//! Range checks happen later, in [`SimulationConfig::resolve`].

use std::path::Path;

use noah_core::config::SimulationConfig;
use serde::Deserialize;

use crate::error::EngineError;

/// Scenario fields loaded from a map file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapFile {
    /// Total helpers including Noah.
    pub num_helpers: u32,
    /// Initial population per species.
    pub animals: Vec<u32>,
    /// Ark cell as `[x, y]`.
    pub ark: [u32; 2],
}

impl MapFile {
    /// Read and parse the map file at `path`.
    pub fn read(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::MapRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| EngineError::MapParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the map's scenario into `config`, replacing what was there.
    pub fn apply(self, config: &mut SimulationConfig) {
        config.scenario.num_helpers = Some(self.num_helpers);
        config.scenario.animals = Some(self.animals);
        config.scenario.ark = Some(self.ark);
    }
}
