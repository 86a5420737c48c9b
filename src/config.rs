//! Options for planning a batch of simulations.
//!
//! Options can be loaded from a JSON file, every field being optional:
//!
//! ```json
//! {
//!   "demand": { "weighting": "per_traversal_time", "drop_percent": 10 },
//!   "max_green_time": 5,
//!   "json": true
//! }
//! ```

use crate::demand::DemandOptions;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or checking options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("drop percentage must be at most 100, got {0}")]
    DropPercent(u8),

    #[error("maximum green time must be positive")]
    ZeroGreenTime,
}

/// How every simulation in a batch is planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// How street weights are computed.
    pub demand: DemandOptions,
    /// An upper bound on any green time, in s, below the simulation duration.
    pub max_green_time: Option<u32>,
    /// Also write the plan, with weights, as JSON.
    pub json: bool,
}

impl Options {
    /// Loads options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let options: Self = serde_json::from_reader(reader)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that the options are within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.demand.drop_percent > 100 {
            return Err(ConfigError::DropPercent(self.demand.drop_percent));
        }
        if self.max_green_time == Some(0) {
            return Err(ConfigError::ZeroGreenTime);
        }
        Ok(())
    }

    /// The longest green time allowed in a simulation of the given duration.
    pub fn effective_max_green_time(&self, duration: u32) -> u32 {
        self.max_green_time
            .map_or(duration, |cap| cap.min(duration))
            .max(1)
    }
}
