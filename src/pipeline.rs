//! Planning of a single input file, from simulation text to signal plan text.

use crate::allocate::allocate;
use crate::config::Options;
use crate::decode::{decode_file, ParseError};
use crate::demand::compute_street_weights;
use crate::encode::encode;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The reasons planning a single file can fail.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{} has no file name", path.display())]
    InvalidInputName { path: PathBuf },

    #[error("{} writes the same output as {}", path.display(), earlier.display())]
    DuplicateOutput { path: PathBuf, earlier: PathBuf },

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("could not serialize plan for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What came out of planning one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSummary {
    /// The signal plan file written.
    pub output: PathBuf,
    /// The number of streets in the network.
    pub streets: usize,
    /// The number of cars in the input.
    pub cars: usize,
    /// The number of intersections given a schedule.
    pub intersections: usize,
    /// The sum of all green times, in s.
    pub total_green_time: u64,
}

/// Logs diagnostics for one input file, each line prefixed with the input's path.
#[derive(Clone, Debug)]
pub struct TaskLog {
    prefix: String,
}

impl TaskLog {
    /// Creates a log for the given input.
    pub fn new(input: &Path) -> Self {
        Self {
            prefix: input.display().to_string(),
        }
    }

    /// Logs a message at the given level.
    pub fn log(&self, level: log::Level, args: fmt::Arguments) {
        log::log!(level, "{} | {}", self.prefix, args);
    }

    /// Logs a message at debug level.
    pub fn debug(&self, args: fmt::Arguments) {
        self.log(log::Level::Debug, args);
    }

    /// Logs a message at info level.
    pub fn info(&self, args: fmt::Arguments) {
        self.log(log::Level::Info, args);
    }
}

/// Plans one simulation file, writing the result to a file of the same name
/// in `out_dir`, which must exist.
///
/// Nothing is written unless the input was decoded and planned in full.
pub fn process_file(
    input: &Path,
    out_dir: &Path,
    options: &Options,
    log: &TaskLog,
) -> Result<TaskSummary, TaskError> {
    let name = input.file_name().ok_or_else(|| TaskError::InvalidInputName {
        path: input.to_owned(),
    })?;
    let output = out_dir.join(name);

    let sim = decode_file(input).map_err(|err| match err {
        ParseError::Io(source) => TaskError::Read {
            path: input.to_owned(),
            source,
        },
        source => TaskError::Parse {
            path: input.to_owned(),
            source,
        },
    })?;
    log.debug(format_args!(
        "{} streets, {} cars, {} s",
        sim.street_count(),
        sim.car_count(),
        sim.duration()
    ));

    let weights = compute_street_weights(&sim, &options.demand);
    let max_green_time = options.effective_max_green_time(sim.duration());
    let plan = allocate(&sim, &weights, max_green_time);
    log.debug(format_args!(
        "{} of {} streets carry traffic, green time capped at {} s",
        weights.len(),
        sim.street_count(),
        max_green_time
    ));

    let mut text = Vec::new();
    encode(&plan, &mut text).map_err(|source| TaskError::Write {
        path: output.clone(),
        source,
    })?;
    let json_output = output.with_file_name(json_name(name));
    let json = if options.json {
        let json = serde_json::to_vec_pretty(&plan).map_err(|source| TaskError::Serialize {
            path: json_output.clone(),
            source,
        })?;
        Some(json)
    } else {
        None
    };

    write_once(&output, &text)?;
    if let Some(json) = json {
        if let Err(err) = write_once(&json_output, &json) {
            let _ = fs::remove_file(&output);
            return Err(err);
        }
    }

    let summary = TaskSummary {
        output,
        streets: sim.street_count(),
        cars: sim.car_count(),
        intersections: plan.len(),
        total_green_time: plan.total_green_time(),
    };
    log.info(format_args!(
        "wrote {} ({} intersections)",
        summary.output.display(),
        summary.intersections
    ));
    Ok(summary)
}

fn json_name(name: &std::ffi::OsStr) -> std::ffi::OsString {
    let mut name = name.to_owned();
    name.push(".json");
    name
}

/// Writes the whole file, removing it again if the write fails part way.
fn write_once(path: &Path, contents: &[u8]) -> Result<(), TaskError> {
    fs::write(path, contents).map_err(|source| {
        let _ = fs::remove_file(path);
        TaskError::Write {
            path: path.to_owned(),
            source,
        }
    })
}
