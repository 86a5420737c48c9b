//! Planning many input files in parallel.
//!
//! Each file is planned by its own task on a bounded pool of worker threads.
//! Tasks share nothing; a file that fails to plan does not stop the others.

use crate::config::Options;
use crate::pipeline::{process_file, TaskError, TaskLog, TaskSummary};
use rayon::prelude::*;
use std::collections::hash_map::{Entry, HashMap};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// The outcome of planning one input file.
#[derive(Debug)]
pub struct TaskReport {
    /// The input file.
    pub input: PathBuf,
    /// The summary of the written plan, or why there is none.
    pub result: Result<TaskSummary, TaskError>,
}

/// The outcome of every task in a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per input.
    pub tasks: Vec<TaskReport>,
}

impl BatchReport {
    /// Iterates over the tasks that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &TaskError)> {
        self.tasks
            .iter()
            .filter_map(|task| task.result.as_ref().err().map(|err| (task.input.as_path(), err)))
    }

    /// The number of plans written.
    pub fn succeeded(&self) -> usize {
        self.tasks.iter().filter(|task| task.result.is_ok()).count()
    }

    /// Returns true if every task wrote its plan.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Plans every input, writing the results into `out_dir`, and waits for all
/// of them to finish.
///
/// At most `jobs` files are planned at once; `None` uses one thread per
/// available core. Inputs sharing a file name with an earlier input fail
/// without being planned, as they would overwrite its output.
pub fn run(
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &Options,
    jobs: Option<NonZeroUsize>,
) -> Result<BatchReport, rayon::ThreadPoolBuildError> {
    let earlier = earlier_with_same_name(inputs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.map_or(0, NonZeroUsize::get))
        .thread_name(|idx| format!("planner-{}", idx))
        .build()?;
    log::info!(
        "Planning {} files on {} threads into {}",
        inputs.len(),
        pool.current_num_threads(),
        out_dir.display()
    );

    let tasks = pool.install(|| {
        inputs
            .par_iter()
            .zip(earlier.par_iter())
            .map(|(input, earlier)| {
                let task_log = TaskLog::new(input);
                let result = match earlier {
                    Some(earlier) => Err(TaskError::DuplicateOutput {
                        path: input.clone(),
                        earlier: earlier.clone(),
                    }),
                    None => process_file(input, out_dir, options, &task_log),
                };
                if let Err(err) = &result {
                    log::warn!("{}", err);
                }
                TaskReport {
                    input: input.clone(),
                    result,
                }
            })
            .collect()
    });

    let report = BatchReport { tasks };
    log::info!(
        "{} of {} plans written",
        report.succeeded(),
        report.tasks.len()
    );
    Ok(report)
}

/// For each input, the first earlier input with the same file name.
fn earlier_with_same_name(inputs: &[PathBuf]) -> Vec<Option<PathBuf>> {
    let mut seen = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let name = input.file_name()?;
            match seen.entry(name) {
                Entry::Occupied(first) => Some(PathBuf::clone(first.get())),
                Entry::Vacant(slot) => {
                    slot.insert(input.clone());
                    None
                }
            }
        })
        .collect()
}
