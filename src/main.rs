use clap::Parser;
use signal_plan::batch;
use signal_plan::{DemandOptions, Options, Weighting};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Plan traffic light green times from recorded car routes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation files to plan
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// The directory in which the output files should be stored
    #[arg(long, default_value = "out")]
    outdir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// The maximum number of files planned at once [default: one per core]
    #[arg(long, short)]
    jobs: Option<NonZeroUsize>,

    /// JSON file with planning options; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upper bound on any green time, in s
    #[arg(long)]
    max_green_time: Option<u32>,

    /// Divide street demand by the street's traversal time
    #[arg(long)]
    normalize: bool,

    /// Percentage of cars, least slack first, to ignore
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    drop_percent: Option<u8>,

    /// Also write each plan, with street weights, as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn options(&self) -> Result<Options, signal_plan::ConfigError> {
        let mut options = match &self.config {
            Some(path) => Options::from_file(path)?,
            None => Options::default(),
        };
        if self.normalize {
            options.demand.weighting = Weighting::PerTraversalTime;
        }
        if let Some(drop_percent) = self.drop_percent {
            options.demand = DemandOptions {
                drop_percent,
                ..options.demand
            };
        }
        if self.max_green_time.is_some() {
            options.max_green_time = self.max_green_time;
        }
        options.json |= self.json;
        options.validate()?;
        Ok(options)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = match args.options() {
        Ok(options) => options,
        Err(err) => {
            log::error!("Invalid options: {}", err);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("Storing the outputs in {}", args.outdir.display());
    if let Err(err) = std::fs::create_dir_all(&args.outdir) {
        log::error!("Could not create {}: {}", args.outdir.display(), err);
        return ExitCode::FAILURE;
    }

    let report = match batch::run(&args.inputs, &args.outdir, &options, args.jobs) {
        Ok(report) => report,
        Err(err) => {
            log::error!("Could not start worker threads: {}", err);
            return ExitCode::FAILURE;
        }
    };

    for (input, err) in report.failures() {
        eprintln!("{}: {}", input.display(), err);
    }
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_jobs_is_rejected() {
        assert!(Args::try_parse_from(["signal-plan", "--jobs", "0", "a.txt"]).is_err());
        let args = Args::try_parse_from(["signal-plan", "-j", "3", "a.txt"]).unwrap();
        assert_eq!(args.jobs.map(NonZeroUsize::get), Some(3));
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        std::fs::write(&config, r#"{ "demand": { "drop_percent": 10 }, "max_green_time": 5 }"#).unwrap();

        let args = Args::try_parse_from([
            "signal-plan",
            "--config",
            config.to_str().unwrap(),
            "--drop-percent",
            "20",
            "--normalize",
            "a.txt",
        ])
        .unwrap();
        let options = args.options().unwrap();
        assert_eq!(options.demand.drop_percent, 20);
        assert_eq!(options.demand.weighting, Weighting::PerTraversalTime);
        assert_eq!(options.max_green_time, Some(5));
        assert!(Args::try_parse_from(["signal-plan", "--drop-percent", "101", "a.txt"]).is_err());
    }
}
