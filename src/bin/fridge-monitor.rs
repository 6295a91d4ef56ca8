use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use fridge_monitor::config::{MonitorConfig, TimingConfig};
use fridge_monitor::engine::MonitorEngine;
use fridge_monitor::error::log_config_error;
use fridge_monitor::sensor::{ReplaySource, SampleSource, SimulatedFridge, SimulationScript};
use fridge_monitor::sinks::JsonLinesLog;
use fridge_monitor::MonitorContext;

#[path = "fridge_monitor/record.rs"]
mod record;

fn main() -> ExitCode {
    let cli = Cli::parse();
    fridge_monitor::init_logging(if cli.verbose { "debug" } else { "info" });
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fridge-monitor error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fridge-monitor",
    about = "Infer fridge door state from magnetometer drift and temperature trend"
)]
struct Cli {
    /// JSON configuration file (defaults apply for anything it omits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_ref())?;
        match self.command {
            Command::Run(args) => run_command(config, args),
            Command::Stream(args) => stream_command(config, args),
            Command::Record(args) => record::record_command(config, args),
            Command::DefaultConfig => {
                println!("{}", serde_json::to_string_pretty(&MonitorConfig::default())?);
                Ok(())
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monitor with real-time delays, writing the CSV event log.
    Run(RunArgs),
    /// Classify a source without delays and print events as JSON lines.
    Stream(StreamArgs),
    /// Copy raw readings from a source into a replayable CSV file.
    Record(record::RecordArgs),
    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Replay raw readings from a CSV file.
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Use the seeded fridge simulation.
    #[arg(long, default_value_t = false)]
    simulate: bool,
    /// Seed for --simulate.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Door open/close cycles for --simulate.
    #[arg(long)]
    cycles: Option<u32>,
}

impl SourceArgs {
    fn build(&self) -> Result<Box<dyn SampleSource>> {
        match (&self.replay, self.simulate) {
            (Some(path), false) => {
                if !path.exists() {
                    bail!("replay file {} does not exist", path.display());
                }
                Ok(Box::new(ReplaySource::from_csv_path(path)))
            }
            (None, true) => {
                let mut script = SimulationScript::default();
                if let Some(cycles) = self.cycles {
                    script.cycles = cycles;
                }
                Ok(Box::new(SimulatedFridge::new(script, self.seed)))
            }
            (Some(_), true) => bail!("Provide only one source: --replay or --simulate"),
            (None, false) => bail!(
                "No live sensor transport is built in; provide a source via --replay or --simulate"
            ),
        }
    }
}

#[derive(Args, Debug, Clone)]
struct EstimatorArgs {
    /// Override the shake tolerance (axis units).
    #[arg(long)]
    shake_tolerance: Option<f64>,
    /// Do not emit Cooling events.
    #[arg(long, default_value_t = false)]
    no_cooling: bool,
}

impl EstimatorArgs {
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(tolerance) = self.shake_tolerance {
            config.estimator.shake_tolerance = tolerance;
        }
        if self.no_cooling {
            config.estimator.report_cooling = false;
        }
    }
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    estimator: EstimatorArgs,
    /// Override the CSV event log path.
    #[arg(long)]
    log_path: Option<PathBuf>,
    /// Disable remote analytics even if configured.
    #[arg(long, default_value_t = false)]
    no_remote: bool,
    /// Wait for a button press before monitoring.
    #[arg(long, default_value_t = false)]
    wait_for_start: bool,
    /// Override the settle delay before the first reading (milliseconds).
    #[arg(long)]
    settle_ms: Option<u64>,
    /// Override the delay between readings (milliseconds).
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct StreamArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    estimator: EstimatorArgs,
}

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::load_from_file(path)
            .map_err(|err| {
                log_config_error(&err, "startup");
                err
            })
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(MonitorConfig::default()),
    }
}

fn run_command(mut config: MonitorConfig, args: RunArgs) -> Result<()> {
    args.estimator.apply(&mut config);
    if let Some(path) = args.log_path {
        config.output.log_path = path;
    }
    if args.no_remote {
        config.output.remote = None;
    }
    if args.wait_for_start {
        config.wait_for_start_button = true;
    }
    if let Some(ms) = args.settle_ms {
        config.timing.settle_delay_ms = ms;
    }
    if let Some(ms) = args.interval_ms {
        config.timing.sample_interval_ms = ms;
    }
    config.validate()?;

    let source = args.source.build()?;
    let context = MonitorContext::from_config(&config, source)
        .with_context(|| format!("opening sinks for {}", config.output.log_path.display()))?;
    let mut engine = MonitorEngine::new(context, &config);
    let summary = engine.run()?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    eprintln!("Exiting. CSV path - {}", config.output.log_path.display());
    Ok(())
}

fn stream_command(mut config: MonitorConfig, args: StreamArgs) -> Result<()> {
    args.estimator.apply(&mut config);
    config.timing = TimingConfig::immediate();
    config.validate()?;

    let source = args.source.build()?;
    let context = MonitorContext::new(source, Box::new(JsonLinesLog::new(io::stdout())));
    let mut engine = MonitorEngine::new(context, &config);
    engine.run()?;
    Ok(())
}
