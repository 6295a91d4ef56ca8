//! `record` subcommand: raw reading capture for later replay.

use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use fridge_monitor::config::{MonitorConfig, TimingConfig};
use fridge_monitor::error::{log_sensor_error, SensorError};
use fridge_monitor::sensor::{RawReading, SampleSource};

use super::SourceArgs;

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Destination CSV file.
    #[arg(long, short)]
    output: PathBuf,
    /// Stop after this many readings have been written.
    #[arg(long)]
    max_readings: Option<usize>,
    /// Override the delay between readings (milliseconds).
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
struct RecordRow {
    axis_x: f64,
    axis_y: f64,
    axis_z: f64,
    temperature_celsius: f64,
    button_a: u8,
    button_b: u8,
    seconds_since_start: f64,
}

impl RecordRow {
    fn new(reading: &RawReading, elapsed: Duration) -> Self {
        Self {
            axis_x: reading.axis_x,
            axis_y: reading.axis_y,
            axis_z: reading.axis_z,
            temperature_celsius: reading.temperature_celsius,
            button_a: reading.button_a,
            button_b: reading.button_b,
            seconds_since_start: elapsed.as_secs_f64(),
        }
    }
}

/// Readings written and skipped by one recording.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RecordStats {
    written: usize,
    skipped: usize,
}

pub fn record_command(mut config: MonitorConfig, args: RecordArgs) -> Result<()> {
    if let Some(ms) = args.interval_ms {
        config.timing.sample_interval_ms = ms;
    }
    let mut source = args.source.build()?;
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    info!(source = %source.describe(), output = %args.output.display(), "Recording raw readings");
    let stats = record_readings(
        source.as_mut(),
        &mut writer,
        &config.timing,
        args.max_readings,
    )?;

    info!(written = stats.written, skipped = stats.skipped, "Recording finished");
    println!(
        "Recorded {} readings to {}",
        stats.written,
        args.output.display()
    );
    Ok(())
}

/// Connect, copy readings, and disconnect even when copying fails.
fn record_readings<W: Write>(
    source: &mut dyn SampleSource,
    writer: &mut csv::Writer<W>,
    timing: &TimingConfig,
    max_readings: Option<usize>,
) -> Result<RecordStats> {
    source.connect().map_err(|err| {
        log_sensor_error(&err, "record connect");
        err
    })?;
    let result = copy_readings(source, writer, timing, max_readings);
    source.disconnect();
    result
}

fn copy_readings<W: Write>(
    source: &mut dyn SampleSource,
    writer: &mut csv::Writer<W>,
    timing: &TimingConfig,
    max_readings: Option<usize>,
) -> Result<RecordStats> {
    let started = Instant::now();
    let mut stats = RecordStats::default();
    loop {
        if max_readings.is_some_and(|max| stats.written >= max) {
            return Ok(stats);
        }
        let reading = match source.read() {
            Ok(reading) => reading,
            Err(SensorError::Exhausted) => return Ok(stats),
            Err(err) => {
                log_sensor_error(&err, "record read");
                return Err(err.into());
            }
        };

        if !reading.is_usable() {
            stats.skipped += 1;
            warn!(
                axis = reading.axis_x,
                temperature = reading.temperature_celsius,
                "Reading skipped"
            );
            pause(timing.fault_cooldown());
            continue;
        }

        writer
            .serialize(RecordRow::new(&reading, started.elapsed()))
            .context("writing recorded reading")?;
        writer.flush().context("flushing recording")?;
        stats.written += 1;

        if reading.button_a != 0 && reading.button_b != 0 {
            info!("Both buttons pressed; stopping");
            return Ok(stats);
        }
        pause(timing.sample_interval());
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
