//! CSV event log.
//!
//! One header row, then one `kind,HH:MM:SS,temperature` row per event. Each
//! row is flushed before `append` returns.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::EventLog;
use crate::analysis::DoorEvent;
use crate::error::SinkError;

/// Header written at the start of every session
pub const LOG_HEADER: [&str; 3] = ["Door Position", "Timestamp", "Temperature"];

pub struct CsvEventLog<W: Write> {
    writer: csv::Writer<W>,
    location: String,
    records: usize,
}

impl CsvEventLog<File> {
    /// Create (truncating) the log file and write the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|err| SinkError::LogOpen {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        Self::with_location(file, path.display().to_string())
    }
}

impl<W: Write> CsvEventLog<W> {
    pub fn from_writer(writer: W) -> Result<Self, SinkError> {
        Self::with_location(writer, "<writer>".to_string())
    }

    fn with_location(writer: W, location: String) -> Result<Self, SinkError> {
        let mut log = Self {
            writer: csv::Writer::from_writer(writer),
            location,
            records: 0,
        };
        log.write_row(&LOG_HEADER)?;
        Ok(log)
    }

    /// Events written so far (header excluded)
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    fn write_row<I, T>(&mut self, row: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .map_err(|err| SinkError::LogWrite {
                details: err.to_string(),
            })?;
        self.writer.flush().map_err(|err| SinkError::LogWrite {
            details: err.to_string(),
        })
    }
}

impl<W: Write> EventLog for CsvEventLog<W> {
    fn append(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        let row = [
            event.kind.log_label().to_string(),
            event.time_of_day(),
            event.temperature_celsius.to_string(),
        ];
        self.write_row(&row)?;
        self.records += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.location)
    }
}
