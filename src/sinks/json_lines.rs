//! JSON-lines event log, used by the `stream` command to print events.

use std::io::Write;

use super::EventLog;
use crate::analysis::DoorEvent;
use crate::error::SinkError;

pub struct JsonLinesLog<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventLog for JsonLinesLog<W> {
    fn append(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        let to_sink_error = |err: std::io::Error| SinkError::LogWrite {
            details: err.to_string(),
        };
        serde_json::to_writer(&mut self.writer, event).map_err(|err| SinkError::LogWrite {
            details: err.to_string(),
        })?;
        self.writer.write_all(b"\n").map_err(to_sink_error)?;
        self.writer.flush().map_err(to_sink_error)
    }

    fn describe(&self) -> String {
        "json-lines".to_string()
    }
}
