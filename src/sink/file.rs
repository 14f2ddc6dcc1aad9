//! File sink - writes the whole run as one JSON array at end of run

use eyre::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::Sink;
use crate::envelope::Envelope;

/// Buffers envelopes and writes them to `path` in `on_end`
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    indent: Option<usize>,
    events: Vec<Envelope>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, indent: Option<usize>) -> Self {
        Self {
            path: path.into(),
            indent,
            events: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[Envelope] {
        &self.events
    }

    fn write_events(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        match self.indent {
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
                self.events.serialize(&mut ser)?;
            }
            None => serde_json::to_writer(&mut writer, &self.events)?,
        }

        writer.flush()?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn record_event(&mut self, event: &Envelope) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        self.write_events()
            .with_context(|| format!("Failed to write events to {}", self.path.display()))?;
        log::info!("Wrote {} event(s) to {}", self.events.len(), self.path.display());
        Ok(())
    }
}
