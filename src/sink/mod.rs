//! Reporting sinks
//!
//! A sink receives envelopes one at a time:
//! - File - buffers in memory, writes a JSON array when the run ends
//! - Http - POSTs every envelope as it arrives
//! - Memory - keeps envelopes in a shared buffer for inspection

use std::time::Duration;

use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::destination::Destination;
use crate::envelope::Envelope;

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileSink;
pub use http::HttpSink;
pub use memory::MemorySink;

/// Delivery backend for run events
///
/// Only `record_event` is required; the lifecycle hooks default to no-ops.
pub trait Sink: Send {
    /// Short name for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Called once before the start event is recorded
    fn on_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Deliver or buffer one envelope
    fn record_event(&mut self, event: &Envelope) -> Result<()>;

    /// Called once after the end event is recorded
    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Tunables applied when a sink is built from a destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkOptions {
    /// Pretty-print width for file output (compact when unset)
    pub file_indent: Option<usize>,
    /// Skip TLS certificate verification for HTTP sinks
    pub insecure_skip_verify: bool,
    /// Global per-request timeout for HTTP sinks
    pub timeout_secs: Option<u64>,
}

impl SinkOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Build the sink a destination points at
pub fn from_destination(destination: Destination, options: &SinkOptions) -> Box<dyn Sink> {
    match destination {
        Destination::File { path } => Box::new(FileSink::new(path, options.file_indent)),
        Destination::Http { url } => Box::new(HttpSink::new(url, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_destination_file() {
        let dest = Destination::File {
            path: PathBuf::from("/tmp/results.json"),
        };
        let sink = from_destination(dest, &SinkOptions::default());
        assert_eq!(sink.name(), "file");
    }

    #[test]
    fn test_from_destination_http() {
        let dest = Destination::Http {
            url: "https://example.test/ingest".to_string(),
        };
        let sink = from_destination(dest, &SinkOptions::default());
        assert_eq!(sink.name(), "http");
    }

    #[test]
    fn test_sink_options_timeout() {
        let options = SinkOptions {
            timeout_secs: Some(5),
            ..Default::default()
        };
        assert_eq!(options.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(SinkOptions::default().timeout(), None);
    }
}
