//! Test-run event reporter
//!
//! Collects run lifecycle events and ships them to a sink chosen by a
//! destination string:
//! - `file:///path/results.json` or a bare path - JSON array written at end of run
//! - `http(s)://host/ingest` - one POST per event
//!
//! ```no_run
//! use serde_json::json;
//! use testinel::Reporter;
//!
//! # fn main() -> eyre::Result<()> {
//! let mut reporter = Reporter::new("results.json")?;
//! reporter.add_test(json!({"test_id": "suite::case"}));
//! reporter.report_start(json!({"runner": "cargo"}))?;
//! reporter.report_event("call", json!({"test_id": "suite::case", "outcome": "passed"}))?;
//! reporter.report_end()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod destination;
pub mod envelope;
pub mod reporter;
pub mod sink;

pub use destination::{Destination, DestinationError};
pub use envelope::{ClientMetadata, Envelope};
pub use reporter::Reporter;
pub use sink::{FileSink, HttpSink, MemorySink, Sink, SinkOptions};
