//! Run reporter
//!
//! Wraps caller payloads in envelopes and pushes them to a sink in lifecycle
//! order: `report_start`, any number of `report_event`, then `report_end`.
//! Call order is not enforced.

use eyre::Result;
use uuid::Uuid;

use crate::destination::{self, DestinationError};
use crate::envelope::Envelope;
use crate::sink::{self, Sink, SinkOptions};

/// Reports the events of a single test run
pub struct Reporter {
    run_id: String,
    destination: String,
    sink: Box<dyn Sink>,
    tests: Vec<serde_json::Value>,
}

impl Reporter {
    /// Resolve `destination` with default sink options
    pub fn new(destination: &str) -> Result<Self, DestinationError> {
        Self::with_options(destination, &SinkOptions::default())
    }

    /// Resolve `destination` and build its sink with `options`
    pub fn with_options(destination: &str, options: &SinkOptions) -> Result<Self, DestinationError> {
        let resolved = destination::parse(destination)?;
        log::info!("Reporting to {}", resolved);
        Ok(Self::with_sink(destination, sink::from_destination(resolved, options)))
    }

    /// Use an explicit sink; `destination` is kept for diagnostics only
    pub fn with_sink(destination: &str, sink: Box<dyn Sink>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            destination: destination.to_string(),
            sink,
            tests: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Test descriptors attached to the start event
    pub fn tests(&self) -> &[serde_json::Value] {
        &self.tests
    }

    pub fn set_tests(&mut self, tests: Vec<serde_json::Value>) {
        self.tests = tests;
    }

    pub fn add_test(&mut self, descriptor: serde_json::Value) {
        self.tests.push(descriptor);
    }

    /// Run the sink's start hook, then record the `start` event
    pub fn report_start(&mut self, payload: serde_json::Value) -> Result<()> {
        self.sink.on_start()?;
        let envelope = Envelope::start(&self.run_id, payload, self.tests.clone());
        self.record(envelope)
    }

    /// Record an intermediate event of any kind
    pub fn report_event(&mut self, kind: &str, payload: serde_json::Value) -> Result<()> {
        let envelope = Envelope::event(&self.run_id, kind, payload);
        self.record(envelope)
    }

    /// Record the `end` event, then run the sink's end hook
    pub fn report_end(&mut self) -> Result<()> {
        let envelope = Envelope::end(&self.run_id);
        self.record(envelope)?;
        self.sink.on_end()
    }

    fn record(&mut self, envelope: Envelope) -> Result<()> {
        log::debug!("Recording '{}' event for run {}", envelope.event, self.run_id);
        self.sink.record_event(&envelope)
    }
}
