//! In-memory sink for embedding and tests

use eyre::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Sink;
use crate::envelope::Envelope;

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<Envelope>,
    starts: usize,
    ends: usize,
}

/// Records envelopes and hook calls in shared state
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// `Reporter` and inspect what it received through another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded data stays readable even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of recorded envelopes
    pub fn events(&self) -> Vec<Envelope> {
        self.lock().events.clone()
    }

    /// Number of `on_start` calls
    pub fn start_calls(&self) -> usize {
        self.lock().starts
    }

    /// Number of `on_end` calls
    pub fn end_calls(&self) -> usize {
        self.lock().ends
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn on_start(&mut self) -> Result<()> {
        self.lock().starts += 1;
        Ok(())
    }

    fn record_event(&mut self, event: &Envelope) -> Result<()> {
        self.lock().events.push(event.clone());
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        self.lock().ends += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let sink = MemorySink::new();
        let mut handle: Box<dyn Sink> = Box::new(sink.clone());

        handle.on_start().unwrap();
        handle.record_event(&Envelope::end("run-1")).unwrap();
        handle.on_end().unwrap();

        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.start_calls(), 1);
        assert_eq!(sink.end_calls(), 1);
    }

    #[test]
    fn test_poisoned_state_still_readable() {
        let sink = MemorySink::new();
        let mut handle = sink.clone();
        handle.record_event(&Envelope::end("run-1")).unwrap();

        let poisoner = sink.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the memory sink lock");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.state.is_poisoned());

        handle.on_end().unwrap();
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.end_calls(), 1);
    }
}
