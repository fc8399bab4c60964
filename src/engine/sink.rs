//! Output sinks handed to engines.

use std::sync::{Arc, Mutex};

use anyhow::Result;

/// Receives lifecycle and output events from engines.
///
/// The builder only forwards a sink; engines decide when to call it.
pub trait Sink: Send + Sync {
    fn started(&self) {}

    fn write(&self, output: &str) -> Result<()>;

    /// Called when `engine` begins producing output.
    fn run(&self, _engine: &str) {}

    fn finished(&self) {}

    fn close(&self) {}
}

pub type SharedSink = Arc<dyn Sink>;

/// One recorded sink event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Started,
    Write(String),
    Run(String),
    Finished,
    Close,
}

/// Keeps every event in memory, in call order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn push(&self, event: SinkEvent) {
        match self.events.lock() {
            Ok(mut e) => e.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl Sink for MemorySink {
    fn started(&self) {
        self.push(SinkEvent::Started);
    }

    fn write(&self, output: &str) -> Result<()> {
        self.push(SinkEvent::Write(output.to_owned()));
        Ok(())
    }

    fn run(&self, engine: &str) {
        self.push(SinkEvent::Run(engine.to_owned()));
    }

    fn finished(&self) {
        self.push(SinkEvent::Finished);
    }

    fn close(&self) {
        self.push(SinkEvent::Close);
    }
}
