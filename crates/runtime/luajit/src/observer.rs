//! Receivers for `debug` intrinsic output.

use std::cell::RefCell;

use tracing::info;

/// Receives the rendering of every value passed to `harness.debug`.
pub trait Observer {
    fn debug(&self, rendered: &str);
}

/// Emits `debug` output as tracing events on the `harness::debug` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn debug(&self, rendered: &str) {
        info!(target: "harness::debug", "{}", rendered);
    }
}

/// Keeps `debug` output in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    lines: RefCell<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Observer for RecordingObserver {
    fn debug(&self, rendered: &str) {
        self.lines.borrow_mut().push(rendered.to_string());
    }
}
