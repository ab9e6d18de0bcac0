//! Output and failure reporting

use std::sync::{Mutex, PoisonError};

/// Receives named outputs and failure messages of a run
pub trait OutputSink: Send + Sync {
    /// Publish a named output value
    fn set_output(&self, name: &str, value: &str);

    /// Report a failure. May be called more than once per run.
    fn set_failed(&self, message: &str);
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    outputs: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs in publication order
    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last value published under `name`
    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Failure messages in report order
    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for RecordingSink {
    fn set_output(&self, name: &str, value: &str) {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), value.to_string()));
    }

    fn set_failed(&self, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
