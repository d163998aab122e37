//! Progress notifications emitted at every orchestrator phase boundary.
//!
//! The sink is passed into the run explicitly. `LogProgressSink` forwards
//! events to `tracing`; `RecordingProgressSink` keeps them for inspection.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

/// Phase tag carried by each event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressPhase {
    ValidateInput,
    ParseData,
    CleanFolder,
    ValidationErrors,
    GenerateCode,
    CopyCustomCode,
}

impl ProgressPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressPhase::ValidateInput => "validate-input",
            ProgressPhase::ParseData => "parse-data",
            ProgressPhase::CleanFolder => "clean-folder",
            ProgressPhase::ValidationErrors => "validation-errors",
            ProgressPhase::GenerateCode => "generate-code",
            ProgressPhase::CopyCustomCode => "copy-custom-code",
        }
    }
}

impl fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProgressEvent {
    pub fn new(phase: ProgressPhase, log: impl Into<String>) -> Self {
        Self {
            phase,
            log: log.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    fn notify(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn notify(&self, event: &ProgressEvent) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn notify(&self, event: &ProgressEvent) {
        match event.phase {
            ProgressPhase::ValidationErrors => warn!(phase = %event.phase, "{}", event.log),
            _ => info!(phase = %event.phase, "{}", event.log),
        }
    }
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn phases(&self) -> Vec<ProgressPhase> {
        self.events().iter().map(|event| event.phase).collect()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn notify(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
