//! Progress events for a research run.
//!
//! The orchestrator reports each section as it starts and settles so front
//! ends can show progress while the join is still pending.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

use crate::provenance::Origin;

/// Sections of a research result, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Papers,
    Patents,
    News,
    Trends,
    Summary,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Papers => "papers",
            Section::Patents => "patents",
            Section::News => "news",
            Section::Trends => "trends",
            Section::Summary => "summary",
        }
    }
}

/// Lifecycle events of a research run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResearchEvent {
    /// Work on a section began
    Started { timestamp: u64, section: Section },
    /// A section settled, live or from fallback
    Finished {
        timestamp: u64,
        section: Section,
        origin: Origin,
        items: usize,
        duration_ms: u64,
    },
    /// All sections settled and the results were assembled
    Completed { timestamp: u64, search_time: f64 },
}

impl ResearchEvent {
    pub fn section(&self) -> Option<Section> {
        match self {
            ResearchEvent::Started { section, .. } | ResearchEvent::Finished { section, .. } => {
                Some(*section)
            }
            ResearchEvent::Completed { .. } => None,
        }
    }
}

/// Sending half of the progress channel
#[derive(Clone)]
pub struct EventCollector {
    sender: mpsc::UnboundedSender<ResearchEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ResearchEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn emit_started(&self, section: Section) {
        self.send(ResearchEvent::Started {
            timestamp: current_timestamp(),
            section,
        });
    }

    pub fn emit_finished(&self, section: Section, origin: Origin, items: usize, duration_ms: u64) {
        self.send(ResearchEvent::Finished {
            timestamp: current_timestamp(),
            section,
            origin,
            items,
            duration_ms,
        });
    }

    pub fn emit_completed(&self, search_time: f64) {
        self.send(ResearchEvent::Completed {
            timestamp: current_timestamp(),
            search_time,
        });
    }

    fn send(&self, event: ResearchEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!(error = %e, "progress receiver dropped; event discarded");
        }
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new().0
    }
}

/// Get current Unix timestamp in milliseconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
