//! ScholarScope core: aggregates papers, patents, news and interest trends
//! for a research topic and asks a language model for a narrative summary.
//!
//! Every provider-backed section degrades to placeholder content on failure,
//! so a run with a valid query always yields a fully populated result.

pub mod config;
mod error;
pub mod events;
mod extract;
pub mod fallback;
pub mod model;
mod orchestrator;
pub mod provenance;
pub mod providers;
pub mod random;
mod security;
pub mod summary;
mod telemetry;
pub mod trends;

pub use config::{Config, ConfigLoader};
pub use error::{ProviderError, ScholarScopeError};
pub use events::{EventCollector, ResearchEvent, Section};
pub use model::{
    NewsItem, Patent, Query, ResearchOutcome, ResearchPaper, ResearchSummary, SearchResults,
    TrendPoint,
};
pub use orchestrator::{OrchestratorBuilder, ResearchOrchestrator, ResearchRun};
pub use provenance::{FallbackReason, Origin, Provenance, Sourced};
pub use security::{SecretValue, require_env};
pub use telemetry::{TelemetryOptions, init_telemetry};

/// Example topics offered to users who have not typed a query yet.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "Artificial Intelligence in Healthcare",
    "Quantum Computing Applications",
    "CRISPR Gene Editing Technology",
    "Renewable Energy Storage Solutions",
    "Autonomous Vehicle Safety Systems",
    "Machine Learning in Drug Discovery",
    "Blockchain in Supply Chain Management",
    "Neural Networks for Climate Modeling",
];
