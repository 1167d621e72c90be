//! Research orchestrator: concurrent fan-out to every section, then summary.
//!
//! Each provider-backed section absorbs its own failures, so the only way a
//! run ends in [`ResearchOutcome::Error`] is an invalid query or a defect
//! that escapes those per-section protections.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::ScholarScopeError;
use crate::events::{EventCollector, Section};
use crate::model::{NewsItem, Patent, Query, ResearchOutcome, ResearchPaper, SearchResults};
use crate::provenance::{Origin, Provenance, Sourced};
use crate::providers::gemini::GeminiClient;
use crate::providers::serpapi::SerpApiClient;
use crate::providers::{
    CategoryProvider, ProviderAdapter, TextGenerator, UnavailableProvider, build_http_client,
};
use crate::random::{RandomSource, ThreadRandom};
use crate::summary::{CollectedData, DEFAULT_SNAPSHOT_CHARS, SummarySynthesizer};
use crate::trends;

const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Results of one run together with where each section came from.
#[derive(Debug, Clone)]
pub struct ResearchRun {
    pub results: SearchResults,
    pub provenance: Provenance,
}

pub struct ResearchOrchestrator {
    papers: ProviderAdapter<ResearchPaper>,
    patents: ProviderAdapter<Patent>,
    news: ProviderAdapter<NewsItem>,
    summary: SummarySynthesizer,
    rng: Arc<dyn RandomSource>,
    today: Option<NaiveDate>,
    events: Option<EventCollector>,
}

impl ResearchOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Wire live SerpApi and Gemini clients, resolving credentials from the environment.
    pub fn from_config(config: &Config) -> Result<Self, ScholarScopeError> {
        let http = build_http_client(&config.http)?;
        let rng: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

        let serpapi = Arc::new(SerpApiClient::new(
            http.clone(),
            config.serpapi.base_url.clone(),
            config.serpapi_api_key()?,
            rng.clone(),
        ));
        let gemini = Arc::new(GeminiClient::new(
            http,
            config.gemini.base_url.clone(),
            config.gemini.model.clone(),
            config.gemini_api_key()?,
        ));

        Ok(Self::builder()
            .papers(serpapi.clone())
            .patents(serpapi.clone())
            .news(serpapi)
            .generator(gemini)
            .random(rng)
            .snapshot_chars(config.summary.snapshot_chars)
            .build())
    }

    /// An orchestrator with no providers wired; every section uses fallback data.
    pub fn offline() -> Self {
        Self::builder().build()
    }

    /// Attach a progress channel.
    pub fn with_events(mut self, events: EventCollector) -> Self {
        self.events = Some(events);
        self
    }

    /// Run a full research pass and report it as a tagged outcome. Never panics.
    pub async fn perform_research(&self, query: &str) -> ResearchOutcome {
        match self.research(query).await {
            Ok(run) => ResearchOutcome::Success { data: run.results },
            Err(err) => {
                warn!(error = %err, "research failed");
                ResearchOutcome::Error {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Run a full research pass, keeping per-section provenance.
    ///
    /// Fails only for a blank query, or with [`ScholarScopeError::Aborted`]
    /// when a panic escapes the per-section handling.
    pub async fn research(&self, query: &str) -> Result<ResearchRun, ScholarScopeError> {
        let query = Query::parse(query)?;
        let span = info_span!("research", run_id = %Uuid::new_v4(), query = %query);

        AssertUnwindSafe(self.run(query))
            .catch_unwind()
            .instrument(span)
            .await
            .map_err(|payload| {
                let message = panic_message(payload.as_ref());
                error!(%message, "research aborted by an unexpected failure");
                ScholarScopeError::Aborted(message)
            })
    }

    async fn run(&self, query: Query) -> ResearchRun {
        let started = Instant::now();
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());

        let trend_series = async {
            self.emit(|events| events.emit_started(Section::Trends));
            let points = trends::synthesize(&query, today, self.rng.as_ref());
            self.emit(|events| {
                events.emit_finished(Section::Trends, Origin::Synthetic, points.len(), 0)
            });
            points
        };

        let (papers, patents, news, trends) = tokio::join!(
            self.track(Section::Papers, self.papers.collect(&query, today)),
            self.track(Section::Patents, self.patents.collect(&query, today)),
            self.track(Section::News, self.news.collect(&query, today)),
            trend_series,
        );

        let (papers, papers_origin) = papers.into_parts();
        let (patents, patents_origin) = patents.into_parts();
        let (news, news_origin) = news.into_parts();

        let data = CollectedData {
            papers: &papers,
            patents: &patents,
            news: &news,
        };
        let (summary, summary_origin) = self
            .track_summary(self.summary.synthesize(&query, data))
            .await
            .into_parts();

        let search_time = started.elapsed().as_secs_f64();
        let provenance = Provenance {
            papers: papers_origin,
            patents: patents_origin,
            news: news_origin,
            trends: Origin::Synthetic,
            summary: summary_origin,
        };

        info!(
            search_time,
            papers = papers.len(),
            patents = patents.len(),
            news = news.len(),
            any_fallback = provenance.any_fallback(),
            "research complete"
        );
        self.emit(|events| events.emit_completed(search_time));

        ResearchRun {
            results: SearchResults {
                query: query.to_string(),
                summary,
                papers,
                patents,
                trends,
                news,
                search_time,
            },
            provenance,
        }
    }

    async fn track<T>(
        &self,
        section: Section,
        work: impl Future<Output = Sourced<Vec<T>>>,
    ) -> Sourced<Vec<T>> {
        self.emit(|events| events.emit_started(section));
        let started = Instant::now();
        let sourced = work.await;
        let duration_ms = started.elapsed().as_millis() as u64;
        self.emit(|events| {
            events.emit_finished(section, sourced.origin(), sourced.value().len(), duration_ms)
        });
        sourced
    }

    async fn track_summary<T>(&self, work: impl Future<Output = Sourced<T>>) -> Sourced<T> {
        self.emit(|events| events.emit_started(Section::Summary));
        let started = Instant::now();
        let sourced = work.await;
        let duration_ms = started.elapsed().as_millis() as u64;
        self.emit(|events| {
            events.emit_finished(Section::Summary, sourced.origin(), 1, duration_ms)
        });
        sourced
    }

    fn emit(&self, send: impl FnOnce(&EventCollector)) {
        if let Some(events) = &self.events {
            send(events);
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

/// Assembles an orchestrator; any provider left unset is treated as unavailable.
pub struct OrchestratorBuilder {
    papers: Option<Arc<dyn CategoryProvider<ResearchPaper>>>,
    patents: Option<Arc<dyn CategoryProvider<Patent>>>,
    news: Option<Arc<dyn CategoryProvider<NewsItem>>>,
    generator: Option<Arc<dyn TextGenerator>>,
    rng: Option<Arc<dyn RandomSource>>,
    snapshot_chars: usize,
    today: Option<NaiveDate>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self {
            papers: None,
            patents: None,
            news: None,
            generator: None,
            rng: None,
            snapshot_chars: DEFAULT_SNAPSHOT_CHARS,
            today: None,
        }
    }
}

impl OrchestratorBuilder {
    pub fn papers(mut self, provider: Arc<dyn CategoryProvider<ResearchPaper>>) -> Self {
        self.papers = Some(provider);
        self
    }

    pub fn patents(mut self, provider: Arc<dyn CategoryProvider<Patent>>) -> Self {
        self.patents = Some(provider);
        self
    }

    pub fn news(mut self, provider: Arc<dyn CategoryProvider<NewsItem>>) -> Self {
        self.news = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn random(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn snapshot_chars(mut self, snapshot_chars: usize) -> Self {
        self.snapshot_chars = snapshot_chars;
        self
    }

    /// Pin "today" for fallback dates and trend months.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> ResearchOrchestrator {
        let rng = self.rng.unwrap_or_else(|| Arc::new(ThreadRandom));
        let papers = self.papers.unwrap_or_else(|| Arc::new(UnavailableProvider));
        let patents = self.patents.unwrap_or_else(|| Arc::new(UnavailableProvider));
        let news = self.news.unwrap_or_else(|| Arc::new(UnavailableProvider));
        let generator = self
            .generator
            .unwrap_or_else(|| Arc::new(UnavailableProvider));

        ResearchOrchestrator {
            papers: ProviderAdapter::new(papers, rng.clone()),
            patents: ProviderAdapter::new(patents, rng.clone()),
            news: ProviderAdapter::new(news, rng.clone()),
            summary: SummarySynthesizer::new(generator, self.snapshot_chars),
            rng,
            today: self.today,
            events: None,
        }
    }
}
