//! Outbound data providers and the adapter that absorbs their failures.
//!
//! Providers are reached through two seams: [`CategoryProvider`] for list
//! data (papers, patents, news) and [`TextGenerator`] for summaries. Live
//! implementations live in [`serpapi`] and [`gemini`]; tests substitute
//! their own.

pub mod gemini;
pub mod serpapi;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::config::HttpConfig;
use crate::error::{ProviderError, ScholarScopeError};
use crate::fallback;
use crate::model::{NewsItem, Patent, Query, ResearchPaper};
use crate::provenance::{FallbackReason, Sourced};
use crate::random::RandomSource;

/// Provider-backed result categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Papers,
    Patents,
    News,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Papers => "papers",
            Self::Patents => "patents",
            Self::News => "news",
        }
    }

    /// Maximum number of items kept from a live response.
    pub fn cap(&self) -> usize {
        match self {
            Self::Papers => 5,
            Self::Patents => 3,
            Self::News => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type that belongs to one category and knows its placeholder content.
pub trait CategoryEntity: Clone + Send + Sync + 'static {
    const CATEGORY: Category;

    fn fallback(query: &Query, today: NaiveDate, rng: &dyn RandomSource) -> Vec<Self>;
}

impl CategoryEntity for ResearchPaper {
    const CATEGORY: Category = Category::Papers;

    fn fallback(query: &Query, today: NaiveDate, rng: &dyn RandomSource) -> Vec<Self> {
        fallback::papers(query, today, rng)
    }
}

impl CategoryEntity for Patent {
    const CATEGORY: Category = Category::Patents;

    fn fallback(query: &Query, today: NaiveDate, rng: &dyn RandomSource) -> Vec<Self> {
        fallback::patents(query, today, rng)
    }
}

impl CategoryEntity for NewsItem {
    const CATEGORY: Category = Category::News;

    fn fallback(query: &Query, today: NaiveDate, _rng: &dyn RandomSource) -> Vec<Self> {
        fallback::news(query, today)
    }
}

/// A remote source of entities for one category.
///
/// `today` fills dates the provider leaves out, so a pinned run date
/// reaches live records as well as fallbacks.
#[async_trait]
pub trait CategoryProvider<T: Send + 'static>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, query: &Query, today: NaiveDate) -> Result<Vec<T>, ProviderError>;
}

/// A remote model that turns a prompt into free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Stand-in for providers that are deliberately not wired (offline mode).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProvider;

impl UnavailableProvider {
    const NAME: &'static str = "offline";
}

#[async_trait]
impl<T: Send + 'static> CategoryProvider<T> for UnavailableProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self, _query: &Query, _today: NaiveDate) -> Result<Vec<T>, ProviderError> {
        Err(ProviderError::Unavailable {
            provider: Self::NAME,
        })
    }
}

#[async_trait]
impl TextGenerator for UnavailableProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable {
            provider: Self::NAME,
        })
    }
}

/// Wraps one provider and substitutes placeholder data on failure or empty output.
pub struct ProviderAdapter<T: CategoryEntity> {
    provider: Arc<dyn CategoryProvider<T>>,
    rng: Arc<dyn RandomSource>,
}

impl<T: CategoryEntity> ProviderAdapter<T> {
    pub fn new(provider: Arc<dyn CategoryProvider<T>>, rng: Arc<dyn RandomSource>) -> Self {
        Self { provider, rng }
    }

    /// Fetch, normalize and cap the category; never fails.
    #[instrument(
        name = "adapter.collect",
        skip(self, query, today),
        fields(category = %T::CATEGORY, provider = self.provider.name())
    )]
    pub async fn collect(&self, query: &Query, today: NaiveDate) -> Sourced<Vec<T>> {
        match self.provider.fetch(query, today).await {
            Ok(mut items) if !items.is_empty() => {
                let received = items.len();
                items.truncate(T::CATEGORY.cap());
                info!(received, kept = items.len(), "provider returned results");
                Sourced::Fetched(items)
            }
            Ok(_) => {
                warn!("provider returned no usable records; using fallback");
                Sourced::fell_back(
                    T::fallback(query, today, self.rng.as_ref()),
                    FallbackReason::Empty,
                )
            }
            Err(err) => {
                warn!(error = %err, "provider request failed; using fallback");
                Sourced::fell_back(
                    T::fallback(query, today, self.rng.as_ref()),
                    FallbackReason::Transport(err.to_string()),
                )
            }
        }
    }
}

/// Build the HTTP client shared by the live provider clients.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, ScholarScopeError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "scholarscope/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout_ms) = config.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }
    builder.build().map_err(ScholarScopeError::HttpClient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    struct FixedPapers(Vec<ResearchPaper>);

    #[async_trait]
    impl CategoryProvider<ResearchPaper> for FixedPapers {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(
            &self,
            _query: &Query,
            _today: NaiveDate,
        ) -> Result<Vec<ResearchPaper>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    /// Stamps each record with the date it was asked to fill in.
    struct DatedPapers;

    #[async_trait]
    impl CategoryProvider<ResearchPaper> for DatedPapers {
        fn name(&self) -> &'static str {
            "dated"
        }

        async fn fetch(
            &self,
            _query: &Query,
            today: NaiveDate,
        ) -> Result<Vec<ResearchPaper>, ProviderError> {
            let mut record = paper(0);
            record.publication_date = today.to_string();
            Ok(vec![record])
        }
    }

    fn paper(n: usize) -> ResearchPaper {
        ResearchPaper {
            title: format!("Paper {n}"),
            authors: vec!["A".into()],
            abstract_text: "abstract".into(),
            publication_date: "2024".into(),
            journal: "J".into(),
            citation_count: 1,
            url: "#".into(),
            doi: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn live_results_are_capped() {
        let adapter: ProviderAdapter<ResearchPaper> = ProviderAdapter::new(
            Arc::new(FixedPapers((0..9).map(paper).collect())),
            Arc::new(SeededRandom::new(1)),
        );
        let query = Query::parse("q").unwrap();
        let sourced = adapter.collect(&query, today()).await;
        assert!(!sourced.is_fallback());
        assert_eq!(sourced.value().len(), Category::Papers.cap());
        assert_eq!(sourced.value()[0].title, "Paper 0");
    }

    #[tokio::test]
    async fn run_date_is_passed_to_provider() {
        let adapter: ProviderAdapter<ResearchPaper> =
            ProviderAdapter::new(Arc::new(DatedPapers), Arc::new(SeededRandom::new(1)));
        let query = Query::parse("q").unwrap();
        let sourced = adapter.collect(&query, today()).await;
        assert_eq!(sourced.value()[0].publication_date, "2024-05-01");
    }

    #[tokio::test]
    async fn empty_results_fall_back() {
        let adapter: ProviderAdapter<ResearchPaper> = ProviderAdapter::new(
            Arc::new(FixedPapers(Vec::new())),
            Arc::new(SeededRandom::new(1)),
        );
        let query = Query::parse("tidal energy").unwrap();
        let sourced = adapter.collect(&query, today()).await;
        assert_eq!(sourced.reason(), Some(&FallbackReason::Empty));
        assert_eq!(sourced.value().len(), fallback::FALLBACK_PAPER_COUNT);
    }

    #[tokio::test]
    async fn unavailable_provider_falls_back_with_transport_reason() {
        let adapter: ProviderAdapter<Patent> =
            ProviderAdapter::new(Arc::new(UnavailableProvider), Arc::new(SeededRandom::new(1)));
        let query = Query::parse("tidal energy").unwrap();
        let sourced = adapter.collect(&query, today()).await;
        assert!(matches!(
            sourced.reason(),
            Some(FallbackReason::Transport(reason)) if reason.contains("unavailable")
        ));
        assert_eq!(sourced.value().len(), fallback::FALLBACK_PATENT_COUNT);
    }

    #[test]
    fn caps_per_category() {
        assert_eq!(Category::Papers.cap(), 5);
        assert_eq!(Category::Patents.cap(), 3);
        assert_eq!(Category::News.cap(), 4);
    }
}
