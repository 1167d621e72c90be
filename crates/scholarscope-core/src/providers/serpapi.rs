//! SerpApi-backed search for scholarly papers, patents and news.
//!
//! Responses are loosely typed: each record is decoded on its own and
//! dropped if malformed, and absent fields are filled with synthetic
//! defaults so downstream consumers never see a missing value.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Category, CategoryProvider};
use crate::error::ProviderError;
use crate::fallback::synthetic_patent_number;
use crate::model::{NewsItem, Patent, Query, ResearchPaper, null_as_default};
use crate::random::RandomSource;
use crate::security::SecretValue;

const PROVIDER: &str = "serpapi";

/// Engine tag and requested result count for a category.
fn engine(category: Category) -> (&'static str, u32) {
    match category {
        Category::Papers => ("google_scholar", 10),
        Category::Patents => ("google_patents", 5),
        Category::News => ("google_news", 5),
    }
}

pub struct SerpApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretValue,
    rng: Arc<dyn RandomSource>,
}

impl SerpApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: SecretValue,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            rng,
        }
    }

    async fn search(&self, category: Category, query: &Query) -> Result<Value, ProviderError> {
        let (engine, num) = engine(category);
        let num = num.to_string();

        debug!(%category, engine, "issuing search request");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("engine", engine),
                ("q", query.as_str()),
                ("api_key", self.api_key.expose()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|err| ProviderError::http(PROVIDER, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ProviderError::decode(PROVIDER, err.to_string()))
    }
}

#[async_trait]
impl CategoryProvider<ResearchPaper> for SerpApiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(
        &self,
        query: &Query,
        today: NaiveDate,
    ) -> Result<Vec<ResearchPaper>, ProviderError> {
        let body = self.search(Category::Papers, query).await?;
        Ok(map_papers(
            records(body, "organic_results"),
            today,
            self.rng.as_ref(),
        ))
    }
}

#[async_trait]
impl CategoryProvider<Patent> for SerpApiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(
        &self,
        query: &Query,
        today: NaiveDate,
    ) -> Result<Vec<Patent>, ProviderError> {
        let body = self.search(Category::Patents, query).await?;
        Ok(map_patents(
            records(body, "organic_results"),
            today,
            self.rng.as_ref(),
        ))
    }
}

#[async_trait]
impl CategoryProvider<NewsItem> for SerpApiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(
        &self,
        query: &Query,
        today: NaiveDate,
    ) -> Result<Vec<NewsItem>, ProviderError> {
        let body = self.search(Category::News, query).await?;
        Ok(map_news(
            records(body, "news_results"),
            today,
            self.rng.as_ref(),
        ))
    }
}

/// Pull the named result list out of a response; anything else is empty.
fn records(mut body: Value, key: &str) -> Vec<Value> {
    match body.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Title and snippet are mandatory for every category.
fn headline(title: Option<String>, snippet: Option<String>) -> Option<(String, String)> {
    Some((non_empty(title)?, non_empty(snippet)?))
}

/// A link given either as a bare URL or as `{ "link": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinkField {
    Url(String),
    Object { link: Option<String> },
}

impl LinkField {
    fn into_url(self) -> Option<String> {
        match self {
            Self::Url(url) => non_empty(Some(url)),
            Self::Object { link } => non_empty(link),
        }
    }
}

/// A news source given either as a plain name or as `{ "name": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceField {
    Name(String),
    Object { name: Option<String> },
}

impl SourceField {
    fn into_name(self) -> Option<String> {
        match self {
            Self::Name(name) => non_empty(Some(name)),
            Self::Object { name } => non_empty(name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScholarRecord {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    publication_info: Option<PublicationInfo>,
    inline_links: Option<InlineLinks>,
    #[serde(default, deserialize_with = "null_as_default")]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    authors: Vec<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InlineLinks {
    cited_by: Option<CitedBy>,
}

#[derive(Debug, Deserialize)]
struct CitedBy {
    total: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    link: Option<String>,
}

/// Citation totals arrive as numbers or as strings like `"123"`.
fn citation_total(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => {
            let digits: String = text
                .trim()
                .chars()
                .take_while(|ch| ch.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Trailing path segment of a resource link that points at a DOI.
fn doi_from_link(link: &str) -> Option<String> {
    if !link.contains("doi") {
        return None;
    }
    link.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn map_papers(records: Vec<Value>, today: NaiveDate, rng: &dyn RandomSource) -> Vec<ResearchPaper> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let record: ScholarRecord = serde_json::from_value(raw).ok()?;
            let (title, snippet) = headline(record.title, record.snippet)?;

            let (summary, names) = match record.publication_info {
                Some(info) => (info.summary, info.authors),
                None => (None, Vec::new()),
            };
            let mut segments = summary.as_deref().unwrap_or_default().split(" - ");
            let journal = segments.next().map(str::trim).filter(|s| !s.is_empty());
            let publication_date = segments.next().map(str::trim).filter(|s| !s.is_empty());

            let mut authors: Vec<String> = names
                .into_iter()
                .filter_map(|author| non_empty(author.name))
                .collect();
            if authors.is_empty() {
                authors.push(format!("Author {}", index + 1));
            }

            let citation_count = record
                .inline_links
                .and_then(|links| links.cited_by)
                .and_then(|cited| cited.total)
                .as_ref()
                .and_then(citation_total)
                .unwrap_or_else(|| rng.below(500));

            let doi = record
                .resources
                .first()
                .and_then(|resource| resource.link.as_deref())
                .and_then(doi_from_link);

            Some(ResearchPaper {
                title,
                authors,
                abstract_text: snippet,
                publication_date: publication_date
                    .map(str::to_string)
                    .unwrap_or_else(|| today.year().to_string()),
                journal: journal
                    .map(str::to_string)
                    .unwrap_or_else(|| "Academic Journal".to_string()),
                citation_count,
                url: non_empty(record.link).unwrap_or_else(|| "#".to_string()),
                doi,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct PatentRecord {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    inventors: Option<Vec<String>>,
    inventor: Option<String>,
    patent_id: Option<String>,
    priority_date: Option<String>,
    assignee: Option<String>,
    pdf: Option<LinkField>,
}

fn map_patents(records: Vec<Value>, today: NaiveDate, rng: &dyn RandomSource) -> Vec<Patent> {
    let mut patents = Vec::new();
    for raw in records {
        let Ok(record) = serde_json::from_value::<PatentRecord>(raw) else {
            continue;
        };
        let Some((title, snippet)) = headline(record.title, record.snippet) else {
            continue;
        };

        let inventors = record
            .inventors
            .filter(|names| !names.is_empty())
            .or_else(|| non_empty(record.inventor).map(|name| vec![name]))
            .unwrap_or_else(|| vec![format!("Inventor {}", patents.len() + 1)]);

        let url = record
            .pdf
            .and_then(LinkField::into_url)
            .or_else(|| non_empty(record.link))
            .unwrap_or_else(|| "#".to_string());

        patents.push(Patent {
            title,
            inventors,
            abstract_text: snippet,
            patent_number: non_empty(record.patent_id)
                .unwrap_or_else(|| synthetic_patent_number(rng)),
            publication_date: non_empty(record.priority_date)
                .unwrap_or_else(|| today.year().to_string()),
            assignee: non_empty(record.assignee).unwrap_or_else(|| "Technology Corp.".to_string()),
            url,
        });
    }
    patents
}

#[derive(Debug, Deserialize)]
struct NewsRecord {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    source: Option<SourceField>,
    date: Option<String>,
}

fn map_news(records: Vec<Value>, today: NaiveDate, rng: &dyn RandomSource) -> Vec<NewsItem> {
    records
        .into_iter()
        .filter_map(|raw| {
            let record: NewsRecord = serde_json::from_value(raw).ok()?;
            let (title, summary) = headline(record.title, record.snippet)?;

            Some(NewsItem {
                title,
                summary,
                source: record
                    .source
                    .and_then(SourceField::into_name)
                    .unwrap_or_else(|| "News Source".to_string()),
                published_date: non_empty(record.date)
                    .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
                url: non_empty(record.link).unwrap_or_else(|| "#".to_string()),
                relevance_score: rng.in_range(80, 20),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ConstantRandom;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
    }

    #[test]
    fn scholar_record_maps_all_fields() {
        let records = vec![json!({
            "title": "Attention Is All You Need",
            "snippet": "We propose the Transformer.",
            "link": "https://arxiv.org/abs/1706.03762",
            "publication_info": {
                "summary": "NeurIPS - 2017 - papers.nips.cc",
                "authors": [{"name": "A Vaswani"}, {"name": "N Shazeer"}]
            },
            "inline_links": {"cited_by": {"total": 120000}},
            "resources": [{"link": "https://doi.org/10.5555/3295222"}]
        })];

        let papers = map_papers(records, today(), &ConstantRandom(0.5));
        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        assert_eq!(paper.authors, vec!["A Vaswani", "N Shazeer"]);
        assert_eq!(paper.journal, "NeurIPS");
        assert_eq!(paper.publication_date, "2017");
        assert_eq!(paper.citation_count, 120_000);
        assert_eq!(paper.doi.as_deref(), Some("3295222"));
        assert_eq!(paper.url, "https://arxiv.org/abs/1706.03762");
    }

    #[test]
    fn scholar_record_fills_missing_fields() {
        let records = vec![
            json!({"title": "No snippet"}),
            json!({"title": "Bare", "snippet": "Only the basics", "resources": [{"link": "https://example.com/file.pdf"}]}),
        ];

        let papers = map_papers(records, today(), &ConstantRandom(0.5));
        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        // Index in the provider list, not in the kept list.
        assert_eq!(paper.authors, vec!["Author 2"]);
        assert_eq!(paper.journal, "Academic Journal");
        assert_eq!(paper.publication_date, "2024");
        assert_eq!(paper.citation_count, 250);
        assert_eq!(paper.url, "#");
        assert!(paper.doi.is_none());
    }

    #[test]
    fn null_lists_count_as_absent() {
        let records = vec![
            json!({"title": "First", "snippet": "one", "resources": null}),
            json!({
                "title": "Second",
                "snippet": "two",
                "publication_info": {"summary": "J - 2020", "authors": null}
            }),
        ];

        let papers = map_papers(records, today(), &ConstantRandom(0.5));
        assert_eq!(papers.len(), 2);
        assert!(papers[0].doi.is_none());
        assert_eq!(papers[1].authors, vec!["Author 2"]);
        assert_eq!(papers[1].journal, "J");
        assert_eq!(papers[1].publication_date, "2020");
    }

    #[test]
    fn citation_totals_accept_strings() {
        assert_eq!(citation_total(&json!("42")), Some(42));
        assert_eq!(citation_total(&json!(" 17 citations")), Some(17));
        assert_eq!(citation_total(&json!("n/a")), None);
        assert_eq!(citation_total(&json!(null)), None);
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let records = vec![
            json!({"title": 12, "snippet": "wrong type"}),
            json!({"title": "Good", "snippet": "fine"}),
        ];
        let papers = map_papers(records, today(), &ConstantRandom(0.1));
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title, "Good");
    }

    #[test]
    fn patent_record_prefers_pdf_link_and_numbers_inventors() {
        let records = vec![
            json!({
                "title": "Battery electrode",
                "snippet": "An electrode.",
                "patent_id": "US1234567B2",
                "priority_date": "2019-04-01",
                "assignee": "Acme",
                "inventors": ["Ada", "Grace"],
                "pdf": "https://patentimages.example/US1234567.pdf",
                "link": "https://patents.example/US1234567"
            }),
            json!({
                "title": "Separator film",
                "snippet": "A film.",
                "pdf": {"link": "https://patentimages.example/film.pdf"}
            }),
        ];

        let patents = map_patents(records, today(), &ConstantRandom(0.0));
        assert_eq!(patents.len(), 2);
        assert_eq!(patents[0].url, "https://patentimages.example/US1234567.pdf");
        assert_eq!(patents[0].inventors, vec!["Ada", "Grace"]);
        assert_eq!(patents[1].inventors, vec!["Inventor 2"]);
        assert_eq!(patents[1].patent_number, "US1000000");
        assert_eq!(patents[1].publication_date, "2024");
        assert_eq!(patents[1].assignee, "Technology Corp.");
        assert_eq!(patents[1].url, "https://patentimages.example/film.pdf");
    }

    #[test]
    fn news_record_accepts_object_source() {
        let records = vec![
            json!({"title": "Launch", "snippet": "It launched.", "source": {"name": "Wire"}, "date": "06/01/2024"}),
            json!({"title": "Quiet", "snippet": "Nothing."}),
        ];

        let news = map_news(records, today(), &ConstantRandom(0.0));
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].source, "Wire");
        assert_eq!(news[0].published_date, "06/01/2024");
        assert_eq!(news[1].source, "News Source");
        assert_eq!(news[1].published_date, "2024-06-09");
        assert_eq!(news[1].url, "#");
        assert!(news.iter().all(|item| (80..100).contains(&item.relevance_score)));
    }

    #[test]
    fn missing_result_list_is_empty() {
        assert!(records(json!({"error": "Invalid API key"}), "organic_results").is_empty());
        assert!(records(json!({"organic_results": "nope"}), "organic_results").is_empty());
    }
}
