//! Value objects produced by a single research run.
//!
//! Field names serialize in camelCase to match the shape browser clients
//! already consume.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ScholarScopeError;

/// Decode an explicit `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A validated, trimmed, non-empty research topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, ScholarScopeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScholarScopeError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Query {
    type Error = ScholarScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPaper {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub publication_date: String,
    pub journal: String,
    pub citation_count: u32,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patent {
    pub title: String,
    pub inventors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub patent_number: String,
    pub publication_date: String,
    pub assignee: String,
    pub url: String,
}

/// One month of synthetic search interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub keyword: String,
    pub interest: u32,
    /// Month label, `YYYY-MM`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub published_date: String,
    pub url: String,
    pub relevance_score: u32,
}

/// Narrative summary of a topic.
///
/// Every field defaults to empty on decode, whether omitted or `null`: a
/// generated object that parses is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_findings: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub future_directions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub related_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub summary: ResearchSummary,
    pub papers: Vec<ResearchPaper>,
    pub patents: Vec<Patent>,
    pub trends: Vec<TrendPoint>,
    pub news: Vec<NewsItem>,
    /// Wall-clock seconds spent producing the results.
    pub search_time: f64,
}

impl SearchResults {
    /// Number of papers, patents and news items combined.
    pub fn total_results(&self) -> usize {
        self.papers.len() + self.patents.len() + self.news.len()
    }
}

/// Tagged result of a research run; the only success/failure signal callers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResearchOutcome {
    Success { data: SearchResults },
    Error { message: String },
}

impl ResearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn results(&self) -> Option<&SearchResults> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }
}
