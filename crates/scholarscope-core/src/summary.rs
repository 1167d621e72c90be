//! Narrative summary generation with a local fallback.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::extract::first_json_object;
use crate::fallback;
use crate::model::{NewsItem, Patent, Query, ResearchPaper, ResearchSummary};
use crate::provenance::{FallbackReason, Sourced};
use crate::providers::TextGenerator;

pub const DEFAULT_SNAPSHOT_CHARS: usize = 2_000;

/// Results gathered before summarization, handed to the model as context.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CollectedData<'a> {
    pub papers: &'a [ResearchPaper],
    pub patents: &'a [Patent],
    pub news: &'a [NewsItem],
}

impl CollectedData<'_> {
    /// JSON rendering truncated to at most `limit` characters.
    pub fn snapshot(&self, limit: usize) -> String {
        let serialized = serde_json::to_string(self).unwrap_or_default();
        match serialized.char_indices().nth(limit) {
            Some((cut, _)) => serialized[..cut].to_string(),
            None => serialized,
        }
    }
}

pub fn build_prompt(query: &Query, snapshot: &str) -> String {
    format!(
        r#"As an AI research assistant, analyze the research topic: "{query}".

Based on the following data context: {snapshot}

Provide a comprehensive research summary in the following JSON format:
{{
  "overview": "A detailed 2-3 paragraph overview of the current state of research in this field",
  "keyFindings": ["Finding 1", "Finding 2", "Finding 3", "Finding 4"],
  "futureDirections": ["Direction 1", "Direction 2", "Direction 3", "Direction 4"],
  "relatedFields": ["Field 1", "Field 2", "Field 3", "Field 4", "Field 5"]
}}

Make sure the content is specific to "{query}" and academically rigorous."#
    )
}

/// Parse the first JSON object embedded in generated text as a summary.
pub fn parse_summary(text: &str) -> Result<ResearchSummary, String> {
    let object = first_json_object(text).ok_or_else(|| "no JSON object found".to_string())?;
    serde_json::from_str(object).map_err(|err| err.to_string())
}

pub struct SummarySynthesizer {
    generator: Arc<dyn TextGenerator>,
    snapshot_chars: usize,
}

impl SummarySynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, snapshot_chars: usize) -> Self {
        Self {
            generator,
            snapshot_chars,
        }
    }

    /// Produce exactly one summary; failures degrade to the fallback summary.
    #[instrument(
        name = "summary.synthesize",
        skip(self, query, data),
        fields(generator = self.generator.name())
    )]
    pub async fn synthesize(&self, query: &Query, data: CollectedData<'_>) -> Sourced<ResearchSummary> {
        let prompt = build_prompt(query, &data.snapshot(self.snapshot_chars));

        let text = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "summary generation failed; using fallback");
                return Sourced::fell_back(
                    fallback::summary(query),
                    FallbackReason::Transport(err.to_string()),
                );
            }
        };

        match parse_summary(&text) {
            Ok(summary) => {
                info!(
                    key_findings = summary.key_findings.len(),
                    related_fields = summary.related_fields.len(),
                    "summary generated"
                );
                Sourced::Fetched(summary)
            }
            Err(reason) => {
                warn!(%reason, "generated summary was not parseable; using fallback");
                Sourced::fell_back(fallback::summary(query), FallbackReason::Parse(reason))
            }
        }
    }
}
