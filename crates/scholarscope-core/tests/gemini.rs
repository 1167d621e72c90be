use std::sync::Arc;

use scholarscope_core::providers::gemini::GeminiClient;
use scholarscope_core::summary::{CollectedData, DEFAULT_SNAPSHOT_CHARS, SummarySynthesizer};
use scholarscope_core::{FallbackReason, Origin, Query, SecretValue};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

fn synthesizer(server: &MockServer) -> SummarySynthesizer {
    let client = GeminiClient::new(
        reqwest::Client::new(),
        format!("{}/v1beta", server.uri()),
        "gemini-pro",
        SecretValue::new("gemini-key"),
    );
    SummarySynthesizer::new(Arc::new(client), DEFAULT_SNAPSHOT_CHARS)
}

fn empty_data() -> CollectedData<'static> {
    CollectedData {
        papers: &[],
        patents: &[],
        news: &[],
    }
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

#[tokio::test]
async fn embedded_summary_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_string_contains("coral reef restoration"))
        .respond_with(reply(
            "Sure! Here is the summary:\n```json\n{\"overview\": \"Reefs {recover} slowly.\", \"keyFindings\": [\"a\", \"b\"], \"futureDirections\": [\"c\"], \"relatedFields\": [\"Marine Biology\"]}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::parse("coral reef restoration").unwrap();
    let sourced = synthesizer(&server).synthesize(&query, empty_data()).await;

    assert_eq!(sourced.origin(), Origin::Live);
    let summary = sourced.value();
    assert_eq!(summary.overview, "Reefs {recover} slowly.");
    assert_eq!(summary.key_findings, vec!["a", "b"]);
    assert_eq!(summary.related_fields, vec!["Marine Biology"]);
}

#[tokio::test]
async fn unbalanced_reply_uses_fallback_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(reply("{\"overview\": \"cut off mid"))
        .mount(&server)
        .await;

    let query = Query::parse("coral reef restoration").unwrap();
    let sourced = synthesizer(&server).synthesize(&query, empty_data()).await;

    assert!(matches!(sourced.reason(), Some(FallbackReason::Parse(_))));
    let summary = sourced.value();
    assert!(summary.overview.contains("coral reef restoration"));
    assert_eq!(summary.key_findings.len(), 4);
    assert_eq!(summary.future_directions.len(), 4);
    assert_eq!(summary.related_fields.len(), 5);
}

#[tokio::test]
async fn rate_limited_generation_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let query = Query::parse("machine learning").unwrap();
    let sourced = synthesizer(&server).synthesize(&query, empty_data()).await;

    assert!(matches!(
        sourced.reason(),
        Some(FallbackReason::Transport(detail)) if detail.contains("HTTP 429")
    ));
    assert_eq!(
        sourced.value().related_fields,
        vec![
            "Computer Science",
            "Data Science",
            "Robotics",
            "Cognitive Science",
            "Statistics"
        ]
    );
}

#[tokio::test]
async fn reply_without_candidates_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let query = Query::parse("gene drives").unwrap();
    let sourced = synthesizer(&server).synthesize(&query, empty_data()).await;

    assert!(matches!(
        sourced.reason(),
        Some(FallbackReason::Transport(detail)) if detail.contains("no generated text")
    ));
    assert!(sourced.value().overview.contains("gene drives"));
}
