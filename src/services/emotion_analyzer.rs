//! Prompt selection strategy.
//!
//! `Keyword` is the deterministic lexicon scorer. `Claude` asks the Anthropic
//! Messages API to classify the entry instead; any failure of that call
//! degrades to the default prompt and is only logged.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::config::{AnalyzerKind, Config};
use crate::emotion::lexicon::{self, EmotionCategory, DEFAULT_PROMPT};
use crate::emotion::derive_prompt;

#[derive(Debug)]
pub enum EmotionAnalyzer {
    Keyword,
    Claude(ClaudeClassifier),
}

impl EmotionAnalyzer {
    pub fn from_config(config: &Config) -> Self {
        match config.emotion_analyzer {
            AnalyzerKind::Keyword => EmotionAnalyzer::Keyword,
            AnalyzerKind::Claude if config.claude_api_key.is_empty() => {
                tracing::warn!("EMOTION_ANALYZER=claude but CLAUDE_API_KEY is empty, using keyword analyzer");
                EmotionAnalyzer::Keyword
            }
            AnalyzerKind::Claude => EmotionAnalyzer::Claude(ClaudeClassifier::new(
                config.claude_api_url.clone(),
                config.claude_api_key.clone(),
                config.claude_model.clone(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EmotionAnalyzer::Keyword => "keyword",
            EmotionAnalyzer::Claude(_) => "claude",
        }
    }

    /// Never fails. A recognised declared mood always short-circuits analysis.
    pub async fn prompt_for(&self, text: &str, declared_mood: Option<&str>) -> &'static str {
        let client = match self {
            EmotionAnalyzer::Keyword => return derive_prompt(text, declared_mood),
            EmotionAnalyzer::Claude(client) => client,
        };

        if let Some(category) = declared_mood.and_then(lexicon::category_for_mood) {
            return category.prompt();
        }

        match client.classify(text).await {
            Ok(Some(category)) => category.prompt(),
            Ok(None) => DEFAULT_PROMPT,
            Err(e) => {
                tracing::warn!(error = %e, "Claude emotion analysis unavailable, using default prompt");
                DEFAULT_PROMPT
            }
        }
    }
}

#[derive(Debug)]
pub struct ClaudeClassifier {
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct Classification {
    category: String,
}

impl ClaudeClassifier {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            api_url,
            api_key,
            model,
        }
    }

    async fn classify(&self, text: &str) -> Result<Option<EmotionCategory>, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let response = client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": 64,
                "messages": [{
                    "role": "user",
                    "content": classification_prompt(text),
                }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Claude API error {}: {}", status, body);
        }

        let claude_response: serde_json::Value = response.json().await?;
        let text = claude_response["content"][0]["text"]
            .as_str()
            .context("Claude response has no text content")?;

        parse_classification(text)
    }
}

fn classification_prompt(diary_text: &str) -> String {
    let categories: Vec<&str> = EmotionCategory::ALL.iter().map(|c| c.as_str()).collect();
    format!(
        r#"Classify the dominant emotion of this diary entry.

Diary entry:
"""
{}
"""

Answer with JSON only, using this exact schema:
{{"category": "one of: {}, none"}}"#,
        diary_text,
        categories.join(", ")
    )
}

/// `none` means the model saw no clear emotion. Unknown names are errors.
fn parse_classification(text: &str) -> Result<Option<EmotionCategory>, anyhow::Error> {
    let start = text.find('{').context("no JSON object in response")?;
    let end = text.rfind('}').context("no JSON object in response")?;
    anyhow::ensure!(end > start, "no JSON object in response");

    let parsed: Classification = serde_json::from_str(&text[start..=end])?;
    if parsed.category.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    EmotionCategory::from_name(&parsed.category)
        .map(Some)
        .with_context(|| format!("unknown category '{}'", parsed.category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classification() {
        assert_eq!(
            parse_classification(r#"{"category": "sadness"}"#).unwrap(),
            Some(EmotionCategory::Sadness)
        );
        assert_eq!(
            parse_classification("Sure!\n```json\n{\"category\": \"Love\"}\n```").unwrap(),
            Some(EmotionCategory::Love)
        );
        assert_eq!(parse_classification(r#"{"category": "none"}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_classification_rejects_garbage() {
        assert!(parse_classification("no json here").is_err());
        assert!(parse_classification(r#"{"category": "nostalgia"}"#).is_err());
        assert!(parse_classification(r#"{"mood": "joy"}"#).is_err());
    }

    #[test]
    fn test_classification_prompt_lists_categories() {
        let prompt = classification_prompt("今日は雨");
        assert!(prompt.contains("今日は雨"));
        for category in EmotionCategory::ALL {
            assert!(prompt.contains(category.as_str()));
        }
    }

    #[test]
    fn test_claude_without_key_falls_back_to_keyword() {
        let mut config = Config::for_tests();
        config.emotion_analyzer = AnalyzerKind::Claude;
        assert_eq!(EmotionAnalyzer::from_config(&config).name(), "keyword");
    }

    #[tokio::test]
    async fn test_keyword_analyzer_matches_derive_prompt() {
        let analyzer = EmotionAnalyzer::Keyword;
        let text = "今日はとても嬉しい出来事があった";
        assert_eq!(analyzer.prompt_for(text, None).await, derive_prompt(text, None));
        assert_eq!(
            analyzer.prompt_for(text, Some("sad")).await,
            EmotionCategory::Sadness.prompt()
        );
    }

    fn claude_at(api_url: &str) -> EmotionAnalyzer {
        EmotionAnalyzer::Claude(ClaudeClassifier::new(
            api_url.into(),
            "key".into(),
            "model".into(),
        ))
    }

    #[tokio::test]
    async fn test_claude_mood_override_skips_network() {
        let analyzer = claude_at("http://127.0.0.1:1/v1/messages");
        assert_eq!(
            analyzer.prompt_for("anything", Some("calm")).await,
            EmotionCategory::Calm.prompt()
        );
    }

    #[tokio::test]
    async fn test_claude_unreachable_falls_back_to_default_prompt() {
        let analyzer = claude_at("http://127.0.0.1:1/v1/messages");
        // the keyword analyzer would pick joy here
        let text = "今日はとても嬉しい出来事があった";
        assert_eq!(analyzer.prompt_for(text, None).await, DEFAULT_PROMPT);
        assert_eq!(analyzer.prompt_for(text, Some("meh")).await, DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn test_claude_error_status_falls_back_to_default_prompt() {
        let app = axum::Router::new().route(
            "/v1/messages",
            axum::routing::post(|| async {
                (axum::http::StatusCode::SERVICE_UNAVAILABLE, "overloaded")
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let analyzer = claude_at(&format!("http://{addr}/v1/messages"));
        assert_eq!(analyzer.prompt_for("嬉しい", None).await, DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn test_claude_classification_selects_category_prompt() {
        let app = axum::Router::new().route(
            "/v1/messages",
            axum::routing::post(|| async {
                axum::Json(serde_json::json!({
                    "content": [{ "type": "text", "text": "{\"category\": \"calm\"}" }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let analyzer = claude_at(&format!("http://{addr}/v1/messages"));
        assert_eq!(
            analyzer.prompt_for("嬉しい", None).await,
            EmotionCategory::Calm.prompt()
        );
    }
}
