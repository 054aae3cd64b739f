//! HTTP classifier for OpenAI-compatible `/responses` endpoints

use std::time::{Duration, Instant};

use async_trait::async_trait;
use redact_config::ClassifierConfig;
use redact_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, ClassifierResponse, RunMeta, SOURCE_ENTITY};
use crate::index::ParagraphIndex;
use crate::MAX_TITLE_CHARS;
use crate::prompt::{SYSTEM_PROMPT, build_title_prompt, build_user_prompt};

pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpClassifier {
    /// Build a classifier from config, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::ClassificationFailure(format!("{} is not set", config.api_key_env))
            })?;

        Self::new(config, api_key)
    }

    pub fn new(config: &ClassifierConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deck-redact/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                Error::ClassificationFailure(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn respond(&self, instructions: Option<&str>, input: String) -> Result<String> {
        let request = ResponsesRequest {
            model: &self.model,
            instructions,
            input: vec![InputMessage {
                role: "user",
                content: input,
            }],
        };

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ClassificationFailure(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ClassificationFailure(format!(
                "HTTP error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: ResponsesBody = response
            .json()
            .await
            .map_err(|e| Error::ClassificationFailure(format!("Invalid response body: {}", e)))?;

        body.text()
            .ok_or_else(|| Error::ClassificationFailure("Response contained no text".to_string()))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        instructions: &str,
        index: &ParagraphIndex,
    ) -> Result<(ClassifierResponse, RunMeta)> {
        let prompt = build_user_prompt(instructions, index);
        debug!("Classifier prompt:\n{}", prompt);
        info!(
            "Classifying with {} ({} slides sampled)",
            self.model,
            index.samples().len()
        );

        let started = Instant::now();
        let text = self.respond(Some(SYSTEM_PROMPT), prompt).await?;
        let elapsed = started.elapsed().as_secs_f64();

        let response = parse_response_text(&text)?;
        let meta = RunMeta {
            source: SOURCE_ENTITY.to_string(),
            model: Some(self.model.clone()),
            response_seconds: Some((elapsed * 1000.0).round() / 1000.0),
            samples_provided: Some(index.samples().len()),
            error: None,
        };

        Ok((response, meta))
    }

    async fn summarize(&self, instructions: &str) -> Option<String> {
        match self.respond(None, build_title_prompt(instructions)).await {
            Ok(text) => {
                let summary: String = text.trim().chars().take(MAX_TITLE_CHARS).collect();
                (!summary.is_empty()).then_some(summary)
            }
            Err(e) => {
                warn!("Failed to generate rule title: {}", e);
                None
            }
        }
    }
}

/// Parse classifier output, tolerating a surrounding Markdown code fence.
pub fn parse_response_text(text: &str) -> Result<ClassifierResponse> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| Error::ClassificationFailure(format!("Invalid JSON from model: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    input: Vec<InputMessage>,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    fn text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|t| !t.trim().is_empty()) {
            return Some(text);
        }

        let joined: String = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter_map(|content| content.text)
            .collect();

        (!joined.trim().is_empty()).then_some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> ResponsesBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_output_text_is_preferred() {
        let parsed = body(json!({
            "output_text": "{\"patterns\": []}",
            "output": [{"content": [{"text": "ignored"}]}]
        }));
        assert_eq!(parsed.text().as_deref(), Some("{\"patterns\": []}"));
    }

    #[test]
    fn test_output_content_is_concatenated() {
        let parsed = body(json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [{"text": "{\"entity_"}, {"text": "redactions\": []}"}]}
            ]
        }));
        assert_eq!(parsed.text().as_deref(), Some("{\"entity_redactions\": []}"));
    }

    #[test]
    fn test_empty_body_has_no_text() {
        assert!(body(json!({})).text().is_none());
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"entity_redactions\": [{\"entity\": \"Acme\", \"confidence\": 0.9}]}\n```";
        let parsed = parse_response_text(text).unwrap();
        assert_eq!(parsed.entity_redactions[0].entity, "Acme");
    }

    #[test]
    fn test_parse_invalid_json_is_classification_failure() {
        let result = parse_response_text("I could not find anything");
        assert!(matches!(result, Err(Error::ClassificationFailure(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let config = ClassifierConfig {
            api_key_env: "DECK_REDACT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpClassifier::from_config(&config),
            Err(Error::ClassificationFailure(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClassifierConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let classifier = HttpClassifier::new(&config, "key").unwrap();
        assert_eq!(classifier.base_url, "http://localhost:8080/v1");
        assert_eq!(classifier.model(), "gpt-4.1-mini");
    }
}
