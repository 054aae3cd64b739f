//! Classifier collaborator
//!
//! The classifier turns instructions plus sampled deck text into entity,
//! rewrite and pattern suggestions. This module defines the seam, the
//! response shape, and the conversion of suggestions into actions.

use async_trait::async_trait;
use redact_core::{Action, ActionType, Error, Metadata, Result, Scope};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::index::ParagraphIndex;

pub const SOURCE_ENTITY: &str = "llm_entity_extraction";
pub const SOURCE_REWRITE: &str = "llm_paragraph_rewrite";
pub const SOURCE_PATTERN: &str = "llm_pattern_extraction";
pub const SOURCE_FALLBACK: &str = "fallback_heuristic";

/// Structured classifier output. Missing sections read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierResponse {
    #[serde(default)]
    pub entity_redactions: Vec<EntityRedaction>,
    #[serde(default)]
    pub paragraph_rewrites: Vec<ParagraphRewrite>,
    #[serde(default)]
    pub patterns: Vec<PatternRedaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRedaction {
    #[serde(default)]
    pub entity: String,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphRewrite {
    #[serde(default)]
    pub paragraph_id: Option<String>,
    #[serde(default)]
    pub slide_no: Option<u32>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub rewritten_text: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternRedaction {
    #[serde(default)]
    pub regex: String,
    #[serde(rename = "type", default)]
    pub pattern_type: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Where a request's actions came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples_provided: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunMeta {
    pub fn fallback(error: &Error) -> Self {
        Self {
            source: SOURCE_FALLBACK.to_string(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `instructions` against the sampled deck.
    async fn classify(
        &self,
        instructions: &str,
        index: &ParagraphIndex,
    ) -> Result<(ClassifierResponse, RunMeta)>;

    /// Short human title for the instruction, if the classifier offers one.
    async fn summarize(&self, _instructions: &str) -> Option<String> {
        None
    }
}

/// Classifier that always fails, forcing the heuristic fallback
#[derive(Debug, Clone, Default)]
pub struct DisabledClassifier;

#[async_trait]
impl Classifier for DisabledClassifier {
    async fn classify(
        &self,
        _instructions: &str,
        _index: &ParagraphIndex,
    ) -> Result<(ClassifierResponse, RunMeta)> {
        Err(Error::ClassificationFailure(
            "classifier disabled".to_string(),
        ))
    }
}

/// Convert classifier suggestions into actions.
///
/// Suggestions under `threshold` are dropped. Rewrites must resolve to exactly
/// one indexed paragraph; unresolved ones are logged and skipped. Action ids
/// are numbered by the count of actions produced so far.
pub fn convert_response(
    response: &ClassifierResponse,
    index: &ParagraphIndex,
    threshold: f64,
) -> Vec<Action> {
    let mut actions = Vec::new();

    for entity in &response.entity_redactions {
        if entity.confidence < threshold || entity.entity.trim().is_empty() {
            continue;
        }

        let metadata = metadata([
            ("confidence", json!(entity.confidence)),
            ("entity_type", json!(entity.entity_type)),
            ("evidence", json!(entity.evidence)),
            ("source", json!(SOURCE_ENTITY)),
            ("action_category", json!("entity_replacement")),
        ]);

        let mut action =
            Action::keyword(format!("entity-{}", actions.len()), [entity.entity.clone()])
                .with_metadata(metadata);
        action.replacement = entity.replacement.clone();
        actions.push(action);
    }

    for rewrite in &response.paragraph_rewrites {
        if rewrite.confidence < threshold {
            continue;
        }
        if let Some(action) = rewrite_action(rewrite, index, actions.len()) {
            actions.push(action);
        }
    }

    for pattern in &response.patterns {
        if pattern.confidence < threshold || pattern.regex.trim().is_empty() {
            continue;
        }

        let metadata = metadata([
            ("confidence", json!(pattern.confidence)),
            ("pattern_type", json!(pattern.pattern_type)),
            ("reason", json!(pattern.reason)),
            ("source", json!(SOURCE_PATTERN)),
            ("action_category", json!("pattern_match")),
        ]);

        let mut action = Action::regex(format!("pattern-{}", actions.len()), pattern.regex.clone())
            .with_metadata(metadata);
        action.replacement = pattern.replacement.clone();
        actions.push(action);
    }

    actions
}

fn rewrite_action(
    rewrite: &ParagraphRewrite,
    index: &ParagraphIndex,
    position: usize,
) -> Option<Action> {
    let target = match index.resolve(
        rewrite.paragraph_id.as_deref(),
        rewrite.original_text.as_deref(),
    ) {
        Ok(target) => target,
        Err(e) => {
            warn!("Unable to map paragraph rewrite: {}", e);
            return None;
        }
    };

    let Some(mut replacement) = rewrite
        .rewritten_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
    else {
        warn!(
            "Rewrite produced no text for paragraph {}",
            target.paragraph_id
        );
        return None;
    };

    if target.is_bullet && !replacement.starts_with(redact_core::BULLET_GLYPH) {
        replacement = format!("{} {}", redact_core::BULLET_GLYPH, replacement);
    }

    let metadata = metadata([
        ("confidence", json!(rewrite.confidence)),
        ("reason", json!(rewrite.reason)),
        ("source", json!(SOURCE_REWRITE)),
        ("action_category", json!("paragraph_rewrite")),
        ("paragraph_id", json!(target.paragraph_id)),
    ]);

    Some(
        Action::exact(format!("rewrite-{}", position), target.text.clone())
            .with_type(ActionType::Rewrite)
            .with_scope(Scope::slides([i64::from(target.slide_no)]))
            .with_replacement(replacement)
            .with_metadata(metadata),
    )
}

fn metadata<const N: usize>(entries: [(&str, Value); N]) -> Metadata {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
