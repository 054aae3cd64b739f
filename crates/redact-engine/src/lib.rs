//! Redaction pipeline
//!
//! Turns a natural-language instruction and a deck into rule action rows:
//! sample the deck, ask the classifier for actions (or derive them
//! heuristically when it fails), then walk the deck applying them.

pub mod classifier;
pub mod http;
pub mod index;
pub mod prompt;
pub mod walker;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use redact_config::Config;
use redact_core::{Action, Deck, Error, Result, RuleActionResult};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, info, warn};

pub use classifier::{
    Classifier, ClassifierResponse, DisabledClassifier, RunMeta, convert_response,
};
pub use http::HttpClassifier;
pub use index::{ParagraphIndex, ParagraphReference, SlideSample};
pub use walker::generate_rule_actions;

/// Longest rule title kept, from either source
pub(crate) const MAX_TITLE_CHARS: usize = 120;
const UNTITLED_RULE: &str = "Untitled rule";

/// One result row, tagged with the rule and deck it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActionRow {
    pub rule_id: String,
    pub deck_id: String,
    #[serde(flatten)]
    pub result: RuleActionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionOutcome {
    pub deck_id: String,
    pub rule_id: String,
    pub title: String,
    pub action_count: usize,
    pub rows: Vec<RuleActionRow>,
    pub meta: RunMeta,
    /// blake3 digest of the serialized results, independent of rule id
    pub results_hash: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

pub struct RedactionPipeline {
    classifier: Arc<dyn Classifier>,
    config: Config,
}

impl RedactionPipeline {
    pub fn new(classifier: Arc<dyn Classifier>, config: Config) -> Self {
        Self { classifier, config }
    }

    /// Build a pipeline with the HTTP classifier, or the disabled one when
    /// offline, disabled in config, or missing credentials.
    pub fn from_config(config: Config, offline: bool) -> Self {
        let classifier: Arc<dyn Classifier> = if offline || !config.classifier.enabled {
            Arc::new(DisabledClassifier)
        } else {
            match HttpClassifier::from_config(&config.classifier) {
                Ok(classifier) => Arc::new(classifier),
                Err(e) => {
                    warn!("Classifier unavailable, using heuristics: {}", e);
                    Arc::new(DisabledClassifier)
                }
            }
        };

        Self::new(classifier, config)
    }

    /// Sample the deck, seeded from config when a seed is set.
    pub fn build_index(&self, deck: &Deck) -> ParagraphIndex {
        let mut rng = match self.config.sampling.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ParagraphIndex::build(deck, &self.config.sampling, &mut rng)
    }

    /// Classifier actions for `instructions`, or heuristic ones if classification fails.
    pub async fn derive(
        &self,
        instructions: &str,
        index: &ParagraphIndex,
    ) -> (Vec<Action>, RunMeta) {
        match self.classifier.classify(instructions, index).await {
            Ok((response, meta)) => {
                let threshold = self.config.engine.confidence_threshold;
                let actions = convert_response(&response, index, threshold);
                info!("Classifier produced {} actions", actions.len());
                (actions, meta)
            }
            Err(e) => {
                error!("Classification failed, deriving actions from instructions: {}", e);
                let actions = redact_rules::derive_actions(instructions);
                (actions, RunMeta::fallback(&e))
            }
        }
    }

    pub async fn process(
        &self,
        deck_id: &str,
        instructions: &str,
        deck: &Deck,
    ) -> Result<RedactionOutcome> {
        if instructions.trim().is_empty() {
            return Err(Error::InvalidAction("instructions are empty".to_string()));
        }

        // 1. Sample and index
        let index = self.build_index(deck);
        info!(
            "Sampled {} slides, indexed {} paragraphs",
            index.samples().len(),
            index.len()
        );

        // 2. Derive actions
        let (actions, meta) = self.derive(instructions, &index).await;

        // 3. Walk the deck
        let results = generate_rule_actions(deck, &actions);
        info!("Generated {} rule actions", results.len());
        let results_hash = blake3::hash(serde_json::to_string(&results)?.as_bytes())
            .to_hex()
            .to_string();

        // 4. Title and rows
        let summary = self.classifier.summarize(instructions).await;
        let title = rule_title(summary.as_deref(), instructions);
        let rule_id = uuid::Uuid::new_v4().to_string();

        let rows: Vec<RuleActionRow> = results
            .into_iter()
            .map(|result| RuleActionRow {
                rule_id: rule_id.clone(),
                deck_id: deck_id.to_string(),
                result,
            })
            .collect();

        Ok(RedactionOutcome {
            deck_id: deck_id.to_string(),
            rule_id,
            title,
            action_count: rows.len(),
            rows,
            meta,
            results_hash,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Rule title from a classifier summary, else from the instruction itself.
pub fn rule_title(summary: Option<&str>, instructions: &str) -> String {
    if let Some(summary) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        return summary.chars().take(MAX_TITLE_CHARS).collect();
    }

    let instructions = instructions.trim();
    if instructions.is_empty() {
        return UNTITLED_RULE.to_string();
    }

    if instructions.chars().count() > MAX_TITLE_CHARS {
        let head: String = instructions.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        instructions.to_string()
    }
}
