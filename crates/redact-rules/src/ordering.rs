//! Action ordering and precedence
//!
//! Actions are stably sorted exact → regex → keyword, then folded over each
//! paragraph. An exact match ends the fold for that paragraph; regex and
//! keyword edits compound on the text produced so far.

use redact_core::{Action, Metadata};
use tracing::debug;

use crate::matcher::CompiledRule;

/// Stable sort by match priority; ties keep input order.
pub fn order_actions(actions: &[Action]) -> Vec<Action> {
    let mut ordered = actions.to_vec();
    ordered.sort_by_key(|action| action.rule.priority());
    ordered
}

/// Outcome of folding an [`ActionPlan`] over one paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphEdit {
    pub text: String,
    pub changed: bool,
    /// Metadata of the last action that changed the text
    pub metadata: Option<Metadata>,
}

struct PlanStep {
    action: Action,
    rule: CompiledRule,
}

/// Ordered, pre-compiled action list for one redaction request
pub struct ActionPlan {
    steps: Vec<PlanStep>,
}

impl ActionPlan {
    pub fn new(actions: &[Action]) -> Self {
        let steps = order_actions(actions)
            .into_iter()
            .map(|action| {
                debug!("Planned action {} ({})", action.id, action.rule.mode_name());
                PlanStep {
                    rule: CompiledRule::compile(&action.rule),
                    action,
                }
            })
            .collect();

        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Actions in application order
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.steps.iter().map(|step| &step.action)
    }

    /// Fold every in-scope action over `text` on slide `slide_no`.
    pub fn apply(&self, text: &str, slide_no: u32) -> ParagraphEdit {
        let mut edit = ParagraphEdit {
            text: text.to_string(),
            changed: false,
            metadata: None,
        };

        for step in &self.steps {
            if !step.action.scope.applies(slide_no) {
                continue;
            }

            let (updated, changed) = step.rule.apply(&edit.text, step.action.replacement_text());
            if !changed {
                continue;
            }

            edit.text = updated;
            edit.changed = true;
            edit.metadata = step.action.metadata.clone();

            if step.action.is_exact() {
                break;
            }
        }

        edit
    }
}
