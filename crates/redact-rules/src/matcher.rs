//! Match engine: one action against one paragraph

use redact_core::{Action, Error, MatchRule};
use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

/// An action's match rule, compiled once and reusable across paragraphs.
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// Trimmed target text; an empty target never matches.
    Exact(String),
    /// `None` when the pattern was blank or failed to compile.
    Regex(Option<Regex>),
    /// One escaped, case-insensitive pattern per non-empty token.
    Keyword(Vec<Regex>),
}

impl CompiledRule {
    pub fn compile(rule: &MatchRule) -> Self {
        match rule {
            MatchRule::Exact { text } => CompiledRule::Exact(text.trim().to_string()),
            MatchRule::Regex { pattern } => CompiledRule::Regex(compile_pattern(pattern)),
            MatchRule::Keyword { tokens } => CompiledRule::Keyword(
                tokens
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .filter_map(|t| compile_pattern(&regex::escape(t)))
                    .collect(),
            ),
        }
    }

    /// Apply to `text`, returning the updated text and whether the rule fired.
    ///
    /// Replacements are inserted literally; `$1` in a replacement is not a
    /// capture reference.
    pub fn apply(&self, text: &str, replacement: &str) -> (String, bool) {
        match self {
            CompiledRule::Exact(target) => {
                if !target.is_empty() && text.trim() == target {
                    (replacement.to_string(), true)
                } else {
                    (text.to_string(), false)
                }
            }
            CompiledRule::Regex(Some(re)) => {
                let updated = re.replace_all(text, NoExpand(replacement)).into_owned();
                let changed = updated != text;
                (updated, changed)
            }
            CompiledRule::Regex(None) => (text.to_string(), false),
            CompiledRule::Keyword(patterns) => {
                let mut updated = text.to_string();
                let mut changed = false;
                for re in patterns {
                    if re.is_match(&updated) {
                        updated = re.replace_all(&updated, NoExpand(replacement)).into_owned();
                        changed = true;
                    }
                }
                (updated, changed)
            }
        }
    }
}

/// Evaluate `action` against `text` under its match mode.
pub fn apply(text: &str, action: &Action) -> (String, bool) {
    CompiledRule::compile(&action.rule).apply(text, action.replacement_text())
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    if pattern.trim().is_empty() {
        return None;
    }

    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            let err = Error::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            };
            warn!("{}", err);
            None
        }
    }
}
