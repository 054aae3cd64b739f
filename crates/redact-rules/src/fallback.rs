//! Heuristic action derivation
//!
//! Used only when the classifier is unavailable. Quoted phrases become
//! keywords; failing that, the comma/"and"-separated fragments following the
//! word "redact". Mentions of money-like words add an amount pattern.

use std::collections::HashSet;

use lazy_static::lazy_static;
use redact_core::{Action, REDACTION_MARKER};
use regex::Regex;

pub const KEYWORD_ACTION_ID: &str = "replace-keywords";
pub const AMOUNT_ACTION_ID: &str = "replace-numbers";
pub const AMOUNT_PATTERN: &str = r"\b\$?\d[\d,]*(?:\.\d+)?\b";
pub const AMOUNT_MARKER: &str = "[AMOUNT]";

const AMOUNT_TRIGGERS: [&str; 4] = ["revenue", "figure", "amount", "sales"];

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#""([^"\\]+)""#).unwrap();
    static ref REDACT_CLAUSE: Regex = Regex::new(r"redact ([^.]+)").unwrap();
    static ref FRAGMENT_SEPARATOR: Regex = Regex::new(r",|\band\b").unwrap();
}

/// Derive a minimal action set from free-text instructions. Never fails; no
/// usable signal yields an empty list.
pub fn derive_actions(instructions: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    if instructions.trim().is_empty() {
        return actions;
    }

    let lowered = instructions.to_lowercase();

    let mut keywords: Vec<String> = QUOTED
        .captures_iter(instructions)
        .map(|c| c[1].trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    if keywords.is_empty() {
        for clause in REDACT_CLAUSE.captures_iter(&lowered) {
            keywords.extend(
                FRAGMENT_SEPARATOR
                    .split(&clause[1])
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from),
            );
        }
    }

    let mut seen = HashSet::new();
    keywords.retain(|k| seen.insert(k.clone()));

    if !keywords.is_empty() {
        actions.push(
            Action::keyword(KEYWORD_ACTION_ID, keywords).with_replacement(REDACTION_MARKER),
        );
    }

    if AMOUNT_TRIGGERS.iter().any(|t| lowered.contains(t)) {
        actions.push(
            Action::regex(AMOUNT_ACTION_ID, AMOUNT_PATTERN).with_replacement(AMOUNT_MARKER),
        );
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::MatchRule;

    fn tokens(action: &Action) -> Vec<String> {
        match &action.rule {
            MatchRule::Keyword { tokens } => tokens.clone(),
            other => panic!("expected keyword rule, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_keywords() {
        let actions = derive_actions(r#"Hide "Acme Corp" and "Jane Doe", also "Acme Corp""#);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, KEYWORD_ACTION_ID);
        assert_eq!(tokens(&actions[0]), vec!["Acme Corp", "Jane Doe"]);
        assert_eq!(actions[0].replacement_text(), "[REDACTED]");
    }

    #[test]
    fn test_redact_clause_with_amount_trigger() {
        let actions = derive_actions("Please redact client names, revenue figures.");
        assert_eq!(actions.len(), 2);
        assert_eq!(tokens(&actions[0]), vec!["client names", "revenue figures"]);

        assert_eq!(actions[1].id, AMOUNT_ACTION_ID);
        assert_eq!(
            actions[1].rule,
            MatchRule::Regex {
                pattern: AMOUNT_PATTERN.to_string()
            }
        );
        assert_eq!(actions[1].replacement_text(), AMOUNT_MARKER);
    }

    #[test]
    fn test_and_separator_respects_word_boundaries() {
        let actions = derive_actions("Redact brand names and addresses");
        assert_eq!(tokens(&actions[0]), vec!["brand names", "addresses"]);
    }

    #[test]
    fn test_quotes_take_precedence_over_clause() {
        let actions = derive_actions(r#"redact "Globex" everywhere"#);
        assert_eq!(tokens(&actions[0]), vec!["Globex"]);
    }

    #[test]
    fn test_no_signal_yields_nothing() {
        assert!(derive_actions("").is_empty());
        assert!(derive_actions("   ").is_empty());
        assert!(derive_actions("Make the deck look nicer").is_empty());
    }

    #[test]
    fn test_amount_only() {
        let actions = derive_actions("hide all sales numbers");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, AMOUNT_ACTION_ID);
    }
}
