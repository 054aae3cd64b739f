//! Redaction action model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{Error, Result, Scope};

/// Canonical placeholder used when an action carries no usable replacement
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Free-form metadata carried from an action to the results it produces
pub type Metadata = serde_json::Map<String, Value>;

/// A single candidate edit instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub scope: Scope,
    #[serde(rename = "match")]
    pub rule: MatchRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Replace,
    Rewrite,
}

/// How an action's target is compared against paragraph text.
///
/// Exactly one mode per action; unknown modes fail to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchRule {
    #[serde(alias = "Keyword", alias = "KEYWORD")]
    Keyword {
        #[serde(default, deserialize_with = "string_entries")]
        tokens: Vec<String>,
    },
    #[serde(alias = "Regex", alias = "REGEX")]
    Regex {
        #[serde(default)]
        pattern: String,
    },
    #[serde(alias = "Exact", alias = "EXACT")]
    Exact {
        #[serde(default)]
        text: String,
    },
}

impl MatchRule {
    /// Application order: exact before regex before keyword
    pub fn priority(&self) -> u8 {
        match self {
            MatchRule::Exact { .. } => 0,
            MatchRule::Regex { .. } => 1,
            MatchRule::Keyword { .. } => 2,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            MatchRule::Exact { .. } => "exact",
            MatchRule::Regex { .. } => "regex",
            MatchRule::Keyword { .. } => "keyword",
        }
    }
}

impl Action {
    pub fn new(id: impl Into<String>, rule: MatchRule) -> Self {
        Self {
            id: id.into(),
            action_type: ActionType::Replace,
            scope: Scope::all(),
            rule,
            replacement: None,
            metadata: None,
        }
    }

    pub fn keyword<I, S>(id: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            MatchRule::Keyword {
                tokens: tokens.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn regex(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(
            id,
            MatchRule::Regex {
                pattern: pattern.into(),
            },
        )
    }

    pub fn exact(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, MatchRule::Exact { text: text.into() })
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_type(mut self, action_type: ActionType) -> Self {
        self.action_type = action_type;
        self
    }

    /// Replacement text, falling back to [`REDACTION_MARKER`] when blank
    pub fn replacement_text(&self) -> &str {
        match self.replacement.as_deref() {
            Some(r) if !r.trim().is_empty() => r,
            _ => REDACTION_MARKER,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self.rule, MatchRule::Exact { .. })
    }
}

/// Parse a JSON list of actions, dropping (and logging) entries that do not
/// describe a valid action. Accepts either a bare array or `{"actions": [...]}`.
pub fn parse_actions(value: &Value) -> Result<Vec<Action>> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("actions") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(Error::InvalidAction(
                    "expected an array of actions or an object with an `actions` array"
                        .to_string(),
                ));
            }
        },
        _ => {
            return Err(Error::InvalidAction(
                "expected an array of actions".to_string(),
            ));
        }
    };

    let mut actions = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<Action>(entry.clone()) {
            Ok(action) => actions.push(action),
            Err(e) => warn!("Skipping invalid action at position {}: {}", position, e),
        }
    }

    Ok(actions)
}

fn string_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}
