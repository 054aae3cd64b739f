//! Rule action results - the edit records handed to persistence

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Metadata};

/// One paragraph edit produced by the rule engine.
///
/// Only emitted when `new_text` differs from `original_text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActionResult {
    pub slide_no: u32,
    pub element_key: String,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub original_text: String,
    pub new_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}
