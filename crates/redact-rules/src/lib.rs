//! Redaction rule evaluation
//!
//! - [`matcher`]: applies one action to one paragraph's text
//! - [`ordering`]: orders actions and folds them over a paragraph
//! - [`fallback`]: derives actions from raw instructions when no
//!   classifier is available

pub mod fallback;
pub mod matcher;
pub mod ordering;

pub use fallback::derive_actions;
pub use matcher::{CompiledRule, apply};
pub use ordering::{ActionPlan, ParagraphEdit, order_actions};
