//! Core domain models for deck redaction
//!
//! This crate contains:
//! - Deck model (Deck, Slide, Element, Paragraph)
//! - Redaction actions and their match modes
//! - Slide scope resolution
//! - Rule action results handed to persistence

pub mod action;
pub mod deck;
pub mod error;
pub mod result;
pub mod scope;

pub use action::{Action, ActionType, MatchRule, Metadata, REDACTION_MARKER, parse_actions};
pub use deck::{
    BULLET_GLYPH, BoundingBox, Deck, Element, Paragraph, Picture, Slide, Table, TableCell, TextBox,
};
pub use error::{Error, Result};
pub use result::RuleActionResult;
pub use scope::{Scope, SlideSelector};
