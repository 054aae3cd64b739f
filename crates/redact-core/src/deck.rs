//! Deck domain model
//!
//! Mirrors the JSON produced by the upstream slide extractor. Malformed parts
//! degrade instead of failing the deck: `null` or mistyped fields read as
//! their empty default, unparseable list entries are dropped, and a slide
//! whose index is not a usable integer has no slide number.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::scope::coerce_int;

/// Leading glyph that marks a bullet paragraph
pub const BULLET_GLYPH: char = '•';

/// Element placement as emitted by the extractor, passed through untouched
pub type BoundingBox = Value;

/// A presentation deck (slides → elements → paragraphs)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn from_json(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Zero-based position reported by the extractor
    #[serde(default, deserialize_with = "slide_index")]
    pub index: Option<u32>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub elements: Vec<Element>,
}

impl Slide {
    /// One-based slide number, if the slide carries a usable index
    pub fn slide_no(&self) -> Option<u32> {
        self.index.and_then(|i| i.checked_add(1))
    }

    pub fn textboxes(&self) -> impl Iterator<Item = &TextBox> {
        self.elements.iter().filter_map(|element| match element {
            Element::Textbox(textbox) => Some(textbox),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Textbox(TextBox),
    Table(Table),
    Picture(Picture),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBox {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, deserialize_with = "lenient")]
    pub cells: Vec<Vec<Option<TableCell>>>,
}

impl Table {
    /// Non-empty cell paragraphs in row-major order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .flat_map(|cell| cell.paragraphs.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Non-string text reads as empty, so the paragraph is never edited
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_bullet(&self) -> bool {
        self.text.trim_start().starts_with(BULLET_GLYPH)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match T::deserialize(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Dropping malformed deck entry: {}", e);
                None
            }
        })
        .collect())
}

fn slide_index<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_int(&value).and_then(|i| u32::try_from(i).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deck() {
        let json = r#"{
            "slides": [
                {
                    "index": 0,
                    "elements": [
                        {
                            "type": "textbox",
                            "key": "tb-1",
                            "bbox": {"x": 1.0, "y": 2.0, "w": 3.0, "h": 4.0},
                            "paragraphs": [{"text": "Hello"}, {"text": null}]
                        },
                        {
                            "type": "table",
                            "cells": [[{"paragraphs": [{"text": "cell"}]}, null]]
                        },
                        {"type": "picture", "key": "pic-1"},
                        {"type": "chart", "key": "chart-1"}
                    ]
                }
            ]
        }"#;

        let deck = Deck::from_json(json).unwrap();
        assert_eq!(deck.slide_count(), 1);

        let slide = &deck.slides[0];
        assert_eq!(slide.slide_no(), Some(1));
        assert_eq!(slide.elements.len(), 4);
        assert!(matches!(slide.elements[3], Element::Other));

        let textbox = slide.textboxes().next().unwrap();
        assert_eq!(textbox.key, "tb-1");
        assert_eq!(textbox.paragraphs[1].text, "");
        assert_eq!(textbox.bbox.as_ref().unwrap()["h"], 4.0);

        match &slide.elements[1] {
            Element::Table(table) => {
                let texts: Vec<_> = table.paragraphs().map(|p| p.text.as_str()).collect();
                assert_eq!(texts, vec!["cell"]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_bullet_detection() {
        assert!(Paragraph::new("• Revenue up").is_bullet());
        assert!(Paragraph::new("   • Indented").is_bullet());
        assert!(!Paragraph::new("Revenue • up").is_bullet());
    }

    #[test]
    fn test_bbox_is_kept_as_emitted() {
        let json = r#"{"slides": [{"index": 0, "elements": [
            {"type": "textbox", "key": "a", "bbox": {"x": null, "y": 2, "w": 3, "h": 4}},
            {"type": "textbox", "key": "b", "bbox": {"left": 10, "top": 20, "width": 30, "height": 40}}
        ]}]}"#;

        let deck = Deck::from_json(json).unwrap();
        let boxes: Vec<_> = deck.slides[0].textboxes().map(|t| t.bbox.clone()).collect();
        assert_eq!(boxes[0], Some(serde_json::json!({"x": null, "y": 2, "w": 3, "h": 4})));
        assert_eq!(
            boxes[1],
            Some(serde_json::json!({"left": 10, "top": 20, "width": 30, "height": 40}))
        );
    }

    #[test]
    fn test_unusable_index_keeps_rest_of_deck() {
        let json = r#"{"slides": [
            {"index": "x", "elements": []},
            {"index": -1, "elements": []},
            {"index": 1.0, "elements": []},
            {"index": " 2 ", "elements": []},
            "not a slide",
            {"index": 3}
        ]}"#;

        let deck = Deck::from_json(json).unwrap();
        let numbers: Vec<_> = deck.slides.iter().map(Slide::slide_no).collect();
        assert_eq!(numbers, vec![None, None, Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_mistyped_fields_read_as_empty() {
        let json = r#"{"slides": [{"index": 0, "elements": [
            {"type": "textbox", "key": 17, "paragraphs": [{"text": 5}, {"text": "kept"}, 3]},
            {"type": "table", "cells": "broken"},
            "junk"
        ]}]}"#;

        let deck = Deck::from_json(json).unwrap();
        let slide = &deck.slides[0];
        assert_eq!(slide.elements.len(), 2);

        let textbox = slide.textboxes().next().unwrap();
        assert_eq!(textbox.key, "");
        let texts: Vec<_> = textbox.paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["", "kept"]);

        match &slide.elements[1] {
            Element::Table(table) => assert_eq!(table.paragraphs().count(), 0),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_index() {
        let deck = Deck::from_json(r#"{"slides": [{"elements": null}]}"#).unwrap();
        assert_eq!(deck.slides[0].slide_no(), None);
        assert!(deck.slides[0].elements.is_empty());
    }
}
