//! Document tree walker
//!
//! Visits every slide, textbox and paragraph in document order and emits one
//! result per paragraph whose text the ordered actions actually changed.

use redact_core::{Action, Deck, RuleActionResult};
use redact_rules::ActionPlan;
use tracing::debug;

/// Turn `actions` into concrete paragraph edits over the whole deck.
pub fn generate_rule_actions(deck: &Deck, actions: &[Action]) -> Vec<RuleActionResult> {
    if actions.is_empty() {
        return Vec::new();
    }

    walk(deck, &ActionPlan::new(actions))
}

/// Apply a prepared plan to every textbox paragraph of `deck`.
pub fn walk(deck: &Deck, plan: &ActionPlan) -> Vec<RuleActionResult> {
    let mut results = Vec::new();

    for slide in &deck.slides {
        let Some(slide_no) = slide.slide_no() else {
            debug!("Skipping slide without index");
            continue;
        };

        for textbox in slide.textboxes() {
            if textbox.key.is_empty() {
                debug!("Skipping textbox without key on slide {}", slide_no);
                continue;
            }

            for paragraph in &textbox.paragraphs {
                if paragraph.text.is_empty() {
                    continue;
                }

                let edit = plan.apply(&paragraph.text, slide_no);
                if !edit.changed || edit.text == paragraph.text {
                    continue;
                }

                results.push(RuleActionResult {
                    slide_no,
                    element_key: textbox.key.clone(),
                    bbox: textbox.bbox.clone(),
                    original_text: paragraph.text.clone(),
                    new_text: edit.text,
                    metadata: edit.metadata.filter(|m| !m.is_empty()),
                });
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::{Element, Metadata, Paragraph, Picture, Scope, Slide, TextBox};
    use serde_json::json;

    fn textbox(key: &str, texts: &[&str]) -> Element {
        Element::Textbox(TextBox {
            key: key.to_string(),
            bbox: Some(json!({"x": 0.0, "y": 0.0, "w": 10.0, "h": 2.0})),
            paragraphs: texts.iter().map(|t| Paragraph::new(*t)).collect(),
        })
    }

    fn deck(slides: Vec<Vec<Element>>) -> Deck {
        Deck {
            slides: slides
                .into_iter()
                .enumerate()
                .map(|(i, elements)| Slide {
                    index: Some(i as u32),
                    elements,
                })
                .collect(),
        }
    }

    #[test]
    fn test_only_changed_paragraphs_are_emitted() {
        let deck = deck(vec![vec![textbox(
            "body",
            &["Revenue from Acme Corp", "Nothing to see", ""],
        )]]);
        let actions = vec![Action::keyword("k", ["Acme Corp"]).with_replacement("[CLIENT]")];

        let results = generate_rule_actions(&deck, &actions);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slide_no, 1);
        assert_eq!(results[0].element_key, "body");
        assert_eq!(results[0].original_text, "Revenue from Acme Corp");
        assert_eq!(results[0].new_text, "Revenue from [CLIENT]");
        assert_eq!(results[0].bbox.as_ref().unwrap()["w"], 10.0);
        assert!(results[0].metadata.is_none());
    }

    #[test]
    fn test_non_textbox_elements_are_not_edited() {
        let picture = Element::Picture(Picture {
            key: "pic".to_string(),
            bbox: None,
        });
        let deck = deck(vec![vec![picture, Element::Other, textbox("tb", &["secret"])]]);

        let results = generate_rule_actions(&deck, &[Action::keyword("k", ["secret"])]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].element_key, "tb");
    }

    #[test]
    fn test_skips_unindexed_slides_and_keyless_textboxes() {
        let mut deck = deck(vec![
            vec![textbox("", &["secret"])],
            vec![textbox("tb", &["secret"])],
        ]);
        deck.slides[1].index = None;

        assert!(generate_rule_actions(&deck, &[Action::keyword("k", ["secret"])]).is_empty());
    }

    #[test]
    fn test_exact_result_carries_its_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("llm_paragraph_rewrite"));

        let deck = deck(vec![vec![textbox("tb", &["Acme leads the market"])]]);
        let actions = vec![
            Action::keyword("k", ["Acme"]),
            Action::exact("e", "Acme leads the market")
                .with_replacement("Client is a leader")
                .with_metadata(metadata.clone()),
        ];

        let results = generate_rule_actions(&deck, &actions);
        assert_eq!(results[0].new_text, "Client is a leader");
        assert_eq!(results[0].metadata, Some(metadata));
    }

    #[test]
    fn test_empty_metadata_is_dropped() {
        let deck = deck(vec![vec![textbox("tb", &["secret"])]]);
        let actions = vec![Action::keyword("k", ["secret"]).with_metadata(Metadata::new())];

        let results = generate_rule_actions(&deck, &actions);
        assert!(results[0].metadata.is_none());
    }

    #[test]
    fn test_exact_match_with_identical_replacement_emits_nothing() {
        let deck = deck(vec![vec![textbox("tb", &["Keep me"])]]);
        let actions = vec![
            Action::exact("e", "Keep me").with_replacement("Keep me"),
            Action::keyword("k", ["Keep"]),
        ];

        // The exact match stops evaluation, and its text equals the original.
        assert!(generate_rule_actions(&deck, &actions).is_empty());
    }

    #[test]
    fn test_scope_boundary() {
        let deck = deck(vec![
            vec![textbox("a", &["Confidential"])],
            vec![textbox("b", &["Confidential"])],
            vec![textbox("c", &["Confidential"])],
        ]);
        let actions = vec![Action::keyword("k", ["Confidential"]).with_scope(Scope::slides([2]))];

        let results = generate_rule_actions(&deck, &actions);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slide_no, 2);
    }

    #[test]
    fn test_no_actions_no_results() {
        let deck = deck(vec![vec![textbox("tb", &["anything"])]]);
        assert!(generate_rule_actions(&deck, &[]).is_empty());
    }

    #[test]
    fn test_malformed_slide_does_not_block_others() {
        let deck = Deck::from_json(
            &json!({"slides": [
                {"index": "x", "elements": [
                    {"type": "textbox", "key": "tb-0", "paragraphs": [{"text": "Acme"}]}
                ]},
                {"index": 1, "elements": [
                    {"type": "textbox", "key": 7, "paragraphs": [{"text": "Acme"}]},
                    {"type": "textbox", "key": "tb-1", "paragraphs": [{"text": 3}, {"text": "Acme"}]}
                ]}
            ]})
            .to_string(),
        )
        .unwrap();

        let results = generate_rule_actions(&deck, &[Action::keyword("k", ["Acme"])]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slide_no, 2);
        assert_eq!(results[0].element_key, "tb-1");
        assert_eq!(results[0].new_text, "[REDACTED]");
    }

    #[test]
    fn test_bbox_is_passed_through_unchanged() {
        let bbox = json!({"left": 10, "top": 20, "width": 30, "height": 40, "unit": "emu"});
        let deck = Deck::from_json(
            &json!({"slides": [{"index": 0, "elements": [
                {"type": "textbox", "key": "tb", "bbox": bbox, "paragraphs": [{"text": "Acme"}]}
            ]}]})
            .to_string(),
        )
        .unwrap();

        let results = generate_rule_actions(&deck, &[Action::keyword("k", ["Acme"])]);
        assert_eq!(results[0].bbox, Some(bbox.clone()));

        let row = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(row["bbox"], bbox);
    }
}
