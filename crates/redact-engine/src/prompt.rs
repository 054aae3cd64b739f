//! Classification prompts

use crate::index::ParagraphIndex;

pub const SYSTEM_PROMPT: &str = r#"You find sensitive information in presentation decks.

You receive a redaction instruction and sampled deck content. Each sampled
paragraph is labeled with an id such as [S3-P4].

Return JSON only, with every key present (use empty arrays when nothing applies):

{
  "entity_redactions": [
    {"entity": "exact text to replace", "type": "client_name", "confidence": 0.0,
     "replacement": "[CLIENT]", "evidence": "where and why it was identified"}
  ],
  "paragraph_rewrites": [
    {"paragraph_id": "S3-P4", "slide_no": 3, "original_text": "full paragraph",
     "rewritten_text": "generalized paragraph", "reason": "why a rewrite is needed",
     "confidence": 0.0}
  ],
  "patterns": [
    {"regex": "\\$\\d+(?:,\\d{3})*", "type": "financial_figure", "confidence": 0.0,
     "replacement": "[AMOUNT]", "reason": "what the pattern covers"}
  ]
}

Prefer entity redactions for names, numbers and identifiers. Rewrite a paragraph
only when its sensitive details are intertwined, keeping its tone and structure.
Only report findings with confidence above 0.85."#;

pub const TITLE_PROMPT: &str = "Summarize this redaction instruction in 3 to 6 words. \
Return only the summary text with no trailing punctuation.";

/// Build the user message for one classification request.
pub fn build_user_prompt(instructions: &str, index: &ParagraphIndex) -> String {
    let instructions = match instructions.trim() {
        "" => "(none provided)",
        trimmed => trimmed,
    };
    let samples = index.format_for_classifier();

    [
        "# Instruction",
        instructions,
        "",
        "# Deck Content Samples",
        samples.as_str(),
        "",
        "# Task",
        "Use the paragraph ids (for example [S3-P4]) when recommending rewrites.",
        "Identify:",
        "1. Entities (names, numbers) that need simple replacement",
        "2. Paragraphs that need a full rewrite because sensitive details are intertwined",
        "3. Patterns (such as financial figures) that apply across the deck",
        "",
        "Return structured JSON as described in the system message.",
    ]
    .join("\n")
}

pub fn build_title_prompt(instructions: &str) -> String {
    format!("{}\n\nInstruction: {}", TITLE_PROMPT, instructions.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use redact_config::SamplingConfig;
    use redact_core::{Deck, Element, Paragraph, Slide, TextBox};

    #[test]
    fn test_user_prompt_sections() {
        let deck = Deck {
            slides: vec![Slide {
                index: Some(0),
                elements: vec![Element::Textbox(TextBox {
                    key: "tb".to_string(),
                    bbox: None,
                    paragraphs: vec![Paragraph::new("Revenue from Acme Corp")],
                })],
            }],
        };
        let index =
            ParagraphIndex::build(&deck, &SamplingConfig::default(), &mut StdRng::seed_from_u64(0));

        let prompt = build_user_prompt("  Redact client names ", &index);
        assert!(prompt.starts_with("# Instruction\nRedact client names\n"));
        assert!(
            prompt.contains("# Deck Content Samples\nSlide 1:\n[S1-P1] Revenue from Acme Corp")
        );
        assert!(prompt.contains("# Task"));
    }

    #[test]
    fn test_blank_instruction_placeholder() {
        let prompt = build_user_prompt("   ", &ParagraphIndex::default());
        assert!(prompt.starts_with("# Instruction\n(none provided)\n"));
    }
}
