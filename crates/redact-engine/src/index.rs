//! Paragraph reference index
//!
//! Samples a bounded subset of the deck for the classifier and gives every
//! sampled textbox paragraph a request-unique id (`S{slide}-P{n}`), so that
//! rewrite suggestions can point back at a single paragraph.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::index::sample as sample_indices;
use redact_config::SamplingConfig;
use redact_core::{Deck, Element, Error, Result, Slide};
use serde::{Deserialize, Serialize};

/// Location and text snapshot of one indexed paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphReference {
    pub paragraph_id: String,
    pub slide_no: u32,
    pub element_key: String,
    pub paragraph_index: usize,
    /// Trimmed paragraph text at indexing time
    pub text: String,
    pub is_bullet: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphSample {
    pub id: String,
    pub text: String,
    pub is_bullet: bool,
}

/// What the classifier sees of one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSample {
    pub slide_no: u32,
    /// Slide text (textbox and table paragraphs), cut to the character budget
    pub text: String,
    pub paragraphs: Vec<ParagraphSample>,
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphIndex {
    samples: Vec<SlideSample>,
    references: Vec<ParagraphReference>,
    by_id: HashMap<String, usize>,
}

impl ParagraphIndex {
    /// Sample `deck` according to `policy`, drawing middle slides from `rng`.
    pub fn build<R: Rng + ?Sized>(deck: &Deck, policy: &SamplingConfig, rng: &mut R) -> Self {
        let mut index = Self::default();

        for position in sample_slide_positions(deck.slide_count(), policy, rng) {
            let slide = &deck.slides[position];
            let slide_no = slide.slide_no().unwrap_or(position as u32 + 1);
            let budget = policy.max_chars_per_slide;
            if let Some(sample) = index.summarize_slide(slide, slide_no, budget) {
                index.samples.push(sample);
            }
        }

        index
    }

    fn summarize_slide(
        &mut self,
        slide: &Slide,
        slide_no: u32,
        budget: usize,
    ) -> Option<SlideSample> {
        let mut lines: Vec<&str> = Vec::new();
        let mut paragraphs = Vec::new();
        let mut used = 0usize;

        for element in &slide.elements {
            match element {
                Element::Textbox(textbox) => {
                    for (paragraph_index, paragraph) in textbox.paragraphs.iter().enumerate() {
                        let cleaned = paragraph.text.trim();
                        if cleaned.is_empty() || used >= budget {
                            continue;
                        }

                        let paragraph_id = format!("S{}-P{}", slide_no, self.references.len() + 1);
                        let is_bullet = paragraph.is_bullet();

                        self.by_id.insert(paragraph_id.clone(), self.references.len());
                        self.references.push(ParagraphReference {
                            paragraph_id: paragraph_id.clone(),
                            slide_no,
                            element_key: textbox.key.clone(),
                            paragraph_index,
                            text: cleaned.to_string(),
                            is_bullet,
                        });
                        paragraphs.push(ParagraphSample {
                            id: paragraph_id,
                            text: cleaned.to_string(),
                            is_bullet,
                        });

                        lines.push(cleaned);
                        used += cleaned.chars().count() + 1;
                    }
                }
                Element::Table(table) => {
                    for paragraph in table.paragraphs() {
                        let cleaned = paragraph.text.trim();
                        if !cleaned.is_empty() {
                            lines.push(cleaned);
                            used += cleaned.chars().count() + 1;
                        }
                    }
                }
                Element::Picture(_) | Element::Other => {}
            }
        }

        let combined = lines.join("\n");
        if combined.is_empty() {
            return None;
        }

        Some(SlideSample {
            slide_no,
            text: combined.chars().take(budget).collect(),
            paragraphs,
        })
    }

    pub fn samples(&self) -> &[SlideSample] {
        &self.samples
    }

    /// Indexed paragraphs in id order
    pub fn references(&self) -> &[ParagraphReference] {
        &self.references
    }

    pub fn get(&self, paragraph_id: &str) -> Option<&ParagraphReference> {
        self.by_id.get(paragraph_id).map(|&i| &self.references[i])
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Resolve a rewrite target by id, or else by its exact (trimmed) text.
    ///
    /// Text resolution only succeeds when exactly one indexed paragraph has
    /// that text.
    pub fn resolve(
        &self,
        paragraph_id: Option<&str>,
        original_text: Option<&str>,
    ) -> Result<&ParagraphReference> {
        if let Some(found) = paragraph_id.and_then(|id| self.get(id)) {
            return Ok(found);
        }

        let Some(text) = original_text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Err(Error::UnresolvedParagraph(
                paragraph_id.unwrap_or("<missing paragraph_id and original_text>").to_string(),
            ));
        };

        let matches: Vec<&ParagraphReference> =
            self.references.iter().filter(|r| r.text == text).collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            _ => Err(Error::AmbiguousParagraphMapping {
                reference: paragraph_id
                    .map(String::from)
                    .unwrap_or_else(|| text.chars().take(80).collect()),
                matches: matches.len(),
            }),
        }
    }

    /// Render samples in the classifier line format:
    ///
    /// ```text
    /// Slide 3:
    /// [S3-P7] Revenue grew 12% year over year
    /// ```
    pub fn format_for_classifier(&self) -> String {
        let mut blocks = Vec::with_capacity(self.samples.len());

        for sample in &self.samples {
            if !sample.paragraphs.is_empty() {
                let lines: Vec<String> = sample
                    .paragraphs
                    .iter()
                    .map(|p| format!("[{}] {}", p.id, p.text))
                    .collect();
                blocks.push(format!("Slide {}:\n{}", sample.slide_no, lines.join("\n")));
            } else if !sample.text.is_empty() {
                blocks.push(format!("Slide {}: {}", sample.slide_no, sample.text));
            }
        }

        blocks.join("\n\n")
    }
}

/// Zero-based positions of the slides to sample, in deck order.
///
/// Small decks are sampled whole. Larger decks contribute their head slides,
/// a random share of the middle, and the last slide.
pub fn sample_slide_positions<R: Rng + ?Sized>(
    total: usize,
    policy: &SamplingConfig,
    rng: &mut R,
) -> Vec<usize> {
    if total <= policy.full_deck_max_slides {
        return (0..total).collect();
    }

    let head = policy.head_slides.min(total);
    let mut positions: Vec<usize> = (0..head).collect();

    let last = total - 1;
    let middle_len = last.saturating_sub(head);
    if middle_len > 0 {
        let wanted = ((middle_len as f64 * policy.middle_ratio).floor() as usize).max(1);
        let mut middle = sample_indices(rng, middle_len, wanted.min(middle_len)).into_vec();
        middle.sort_unstable();
        positions.extend(middle.into_iter().map(|i| i + head));
    }

    if last >= head {
        positions.push(last);
    }

    positions
}
