//! Sample command - show what the classifier would see

use std::path::Path;

use anyhow::Result;
use redact_config::Config;
use redact_engine::RedactionPipeline;

use super::read_deck;

pub fn handle(deck: &Path, seed: Option<u64>, mut config: Config) -> Result<()> {
    let deck = read_deck(deck)?;
    if seed.is_some() {
        config.sampling.seed = seed;
    }

    let index = RedactionPipeline::from_config(config, true).build_index(&deck);
    println!("{}", index.format_for_classifier());
    eprintln!(
        "({} slides sampled, {} paragraphs indexed)",
        index.samples().len(),
        index.len()
    );
    Ok(())
}
