//! Run command - full redaction pipeline

use std::path::Path;

use anyhow::Result;
use redact_config::Config;
use redact_engine::RedactionPipeline;
use tracing::info;

use super::read_deck;

pub async fn handle(
    deck: &Path,
    deck_id: &str,
    instructions: &str,
    offline: bool,
    config: Config,
) -> Result<()> {
    let deck = read_deck(deck)?;
    let pipeline = RedactionPipeline::from_config(config, offline);

    let outcome = pipeline.process(deck_id, instructions, &deck).await?;
    info!(
        "Rule '{}' produced {} edits ({})",
        outcome.title, outcome.action_count, outcome.meta.source
    );

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
