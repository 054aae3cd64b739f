//! Apply command - walk a deck with a given action list

use std::path::Path;

use anyhow::Result;
use redact_core::parse_actions;
use redact_engine::generate_rule_actions;
use tracing::info;

use super::{read_deck, read_json};

pub fn handle(deck: &Path, actions: &Path) -> Result<()> {
    let deck = read_deck(deck)?;
    let actions = parse_actions(&read_json(actions)?)?;
    info!("Applying {} actions to {} slides", actions.len(), deck.slide_count());

    let results = generate_rule_actions(&deck, &actions);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
