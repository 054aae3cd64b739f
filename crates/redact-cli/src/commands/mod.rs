pub mod apply;
pub mod derive;
pub mod run;
pub mod sample;

use std::path::Path;

use anyhow::{Context, Result};
use redact_config::Config;
use redact_core::Deck;

/// Load config from an explicit path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load(),
    }
}

pub fn read_deck(path: &Path) -> Result<Deck> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck {}", path.display()))?;
    Deck::from_json(&content).with_context(|| format!("Invalid deck JSON in {}", path.display()))
}

pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}
