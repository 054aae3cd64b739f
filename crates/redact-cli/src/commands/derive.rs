//! Derive command - heuristic actions from an instruction

use anyhow::Result;

pub fn handle(instructions: &str) -> Result<()> {
    let actions = redact_rules::derive_actions(instructions);
    println!("{}", serde_json::to_string_pretty(&actions)?);
    Ok(())
}
