use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Rule-based redaction for slide decks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "REDACT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply an action list to a deck and print the resulting edits
    Apply {
        /// Deck JSON file
        #[arg(long)]
        deck: PathBuf,

        /// Actions JSON file (array or {"actions": [...]})
        #[arg(long)]
        actions: PathBuf,
    },

    /// Print the deck sample the classifier would see
    Sample {
        /// Deck JSON file
        #[arg(long)]
        deck: PathBuf,

        /// Seed for middle-slide sampling (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Derive heuristic actions from an instruction
    Derive {
        /// Redaction instruction
        instructions: String,
    },

    /// Run the full pipeline: classify, derive actions and walk the deck
    Run {
        /// Deck JSON file
        #[arg(long)]
        deck: PathBuf,

        /// Deck identifier attached to every result row
        #[arg(long)]
        deck_id: String,

        /// Redaction instruction
        instructions: String,

        /// Skip the classifier and use heuristic actions only
        #[arg(long)]
        offline: bool,
    },
}
