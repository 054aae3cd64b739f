mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Apply { deck, actions } => commands::apply::handle(&deck, &actions),
        cli::Commands::Sample { deck, seed } => commands::sample::handle(&deck, seed, config),
        cli::Commands::Derive { instructions } => commands::derive::handle(&instructions),
        cli::Commands::Run {
            deck,
            deck_id,
            instructions,
            offline,
        } => commands::run::handle(&deck, &deck_id, &instructions, offline, config).await,
    }
}
