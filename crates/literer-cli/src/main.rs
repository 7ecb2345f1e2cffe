mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use literer_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (stderr, so stdout stays clean for output)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let model_override = cli.model.is_some();
    if let Some(model) = cli.model {
        config.model = model;
    }
    tracing::debug!(model = %config.model, budget = config.budget_tokens, "Loaded configuration");

    match cli.command {
        cli::Commands::Keywords { topic, count } => {
            commands::review::keywords(&config, model_override, topic, count).await
        }
        cli::Commands::Papers(args) => commands::review::papers(&config, args).await,
        cli::Commands::Review(args) => commands::review::review(&config, model_override, args).await,
        cli::Commands::Feedback(args) => {
            commands::feedback::feedback(&config, model_override, args).await
        }
        cli::Commands::Chunks { file, tokens } => commands::feedback::chunks(&config, file, tokens),
        cli::Commands::Journals { field, all } => commands::journals::journals(&field, all),
        cli::Commands::Models => commands::journals::models(&config).await,
        cli::Commands::Completions { shell } => {
            commands::completions(shell);
            Ok(())
        }
    }
}
