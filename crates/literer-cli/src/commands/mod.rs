pub mod feedback;
pub mod journals;
pub mod review;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use literer_config::Config;
use literer_core::{ModelContext, ModelId};
use literer_llm::OpenAiClient;
use literer_scholar::SemanticScholarClient;

use crate::cli::Cli;

/// Model context for this run, validated against the local tokenizer table
pub fn model_context(config: &Config) -> Result<Arc<ModelContext>> {
    Ok(Arc::new(ModelContext::new(ModelId::new(config.model.as_str()))?))
}

pub fn openai_client(config: &Config) -> Result<Arc<OpenAiClient>> {
    let api_key = config.openai_api_key().with_context(|| {
        format!(
            "No OpenAI API key found. Set the {} environment variable.",
            config.openai.api_key_env
        )
    })?;
    Ok(Arc::new(OpenAiClient::new(
        config.openai.base_url.as_str(),
        Some(api_key),
        config.openai_timeout(),
    )?))
}

/// Reject a user-chosen model the API key cannot use
pub async fn check_model_available(client: &OpenAiClient, model: &str) -> Result<()> {
    let models = client.list_models().await?;
    if !models.iter().any(|m| m == model) {
        anyhow::bail!(
            "{} is not a valid OpenAI model or the API key provided does not have access to it.",
            model
        );
    }
    Ok(())
}

pub fn scholar_client(config: &Config) -> Result<Arc<SemanticScholarClient>> {
    Ok(Arc::new(SemanticScholarClient::new(
        config.scholar.base_url.as_str(),
        config.scholar.api_key.clone(),
    )?))
}

/// Write `content` to `path`, or print it when no path is given
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "literer", &mut std::io::stdout());
}
