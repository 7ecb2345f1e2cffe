use anyhow::Result;
use literer_config::Config;
use literer_scholar::top_journals;

use super::openai_client;

pub fn journals(field: &str, all: bool) -> Result<()> {
    for journal in top_journals(field, !all)? {
        println!("{}", journal);
    }
    Ok(())
}

pub async fn models(config: &Config) -> Result<()> {
    let client = openai_client(config)?;
    let mut models = client.list_models().await?;
    models.sort();

    for model in models {
        let marker = if model == config.model { "*" } else { " " };
        println!("{} {}", marker, model);
    }
    Ok(())
}
