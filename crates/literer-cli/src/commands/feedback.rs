use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use literer_config::Config;
use literer_core::{Chunker, FeedbackLoop, ModelId, TargetJournal, TokenCounter, join_chunks};
use serde::Serialize;

use super::{check_model_available, emit, model_context, openai_client};
use crate::cli::FeedbackArgs;

#[derive(Serialize)]
struct FeedbackReport<'a> {
    target: String,
    chunks: Vec<ChunkReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    revised_text: Option<String>,
}

#[derive(Serialize)]
struct ChunkReport<'a> {
    index: usize,
    tokens: usize,
    text: &'a str,
    feedback: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    revised: Option<&'a str>,
}

fn read_draft(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn feedback(config: &Config, model_override: bool, args: FeedbackArgs) -> Result<()> {
    let draft = read_draft(&args.file)?;
    let target = TargetJournal::from_names(args.journals)?;
    let budget = args.tokens.unwrap_or(config.budget_tokens);

    let context = model_context(config)?;
    let client = openai_client(config)?;
    if model_override {
        check_model_available(&client, &config.model).await?;
    }

    let feedback_loop = FeedbackLoop::new(client, context)
        .with_delimiter(config.delimiter.as_str())
        .with_concurrency(config.concurrency);

    let round = feedback_loop.request_feedback(&draft, &target, budget).await?;

    let revised = if args.revise {
        Some(
            feedback_loop
                .incorporate_feedback(&round.chunks, &round.feedback, &target)
                .await?,
        )
    } else {
        None
    };

    let report = FeedbackReport {
        target: target.describe(),
        chunks: round
            .chunks
            .iter()
            .zip(&round.feedback)
            .enumerate()
            .map(|(i, (chunk, feedback))| ChunkReport {
                index: chunk.index,
                tokens: chunk.tokens,
                text: &chunk.text,
                feedback,
                revised: revised.as_ref().map(|r| r[i].as_str()),
            })
            .collect(),
        revised_text: revised.as_ref().map(|r| join_chunks(r.as_slice(), &config.delimiter)),
    };

    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_markdown(&report)
    };
    emit(&output, args.out.as_deref())
}

fn render_markdown(report: &FeedbackReport<'_>) -> String {
    let mut out = format!("# Feedback for submission to {}\n", report.target);
    for chunk in &report.chunks {
        out.push_str(&format!(
            "\n## Chunk {} ({} tokens)\n\n### Feedback\n\n{}\n",
            chunk.index + 1,
            chunk.tokens,
            chunk.feedback.trim()
        ));
        if let Some(revised) = chunk.revised {
            out.push_str(&format!("\n### Revised\n\n{}\n", revised.trim()));
        }
    }
    if let Some(text) = &report.revised_text {
        out.push_str(&format!("\n# Revised draft\n\n{}\n", text));
    }
    out
}

pub fn chunks(config: &Config, file: PathBuf, tokens: Option<usize>) -> Result<()> {
    let draft = read_draft(&file)?;
    let budget = tokens.unwrap_or(config.budget_tokens);
    let counter = TokenCounter::for_model(&ModelId::new(config.model.as_str()))?;

    let chunks = Chunker::new(&counter)
        .with_delimiter(config.delimiter.as_str())
        .split(&draft, budget)?;

    println!(
        "{} ({} tokens under {}) → {} chunk(s), budget {}",
        file.display(),
        counter.count(&draft),
        config.model,
        chunks.len(),
        budget
    );
    for chunk in &chunks {
        let preview: String = chunk
            .text
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
            .chars()
            .take(60)
            .collect();
        println!(
            "  [{}] paragraphs {}-{} · {} tokens · {}",
            chunk.index + 1,
            chunk.paragraphs.start + 1,
            chunk.paragraphs.end,
            chunk.tokens,
            preview
        );
    }
    Ok(())
}
