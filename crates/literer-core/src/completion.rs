//! Text-completion service seam

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use literer_tokens::ModelId;

use crate::{Error, Result};

/// An opaque chat-style text completion endpoint
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete `user_prompt` under `system_prompt` with the given model
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &ModelId,
    ) -> anyhow::Result<String>;
}

/// Run one completion per prompt and return the replies in prompt order.
///
/// At most `concurrency` requests are in flight. The first failure drops
/// the remaining requests and is returned; no partial output escapes.
pub async fn complete_all(
    service: &dyn CompletionService,
    system_prompt: &str,
    prompts: Vec<String>,
    model: &ModelId,
    concurrency: usize,
) -> Result<Vec<String>> {
    stream::iter(prompts.into_iter().enumerate())
        .map(|(index, prompt)| async move {
            tracing::debug!(index, model = %model, "Requesting completion");
            service
                .complete(system_prompt, &prompt, model)
                .await
                .map_err(|source| {
                    tracing::warn!(index, error = %source, "Completion failed");
                    Error::CompletionService { index, source }
                })
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
