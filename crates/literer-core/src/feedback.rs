//! Feedback and revision loop over chunked excerpts
//!
//! `request_feedback` chunks an excerpt and asks the completion service for
//! one piece of editor feedback per chunk. `incorporate_feedback` sends each
//! (chunk, feedback) pair back for a rewrite. Outputs always line up with
//! their inputs index for index.

use std::sync::Arc;

use literer_tokens::TokenCounter;
use serde::Serialize;
use tracing::{debug, info};

use crate::chunk::{Chunk, Chunker, DEFAULT_DELIMITER};
use crate::completion::{CompletionService, complete_all};
use crate::{Error, ModelContext, Result, TargetJournal};

pub const DEFAULT_FEEDBACK_BUDGET: usize = 4000;

const FEEDBACK_SYSTEM_PROMPT: &str =
    "You are a strict academic reviewer acting as the editor of a journal.";

const REVISION_SYSTEM_PROMPT: &str =
    "You are the author of an academic manuscript, revising it after peer review.";

/// A chunk paired with the feedback it received
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRecord {
    pub chunk: Chunk,
    pub feedback: String,
}

/// Result of one feedback pass; `chunks[i]` received `feedback[i]`
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRound {
    pub chunks: Vec<Chunk>,
    pub feedback: Vec<String>,
}

impl FeedbackRound {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk_texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.chunks
            .iter()
            .zip(&self.feedback)
            .map(|(chunk, feedback)| FeedbackRecord {
                chunk: chunk.clone(),
                feedback: feedback.clone(),
            })
            .collect()
    }
}

pub struct FeedbackLoop {
    completion: Arc<dyn CompletionService>,
    context: Arc<ModelContext>,
    delimiter: String,
    concurrency: usize,
}

impl FeedbackLoop {
    pub fn new(completion: Arc<dyn CompletionService>, context: Arc<ModelContext>) -> Self {
        Self {
            completion,
            context,
            delimiter: DEFAULT_DELIMITER.to_string(),
            concurrency: 1,
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Maximum number of completion requests in flight (1 = sequential)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Chunk `excerpt` under `budget` tokens and collect editor feedback
    /// for every chunk.
    pub async fn request_feedback(
        &self,
        excerpt: &str,
        target: &TargetJournal,
        budget: usize,
    ) -> Result<FeedbackRound> {
        let model = self.context.selected();
        let counter = TokenCounter::for_model(&model)?;

        debug!(state = "chunking", model = %model, budget, "Feedback loop");
        let chunks = Chunker::new(counter)
            .with_delimiter(self.delimiter.clone())
            .split(excerpt, budget)?;

        let journal = target.describe();
        let prompts = chunks
            .iter()
            .map(|chunk| feedback_prompt(&journal, &chunk.text))
            .collect();

        info!(chunks = chunks.len(), model = %model, "Requesting feedback");
        let feedback = complete_all(
            self.completion.as_ref(),
            FEEDBACK_SYSTEM_PROMPT,
            prompts,
            &model,
            self.concurrency,
        )
        .await?;
        debug!(state = "done", chunks = chunks.len(), "Feedback loop");

        Ok(FeedbackRound { chunks, feedback })
    }

    /// Rewrite every chunk according to its paired feedback.
    ///
    /// Lengths are checked before any request is sent.
    pub async fn incorporate_feedback<C, F>(
        &self,
        chunks: &[C],
        feedback: &[F],
        target: &TargetJournal,
    ) -> Result<Vec<String>>
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        if chunks.len() != feedback.len() {
            return Err(Error::Alignment {
                chunks: chunks.len(),
                feedback: feedback.len(),
            });
        }

        let model = self.context.selected();
        let journal = target.describe();
        let prompts = chunks
            .iter()
            .zip(feedback)
            .map(|(chunk, feedback)| revision_prompt(&journal, chunk.as_ref(), feedback.as_ref()))
            .collect();

        info!(chunks = chunks.len(), model = %model, "Incorporating feedback");
        complete_all(
            self.completion.as_ref(),
            REVISION_SYSTEM_PROMPT,
            prompts,
            &model,
            self.concurrency,
        )
        .await
    }
}

fn feedback_prompt(journal: &str, chunk: &str) -> String {
    format!(
        "A researcher is aiming to publish to {}. Provide strict feedback on this excerpt:\n{}",
        journal, chunk
    )
}

fn revision_prompt(journal: &str, chunk: &str, feedback: &str) -> String {
    format!(
        "You are aiming to publish to {}. Rewrite the excerpt below so that it addresses \
         the reviewer feedback. Reply with the revised excerpt only.\n\n\
         Excerpt:\n{}\n\nFeedback:\n{}",
        journal, chunk, feedback
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use literer_tokens::ModelId;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct Call {
        system: String,
        user: String,
        model: String,
    }

    /// Replies "reply N" where N is the call order; optionally fails on one call
    #[derive(Default)]
    struct MockCompletion {
        calls: Mutex<Vec<Call>>,
        fail_on: Option<usize>,
    }

    impl MockCompletion {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for MockCompletion {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            model: &ModelId,
        ) -> anyhow::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.len();
            calls.push(Call {
                system: system_prompt.to_string(),
                user: user_prompt.to_string(),
                model: model.to_string(),
            });
            if self.fail_on == Some(n) {
                anyhow::bail!("connection reset");
            }
            Ok(format!("reply {}", n))
        }
    }

    /// Echoes a marker from the prompt after a delay that shrinks with the marker,
    /// so later requests finish first
    struct SlowEcho;

    #[async_trait]
    impl CompletionService for SlowEcho {
        async fn complete(&self, _: &str, user_prompt: &str, _: &ModelId) -> anyhow::Result<String> {
            let marker = user_prompt
                .split_whitespace()
                .find(|w| w.starts_with("para"))
                .unwrap_or("none")
                .to_string();
            let n: u64 = marker.trim_start_matches("para").parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50 - n * 10)).await;
            Ok(marker)
        }
    }

    /// Switches the shared model on its first call
    struct Switcher {
        context: Arc<ModelContext>,
        models: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionService for Switcher {
        async fn complete(&self, _: &str, _: &str, model: &ModelId) -> anyhow::Result<String> {
            self.context.select(ModelId::new("gpt-4"))?;
            self.models.lock().unwrap().push(model.to_string());
            Ok("ok".to_string())
        }
    }

    fn context() -> Arc<ModelContext> {
        Arc::new(ModelContext::new(ModelId::new("gpt-3.5-turbo")).unwrap())
    }

    fn excerpt(paragraphs: usize) -> String {
        (0..paragraphs)
            .map(|i| format!("para{} We estimate the model with simulated moments.", i))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn target() -> TargetJournal {
        TargetJournal::single("Econometrica").unwrap()
    }

    #[tokio::test]
    async fn test_one_request_per_chunk() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        // each paragraph is ~12 tokens, so a budget of 15 keeps them apart
        let round = feedback_loop
            .request_feedback(&excerpt(3), &target(), 15)
            .await
            .unwrap();

        assert_eq!(round.len(), 3);
        assert_eq!(round.chunks.len(), round.feedback.len());
        assert_eq!(round.feedback, vec!["reply 0", "reply 1", "reply 2"]);

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        for (call, chunk) in calls.iter().zip(&round.chunks) {
            assert_eq!(call.system, FEEDBACK_SYSTEM_PROMPT);
            assert!(call.user.contains("the following journal: 'Econometrica'"));
            assert!(call.user.ends_with(&chunk.text));
            assert_eq!(call.model, "gpt-3.5-turbo");
        }

        let records = round.records();
        assert_eq!(records[1].chunk.text, round.chunks[1].text);
        assert_eq!(records[1].feedback, "reply 1");
    }

    #[tokio::test]
    async fn test_single_chunk_under_default_budget() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let text = excerpt(5);
        let round = feedback_loop
            .request_feedback(&text, &target(), DEFAULT_FEEDBACK_BUDGET)
            .await
            .unwrap();

        assert_eq!(round.len(), 1);
        assert_eq!(round.chunk_texts(), vec![text.as_str()]);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_aborts_without_partial_output() {
        let mock = Arc::new(MockCompletion::failing_on(1));
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let err = feedback_loop
            .request_feedback(&excerpt(4), &target(), 15)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CompletionService { index: 1, .. }));
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_oversize_paragraph_sends_nothing() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let err = feedback_loop
            .request_feedback(&excerpt(2), &target(), 3)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ChunkTooLarge { paragraph: 0, .. }));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_results_keep_chunk_order() {
        let feedback_loop = FeedbackLoop::new(Arc::new(SlowEcho), context()).with_concurrency(4);

        let round = feedback_loop
            .request_feedback(&excerpt(4), &target(), 15)
            .await
            .unwrap();

        assert_eq!(round.feedback, vec!["para0", "para1", "para2", "para3"]);
    }

    #[tokio::test]
    async fn test_model_read_once_per_call() {
        let ctx = context();
        let switcher = Arc::new(Switcher {
            context: ctx.clone(),
            models: Mutex::new(Vec::new()),
        });
        let feedback_loop = FeedbackLoop::new(switcher.clone(), ctx.clone());

        feedback_loop
            .request_feedback(&excerpt(3), &target(), 15)
            .await
            .unwrap();

        let models = switcher.models.lock().unwrap().clone();
        assert_eq!(models, vec!["gpt-3.5-turbo"; 3]);
        assert_eq!(ctx.selected().as_str(), "gpt-4");
    }

    #[tokio::test]
    async fn test_incorporate_rejects_misaligned_input() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let err = feedback_loop
            .incorporate_feedback(&["a", "b"], &["f1"], &target())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Alignment {
                chunks: 2,
                feedback: 1
            }
        ));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_incorporate_pairs_chunk_with_feedback() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let revised = feedback_loop
            .incorporate_feedback(
                &["first chunk", "second chunk"],
                &["tighten the claim", "cite more work"],
                &TargetJournal::from_names(["Journal of Finance", "Econometrica"]).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(revised, vec!["reply 0", "reply 1"]);

        let calls = mock.calls();
        assert_eq!(calls[0].system, REVISION_SYSTEM_PROMPT);
        assert!(calls[0].user.contains("first chunk"));
        assert!(calls[0].user.contains("tighten the claim"));
        assert!(calls[1].user.contains("second chunk"));
        assert!(calls[1].user.contains("cite more work"));
        assert!(calls[1].user.contains("one of the following journals"));
    }

    #[tokio::test]
    async fn test_feedback_then_revision() {
        let mock = Arc::new(MockCompletion::default());
        let feedback_loop = FeedbackLoop::new(mock.clone(), context());

        let round = feedback_loop
            .request_feedback(&excerpt(3), &target(), 15)
            .await
            .unwrap();
        let revised = feedback_loop
            .incorporate_feedback(&round.chunks, &round.feedback, &target())
            .await
            .unwrap();

        assert_eq!(revised.len(), round.len());
        assert_eq!(mock.calls().len(), 6);
    }
}
