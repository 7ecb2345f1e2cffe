use std::sync::Arc;

use lazy_static::lazy_static;
use literer_core::completion::complete_all;
use literer_core::{
    CompletionService, Error, ModelContext, ModelId, Publication, Result, TargetJournal,
};
use regex::Regex;
use tracing::{debug, info};

lazy_static! {
    static ref FIRST_INTEGER: Regex = Regex::new(r"\d+").unwrap();
}

const KEYWORD_SYSTEM_PROMPT: &str = "You are an assistant creating helpful queries to search \
     relevant papers using the Semantic Scholar API.";

const RELEVANCE_SYSTEM_PROMPT: &str =
    "You are the editor of an academic journal, judging whether work fits your journal.";

pub struct Reviewer {
    completion: Arc<dyn CompletionService>,
    context: Arc<ModelContext>,
    concurrency: usize,
}

impl Reviewer {
    pub fn new(completion: Arc<dyn CompletionService>, context: Arc<ModelContext>) -> Self {
        Self {
            completion,
            context,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn context(&self) -> &Arc<ModelContext> {
        &self.context
    }

    /// Ask for `n` search queries relevant to `topic`
    pub async fn keywords(&self, topic: &str, n: usize) -> Result<Vec<String>> {
        self.keywords_with(topic, n, &self.context.selected()).await
    }

    pub(crate) async fn keywords_with(
        &self,
        topic: &str,
        n: usize,
        model: &ModelId,
    ) -> Result<Vec<String>> {
        let prompt = format!(
            "Create exactly '{}' query keywords to search for papers relevant to '{}'. \
             Separate the search queries by | and do not use any quotes or newlines, \
             e.g. 'query 1 | query 2 | ...'",
            n, topic
        );
        let reply = self.ask(KEYWORD_SYSTEM_PROMPT, &prompt, model).await?;
        let keywords = parse_keywords(&reply);
        info!(topic, count = keywords.len(), "Derived search keywords");
        Ok(keywords)
    }

    /// Draft a short review of one publication
    pub async fn single_review(&self, publication: &Publication, tex_format: bool) -> Result<String> {
        let model = self.context.selected();
        self.ask(
            &review_system_prompt(tex_format),
            &single_review_prompt(publication, tex_format),
            &model,
        )
        .await
    }

    /// Review every publication, then merge the reviews into one text
    pub async fn full_review(&self, publications: &[Publication], tex_format: bool) -> Result<String> {
        self.full_review_with(publications, tex_format, &self.context.selected())
            .await
    }

    pub(crate) async fn full_review_with(
        &self,
        publications: &[Publication],
        tex_format: bool,
        model: &ModelId,
    ) -> Result<String> {
        if publications.is_empty() {
            return Ok(String::new());
        }

        info!(publications = publications.len(), model = %model, "Drafting single reviews");
        let prompts = publications
            .iter()
            .map(|p| single_review_prompt(p, tex_format))
            .collect();
        let reviews = complete_all(
            self.completion.as_ref(),
            &review_system_prompt(tex_format),
            prompts,
            model,
            self.concurrency,
        )
        .await?;

        debug!(reviews = reviews.len(), "Combining reviews");
        let prompt = format!(
            "Combine the following reviews for your literature review:\n\n{}",
            reviews.join("\n\n")
        );
        self.ask(&review_system_prompt(tex_format), &prompt, model)
            .await
    }

    /// Relevance of `publication` to `target` on a 0-10 scale
    pub async fn rate_relevance(
        &self,
        publication: &Publication,
        target: &TargetJournal,
    ) -> Result<u8> {
        let model = self.context.selected();
        let prompt = format!(
            "On a scale from 0 to 10, how relevant is the following publication to a \
             paper aimed at {}? Answer with a single integer.\n\n{}",
            target.describe(),
            publication.describe(false)
        );
        let reply = self.ask(RELEVANCE_SYSTEM_PROMPT, &prompt, &model).await?;
        parse_score(&reply)
    }

    async fn ask(&self, system_prompt: &str, user_prompt: &str, model: &ModelId) -> Result<String> {
        self.completion
            .complete(system_prompt, user_prompt, model)
            .await
            .map_err(|source| Error::CompletionService { index: 0, source })
    }
}

fn review_system_prompt(tex_format: bool) -> String {
    let mut prompt = String::from(
        "You are a researcher publishing in top journals. \
         You are currently writing a literature review for your upcoming research. \
         Make sure to properly cite the sources",
    );
    if tex_format {
        prompt.push_str(" using the proper TeX format");
    }
    prompt.push('.');
    prompt
}

fn single_review_prompt(publication: &Publication, tex_format: bool) -> String {
    let mut prompt = format!(
        "Create a brief review for the following publication.\n\n{}",
        publication.describe(tex_format)
    );
    if tex_format {
        prompt.push_str("\nMake sure to use the proper TeX format (\\textcite or \\parencite).");
    }
    prompt
}

fn parse_keywords(reply: &str) -> Vec<String> {
    reply
        .split('|')
        .map(|q| q.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect()
}

fn parse_score(reply: &str) -> Result<u8> {
    let score: u32 = FIRST_INTEGER
        .find(reply)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| anyhow::anyhow!("No relevance score in reply: {}", reply.trim()))?;
    Ok(score.min(10) as u8)
}
