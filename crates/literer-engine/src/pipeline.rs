use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use literer_core::Publication;
use literer_scholar::{PaperSearch, SearchQuery, create_bibliography};
use serde::Serialize;
use tracing::info;

use crate::Reviewer;

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub topic: String,
    /// Number of search queries to derive from the topic
    pub keywords: usize,
    /// Publications requested per query
    pub publications: usize,
    pub tex_format: bool,
}

impl ReviewRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            keywords: 3,
            publications: 10,
            tex_format: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutput {
    pub keywords: Vec<String>,
    pub publications: Vec<Publication>,
    pub review: String,
    pub bibliography: String,
}

/// Topic in, literature review out
pub struct LiteratureReview {
    search: Arc<dyn PaperSearch>,
    reviewer: Reviewer,
}

impl LiteratureReview {
    pub fn new(search: Arc<dyn PaperSearch>, reviewer: Reviewer) -> Self {
        Self { search, reviewer }
    }

    pub async fn run(&self, request: &ReviewRequest) -> Result<ReviewOutput> {
        let model = self.reviewer.context().selected();
        info!(topic = %request.topic, model = %model, "Starting literature review");

        // 1. Derive search keywords
        let keywords = self
            .reviewer
            .keywords_with(&request.topic, request.keywords, &model)
            .await?;

        // 2. Search each keyword, keeping the first occurrence of every paper
        let mut seen = HashSet::new();
        let mut publications = Vec::new();
        for keyword in &keywords {
            let query = SearchQuery::new(keyword.as_str()).limit(request.publications);
            for publication in self.search.search(&query).await? {
                if seen.insert(publication.paper_id.clone()) {
                    publications.push(publication);
                }
            }
        }
        info!(publications = publications.len(), "Collected publications");

        // 3. Draft and merge reviews
        let review = self
            .reviewer
            .full_review_with(&publications, request.tex_format, &model)
            .await?;

        // 4. Bibliography matching the citations
        let bibliography = create_bibliography(&publications);

        Ok(ReviewOutput {
            keywords,
            publications,
            review,
            bibliography,
        })
    }
}
