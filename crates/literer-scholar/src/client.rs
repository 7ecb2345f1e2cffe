//! Semantic Scholar API client

use std::time::Duration;

use async_trait::async_trait;
use literer_core::Publication;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{Result, ScholarError, SearchQuery};

/// Semantic Scholar Graph API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";

const DETAIL_FIELDS: &str = "year,authors,venue,abstract,citationStyles,url";

/// Anything that can turn a search query into publications
#[async_trait]
pub trait PaperSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Publication>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "paperId")]
    paper_id: String,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaperDetails {
    year: Option<u32>,
    #[serde(default)]
    authors: Vec<Author>,
    venue: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "citationStyles")]
    citation_styles: Option<CitationStyles>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CitationStyles {
    bibtex: Option<String>,
}

pub struct SemanticScholarClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl SemanticScholarClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("literer/0.1 (literature review assistant)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self.client.get(url);
        match &self.api_key {
            Some(key) => req.header("x-api-key", key),
            None => req,
        }
    }

    async fn details(&self, hit: SearchHit) -> Result<Publication> {
        let url = format!("{}/paper/{}", self.base_url, hit.paper_id);
        debug!(paper_id = %hit.paper_id, "Fetching paper details");

        let resp = self.get(&url).query(&[("fields", DETAIL_FIELDS)]).send().await?;
        let details: PaperDetails = serde_json::from_str(&check_response_status(resp).await?)?;

        Ok(Publication {
            paper_id: hit.paper_id,
            title: hit.title.unwrap_or_default(),
            authors: details.authors.into_iter().filter_map(|a| a.name).collect(),
            year: details.year,
            venue: details.venue,
            abstract_text: details.abstract_text,
            bibtex: details.citation_styles.and_then(|c| c.bibtex),
            url: details.url,
        })
    }
}

#[async_trait]
impl PaperSearch for SemanticScholarClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Publication>> {
        let url = format!("{}/paper/search", self.base_url);
        let resp = self.get(&url).query(&query.params()).send().await?;
        let found: SearchResponse = serde_json::from_str(&check_response_status(resp).await?)?;

        info!(
            keyword = %query.keyword,
            total = found.total,
            returned = found.data.len(),
            "Search completed"
        );

        if found.total == 0 {
            return Ok(Vec::new());
        }

        let mut publications = Vec::with_capacity(found.data.len());
        for hit in found.data {
            publications.push(self.details(hit).await?);
        }
        Ok(publications)
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| {
                json["error"]
                    .as_str()
                    .or_else(|| json["message"].as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.trim().to_string());
        return Err(ScholarError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_details(server: &MockServer, id: &str, year: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/paper/{}", id)))
            .and(query_param("fields", DETAIL_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paperId": id,
                "year": year,
                "authors": [{"authorId": "1", "name": "Jane Doe"}, {"authorId": "2", "name": "John Roe"}],
                "venue": "Journal of Finance",
                "abstract": format!("Abstract of {}", id),
                "citationStyles": {"bibtex": format!("@['JournalArticle']{{{},\n title={{T}}\n}}", id)},
                "url": format!("https://www.semanticscholar.org/paper/{}", id)
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_fetches_details_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/search"))
            .and(query_param("query", "financial forecasting"))
            .and(query_param("limit", "2"))
            .and(query_param("year", "2019-2021"))
            .and(header("x-api-key", "s2-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 2,
                "offset": 0,
                "data": [
                    {"paperId": "p1", "title": "First paper"},
                    {"paperId": "p2", "title": "Second paper"}
                ]
            })))
            .mount(&server)
            .await;
        mount_details(&server, "p1", 2019).await;
        mount_details(&server, "p2", 2021).await;

        let client = SemanticScholarClient::new(server.uri(), Some("s2-key".to_string())).unwrap();
        let query = SearchQuery::new("financial forecasting")
            .limit(2)
            .years(Some(2019), Some(2021));
        let pubs = client.search(&query).await.unwrap();

        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].paper_id, "p1");
        assert_eq!(pubs[0].title, "First paper");
        assert_eq!(pubs[0].authors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(pubs[0].year, Some(2019));
        assert_eq!(pubs[1].title, "Second paper");
        assert!(pubs[1].bibtex.as_deref().unwrap().starts_with("@['JournalArticle']{p2"));
    }

    #[tokio::test]
    async fn test_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 0})),
            )
            .mount(&server)
            .await;

        let client = SemanticScholarClient::new(server.uri(), None).unwrap();
        let pubs = client.search(&SearchQuery::new("nothing")).await.unwrap();
        assert!(pubs.is_empty());
    }

    #[tokio::test]
    async fn test_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/search"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "Unrecognized or unsupported fields"
            })))
            .mount(&server)
            .await;

        let client = SemanticScholarClient::new(server.uri(), None).unwrap();
        let err = client.search(&SearchQuery::new("x")).await.unwrap_err();

        match err {
            ScholarError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Unrecognized or unsupported fields");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
