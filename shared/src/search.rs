//! Restaurant search against an OpenSearch/Elasticsearch index.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

#[async_trait]
pub trait RestaurantSearch: Send + Sync {
    /// Ids of restaurants tagged with `cuisine`, best match first.
    async fn ids_for_cuisine(&self, cuisine: &str, size: u32) -> Result<Vec<String>>;
}

/// Basic-auth credentials for the search cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
}

/// HTTP client for the `_search` URI endpoint.
pub struct OpenSearchClient {
    http_client: reqwest::Client,
    endpoint: String,
    index: String,
    credentials: SearchCredentials,
}

impl OpenSearchClient {
    pub fn new(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        index: impl Into<String>,
        credentials: SearchCredentials,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            index: index.into(),
            credentials,
        }
    }

    fn search_url(&self, cuisine: &str, size: u32) -> String {
        format!(
            "{}/{}/_search?q={}&size={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.index),
            urlencoding::encode(&format!("cuisine:{}", cuisine)),
            size
        )
    }
}

fn parse_hit_ids(body: &str) -> Result<Vec<String>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.hits.hits.into_iter().map(|hit| hit.id).collect())
}

#[async_trait]
impl RestaurantSearch for OpenSearchClient {
    async fn ids_for_cuisine(&self, cuisine: &str, size: u32) -> Result<Vec<String>> {
        let url = self.search_url(cuisine, size);
        debug!(url = %url, "Querying search index");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Search(format!("{} returned {}: {}", url, status, body)));
        }

        parse_hit_ids(&body)
    }
}
