//! Google Custom Search JSON API client.

use serde::Serialize;
use serde_json::Value;

use super::check_status;
use crate::error::GatewayError;

/// One mapped search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

pub struct GoogleSearchClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub cse_id: &'a str,
}

impl GoogleSearchClient<'_> {
    pub async fn search(
        &self,
        query: &str,
        num: u32,
    ) -> Result<Vec<SearchResult>, GatewayError> {
        let response = self
            .http
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("key", self.api_key),
                ("cx", self.cse_id),
                ("q", query),
                ("num", &num.clamp(1, 10).to_string()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: Value = response.json().await?;

        let results = payload
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(SearchResult {
                            title: item.get("title")?.as_str()?.to_string(),
                            url: item.get("link")?.as_str()?.to_string(),
                            snippet: item
                                .get("snippet")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}
