//! SerpAPI client for Google News headlines.

use serde::Serialize;
use serde_json::Value;

use super::check_status;
use crate::error::GatewayError;

/// One mapped news item.
#[derive(Debug, Clone, Serialize)]
pub struct NewsResult {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

pub struct SerpApiClient<'a> {
    pub http: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl SerpApiClient<'_> {
    pub async fn news(
        &self,
        query: Option<&str>,
        country: &str,
        limit: usize,
    ) -> Result<Vec<NewsResult>, GatewayError> {
        let mut params = vec![
            ("engine", "google_news".to_string()),
            ("gl", country.to_string()),
            ("api_key", self.api_key.to_string()),
        ];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: Value = response.json().await?;

        let results = payload
            .get("news_results")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(NewsResult {
                            title: item.get("title")?.as_str()?.to_string(),
                            url: item.get("link")?.as_str()?.to_string(),
                            source: item
                                .pointer("/source/name")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            date: item
                                .get("date")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        })
                    })
                    .take(limit)
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}
