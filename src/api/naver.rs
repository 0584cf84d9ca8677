use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use super::http_client::create_custom_client;
use super::types::NewsArticle;
use super::ClientConfig;
use crate::error::{ForgeError, Result};

const DEFAULT_BASE_URL: &str = "https://openapi.naver.com";

/// Seam for news collection so the pipeline can run against a mock in tests
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Search news articles, newest first
    async fn search(&self, query: &str, display: u32, start: u32) -> Result<Vec<NewsArticle>>;
}

/// Naver News search API client
pub struct NaverNewsClient {
    client_id: String,
    client_secret: String,
    config: ClientConfig,
    base_url: String,
    http_client: Client,
}

impl NaverNewsClient {
    pub fn new(client_id: String, client_secret: String, config: ClientConfig) -> Self {
        Self::with_base_url(client_id, client_secret, config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(
        client_id: String,
        client_secret: String,
        config: ClientConfig,
        base_url: String,
    ) -> Self {
        let http_client = create_custom_client(config.timeout, &config.user_agent);

        Self {
            client_id,
            client_secret,
            config,
            base_url,
            http_client,
        }
    }
}

#[async_trait]
impl NewsSource for NaverNewsClient {
    async fn search(&self, query: &str, display: u32, start: u32) -> Result<Vec<NewsArticle>> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1/search/news.json", self.base_url),
            &[
                ("query", query.to_string()),
                ("display", display.to_string()),
                ("start", start.to_string()),
                ("sort", "date".to_string()),
            ],
        )
        .map_err(|e| ForgeError::Parse(e.to_string()))?;

        let mut last_error = None;

        for attempt in 0..self.config.max_retries {
            let response = self
                .http_client
                .get(url.clone())
                .header("X-Naver-Client-Id", &self.client_id)
                .header("X-Naver-Client-Secret", &self.client_secret)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    // Connect failures get a longer pause than plain timeouts
                    let delay = if e.is_connect() {
                        Duration::from_secs(5)
                    } else {
                        Duration::from_secs(2)
                    };
                    warn!("News request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(ForgeError::Network(e));
                    if attempt + 1 < self.config.max_retries {
                        sleep(delay).await;
                    }
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 {
                // The API quota resets on a per-minute window
                return Err(ForgeError::RateLimit);
            }
            if !status.is_success() {
                return Err(ForgeError::api_error(
                    status.to_string(),
                    format!("News search failed with status {}", status),
                    Some("Check your Naver client_id and client_secret.".to_string()),
                ));
            }

            let raw: NaverSearchResponse = response.json().await.map_err(ForgeError::Network)?;
            debug!("News search '{}': {} items", query, raw.items.len());

            return Ok(raw.items.into_iter().map(NaverNewsItem::into_article).collect());
        }

        Err(last_error
            .unwrap_or_else(|| ForgeError::Other("News search failed after all retries".to_string())))
    }
}

/// Strip the `<b>`/`</b>` highlight tags Naver injects around query matches
fn strip_highlight(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

#[derive(Debug, Deserialize)]
struct NaverSearchResponse {
    #[serde(default)]
    items: Vec<NaverNewsItem>,
}

#[derive(Debug, Deserialize)]
struct NaverNewsItem {
    title: String,
    #[serde(default)]
    description: String,
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(rename = "originallink", default)]
    original_link: String,
}

impl NaverNewsItem {
    fn into_article(self) -> NewsArticle {
        NewsArticle {
            title: strip_highlight(&self.title),
            description: strip_highlight(&self.description),
            link: self.link,
            pub_date: self.pub_date,
            original_link: self.original_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String) -> NaverNewsClient {
        let config = ClientConfig {
            max_retries: 2,
            retry_base_delay: 10,
            ..Default::default()
        };
        NaverNewsClient::with_base_url("id".to_string(), "secret".to_string(), config, base_url)
    }

    #[test]
    fn test_strip_highlight() {
        assert_eq!(strip_highlight("<b>김의원</b> 국정감사"), "김의원 국정감사");
        assert_eq!(strip_highlight("no tags"), "no tags");
    }

    #[tokio::test]
    async fn test_search_strips_tags_and_maps_fields() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .match_header("X-Naver-Client-Id", "id")
            .with_body(
                r#"{"total": 1, "items": [{
                    "title": "<b>김의원</b> 국정감사 질의",
                    "description": "예산 <b>질의</b>",
                    "link": "https://news.example/1",
                    "originallink": "https://paper.example/1",
                    "pubDate": "Mon, 20 Oct 2025 09:00:00 +0900"
                }]}"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let articles = client.search("김의원 국정감사", 50, 1).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "김의원 국정감사 질의");
        assert_eq!(articles[0].description, "예산 질의");
        assert_eq!(articles[0].original_link, "https://paper.example/1");
    }

    #[tokio::test]
    async fn test_search_rate_limit_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.search("query", 50, 1).await.unwrap_err();
        assert!(matches!(err, ForgeError::RateLimit));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_http_error_carries_hint() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.search("query", 50, 1).await.unwrap_err();
        assert!(err.hint().unwrap().contains("client_id"));
    }
}
