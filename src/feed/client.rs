//! HTTP client for the earthquake feed.

use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::FetchError;
use crate::feed::types::{EarthquakeEvent, parse_feed};

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// GeoJSON endpoint, e.g. the USGS summary feed.
    pub url: String,
    /// Timeout for the whole request.
    pub timeout: Duration,
}

impl From<&Config> for FeedConfig {
    fn from(config: &Config) -> Self {
        Self {
            url: config.feed_url.clone(),
            timeout: config.request_timeout,
        }
    }
}

/// Issues single-shot requests against the feed. No retries, no backoff.
#[derive(Debug, Clone)]
pub struct FeedClient {
    config: FeedConfig,
    client: Client,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("quakeboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetch the feed once and return at most `limit` events, most recent first.
    pub async fn fetch(&self, limit: usize) -> Result<Vec<EarthquakeEvent>, FetchError> {
        tracing::debug!("Fetching earthquake feed from {}", self.config.url);

        let response = self.client.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.config.url.clone(),
            });
        }

        let body = response.text().await?;
        let mut events = parse_feed(&body)?;
        events.truncate(limit);

        tracing::info!("Fetched {} events from feed", events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/feed.geojson", addr)
    }

    fn client_for(url: String) -> FeedClient {
        FeedClient::new(FeedConfig {
            url,
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn test_fetch_applies_limit() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"id":"a","properties":{"mag":4.5,"time":1700000000000,"place":"A"},"geometry":null},
            {"id":"b","properties":{"mag":2.0,"time":1700000600000,"place":"B"},"geometry":null},
            {"id":"c","properties":{"mag":3.1,"time":1700000300000,"place":"C"},"geometry":null}
        ]}"#;
        let url = serve_once("HTTP/1.1 200 OK", body).await;

        let events = client_for(url).fetch(2).await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;

        let result = client_for(url).fetch(50).await;
        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let url = serve_once("HTTP/1.1 200 OK", "not json").await;

        let result = client_for(url).fetch(50).await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let result = client_for("not a url".to_string()).fetch(50).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
