use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::config::TransportConfig;
use crate::utils::error::{AppError, Result};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.5";
const REFERER_URL: &str = "https://www.google.com/";

/// A fetched document.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Single-request HTTP capability used by every source.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a document, failing on any non-success status.
    async fn get(&self, url: &str) -> Result<Page>;

    /// GET a URL and report its status without judging it.
    async fn probe(&self, url: &str) -> Result<u16>;
}

pub struct HttpTransport {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        let user_agents = config
            .user_agents
            .iter()
            .filter(|ua| !ua.trim().is_empty())
            .cloned()
            .collect();

        Ok(Self { client, user_agents })
    }

    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0")
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let user_agent = self.pick_user_agent();
        debug!(url, user_agent, "GET");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANG)
            .header(REFERER, REFERER_URL)
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Page> {
        let response = self.send(url).await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }

    async fn probe(&self, url: &str) -> Result<u16> {
        let response = self.send(url).await?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> HttpTransport {
        HttpTransport::new(&TransportConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_body_and_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header_exists("user-agent"))
            .and(header_exists("accept-language"))
            .and(header("referer", REFERER_URL))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let page = transport()
            .get(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html>ok</html>");
        assert!(page.url.ends_with("/page"));
    }

    #[tokio::test]
    async fn test_get_maps_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = transport().get(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_get_fails_on_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = transport().get(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_probe_reports_status_without_failing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let status = transport().probe(&server.uri()).await.unwrap();
        assert_eq!(status, 403);
    }

    #[test]
    fn test_user_agent_comes_from_pool() {
        let config = TransportConfig::default();
        let transport = HttpTransport::new(&config).unwrap();
        for _ in 0..10 {
            let ua = transport.pick_user_agent();
            assert!(config.user_agents.iter().any(|candidate| candidate == ua));
        }
    }
}
