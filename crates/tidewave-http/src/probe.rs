//! HTTP health probe.

use std::time::Duration;

use async_trait::async_trait;
use tidewave_core::{ActionResult, HealthConfig, Step};
use tidewave_dispatch::HealthProbe;
use tracing::debug;

use crate::{body_read_failure, transport_error, truncate_chars};

/// Longest body excerpt kept in the probe payload, in characters.
pub const BODY_EXCERPT_CHARS: usize = 400;

/// GETs the configured health endpoint.
#[derive(Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(client: reqwest::Client, config: &HealthConfig) -> Self {
        Self {
            client,
            url: config.target().to_string(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> ActionResult {
        let response = match self.client.get(&self.url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(err) => {
                return ActionResult::from_error(Step::Verify, &transport_error(err, self.timeout))
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return body_read_failure(Step::Verify, status, err, self.timeout),
        };
        debug!(url = %self.url, status, "health probe answered");

        ActionResult::from_status(Step::Verify, status).with_payload(serde_json::json!({
            "url": self.url,
            "body": truncate_chars(&body, BODY_EXCERPT_CHARS),
        }))
    }

    fn target(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_for(url: String) -> HttpHealthProbe {
        let config = HealthConfig {
            url: Some(url),
            ..HealthConfig::default()
        };
        HttpHealthProbe::new(reqwest::Client::new(), &config)
    }

    #[tokio::test]
    async fn test_2xx_passes() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let result = probe_for(format!("{}/health", server.url())).probe().await;

        health.assert_async().await;
        assert!(result.success);
        assert_eq!(result.step, Step::Verify);
        assert_eq!(result.status, Some(200));
        assert_eq!(result.payload.unwrap()["body"], r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_5xx_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let result = probe_for(format!("{}/health", server.url())).probe().await;

        assert!(!result.success);
        assert_eq!(result.status, Some(503));
        assert_eq!(result.summary(), "status=503");
    }

    #[tokio::test]
    async fn test_body_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body("x".repeat(1000))
            .create_async()
            .await;

        let result = probe_for(format!("{}/health", server.url())).probe().await;

        let body = result.payload.unwrap()["body"].as_str().unwrap().to_string();
        assert_eq!(body.len(), BODY_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_cut_off_body_fails_with_status() {
        let base = crate::testing::truncated_body_server(200).await;

        let result = probe_for(format!("{}/health", base)).probe().await;

        assert!(!result.success);
        assert_eq!(result.status, Some(200));
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_without_status() {
        let result = probe_for("http://127.0.0.1:9/health".to_string()).probe().await;

        assert!(!result.success);
        assert_eq!(result.status, None);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_falls_back_to_configured_default() {
        let probe = HttpHealthProbe::new(reqwest::Client::new(), &HealthConfig::default());
        assert_eq!(probe.target(), "http://127.0.0.1:8000/health");
    }
}
