//! Client for a running orchestrator.

use std::time::Duration;

use serde::Deserialize;
use tidewave_core::{ActionResult, Instruction, Intent, Result, TidewaveError};
use uuid::Uuid;

use crate::transport_error;

/// Timeout for the read-only endpoints.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for `/orchestrate`. Covers an LLM call or a deploy with
/// one heal.
pub const ORCHESTRATE_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for interacting with a Tidewave orchestrator.
#[derive(Clone)]
pub struct TidewaveClient {
    /// Base URL of the orchestrator.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,

    orchestrate_timeout: Duration,
}

/// Body of `/health` and `/ping`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub status: String,
    pub app: String,
}

/// Body of a successful `/orchestrate` call.
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrateResponse {
    pub ok: bool,
    pub request_id: Uuid,
    pub intent: Intent,
    pub plan: String,
    pub steps: Vec<ActionResult>,
    pub verify_passed: Option<bool>,
    pub retries: u32,
    pub logs: Vec<String>,
}

/// Body of `/ops`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpsReport {
    pub ok: bool,
    pub budgets: OpsBudgets,
    pub integrations: OpsIntegrations,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpsBudgets {
    pub daily_token_budget: u64,
    pub monthly_token_budget: u64,
    pub promotion_threshold: usize,
    pub max_tokens_per_call: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpsIntegrations {
    pub supabase: bool,
    pub anthropic: bool,
    pub vercel_hooks: bool,
    pub health_probe: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl TidewaveClient {
    /// Connect to an orchestrator, verifying it answers `/health`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Self {
            base_url: url.trim_end_matches('/').to_string(),
            http_client: crate::shared_client()?,
            orchestrate_timeout: ORCHESTRATE_TIMEOUT,
        };

        client.get::<ServiceStatus>("/health").await?;
        Ok(client)
    }

    /// Override how long `orchestrate` waits for the finished outcome.
    pub fn with_orchestrate_timeout(mut self, timeout: Duration) -> Self {
        self.orchestrate_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness check.
    pub async fn ping(&self) -> Result<ServiceStatus> {
        self.get("/ping").await
    }

    /// Submit an instruction and wait for the finished orchestration.
    pub async fn orchestrate(&self, instruction: &Instruction) -> Result<OrchestrateResponse> {
        let url = format!("{}/orchestrate", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .timeout(self.orchestrate_timeout)
            .json(instruction)
            .send()
            .await
            .map_err(|e| transport_error(e, self.orchestrate_timeout))?;

        Self::decode(response).await
    }

    /// Budgets and integration flags.
    pub async fn ops(&self) -> Result<OpsReport> {
        self.get("/ops").await
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .timeout(QUERY_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(e, QUERY_TIMEOUT))?;

        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(TidewaveError::Http {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TidewaveError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected(server: &mut mockito::ServerGuard) -> TidewaveClient {
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","app":"tidewave-orchestrator"}"#)
            .create_async()
            .await;
        TidewaveClient::connect(&format!("{}/", server.url())).await.unwrap()
    }

    #[tokio::test]
    async fn test_connect_requires_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let err = TidewaveClient::connect(&server.url()).await.err().unwrap();
        assert!(matches!(err, TidewaveError::Http { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_ping() {
        let mut server = mockito::Server::new_async().await;
        let client = connected(&mut server).await;
        assert_eq!(client.base_url(), server.url());

        server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(r#"{"status":"ok","app":"edge"}"#)
            .create_async()
            .await;

        let status = client.ping().await.unwrap();
        assert_eq!(status.app, "edge");
    }

    #[tokio::test]
    async fn test_orchestrate_surfaces_error_body() {
        let mut server = mockito::Server::new_async().await;
        let client = connected(&mut server).await;

        server
            .mock("POST", "/orchestrate")
            .with_status(400)
            .with_body(r#"{"ok":false,"error":"text is required"}"#)
            .create_async()
            .await;

        let instruction = Instruction::new("deploy").unwrap();
        match client.orchestrate(&instruction).await {
            Err(TidewaveError::Http { status, message }) => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "text is required");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.request_id)),
        }
    }

    #[tokio::test]
    async fn test_orchestrate_timeout_is_classified() {
        let base_url = crate::testing::silent_server().await;
        let client = TidewaveClient {
            base_url,
            http_client: reqwest::Client::new(),
            orchestrate_timeout: ORCHESTRATE_TIMEOUT,
        }
        .with_orchestrate_timeout(Duration::from_millis(200));

        let err = client
            .orchestrate(&Instruction::new("redeploy").unwrap())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, TidewaveError::Timeout { duration_ms: 200, .. }));
        assert!(err.is_recoverable());
    }
}
