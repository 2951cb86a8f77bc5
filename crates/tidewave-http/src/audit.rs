//! Audit rows inserted through the Supabase REST API.

use std::time::Duration;

use async_trait::async_trait;
use tidewave_core::{AuditConfig, AuditEntry, Result, TidewaveError};
use tidewave_dispatch::AuditSink;
use tracing::debug;

use crate::transport_error;

/// Inserts one row per record into the configured table.
#[derive(Clone)]
pub struct SupabaseAuditSink {
    client: reqwest::Client,
    endpoint: Option<(String, String)>,
    timeout: Duration,
}

impl SupabaseAuditSink {
    pub fn new(client: reqwest::Client, config: &AuditConfig) -> Self {
        let endpoint = match (config.insert_url(), config.key.clone()) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        };

        Self {
            client,
            endpoint,
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl AuditSink for SupabaseAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        let Some((url, key)) = &self.endpoint else {
            debug!(message = %entry.message, "audit sink not configured, dropping record");
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Prefer", "return=representation")
            .json(&entry)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TidewaveError::Http {
                status: Some(status.as_u16()),
                message: format!("audit insert failed: {}", body),
            });
        }

        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use tidewave_core::AuditLevel;

    fn sink_for(url: Option<String>) -> SupabaseAuditSink {
        let config = AuditConfig {
            url,
            key: Some("service-key".to_string()),
            ..AuditConfig::default()
        };
        SupabaseAuditSink::new(reqwest::Client::new(), &config)
    }

    fn entry() -> AuditEntry {
        AuditEntry::new(
            AuditLevel::Info,
            "mvp",
            serde_json::json!({ "hello": "world" }),
        )
    }

    #[tokio::test]
    async fn test_unconfigured_records_nothing() {
        let sink = sink_for(None);
        assert!(!sink.is_configured());
        assert!(sink.record(entry()).await.is_ok());
    }

    #[tokio::test]
    async fn test_inserts_row_with_headers() {
        let mut server = mockito::Server::new_async().await;
        let insert = server
            .mock("POST", "/rest/v1/ai_logs")
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "source": "orchestrator/api",
                "level": "info",
                "message": "mvp",
                "meta": { "hello": "world" },
            })))
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let sink = sink_for(Some(server.url()));
        assert!(sink.is_configured());
        sink.record(entry()).await.unwrap();

        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/ai_logs")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let err = sink_for(Some(server.url()))
            .record(entry())
            .await
            .unwrap_err();

        match err {
            TidewaveError::Http { status, message } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("invalid api key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
