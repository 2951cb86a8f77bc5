//! LLM completions over the Anthropic messages API.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tidewave_core::{ActionResult, LlmConfig, Step};
use tidewave_dispatch::Completion;
use tracing::{debug, info};

use crate::{body_read_failure, transport_error};

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

/// Completion backed by `POST {api_url}/v1/messages`.
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl AnthropicClient {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Completion for AnthropicClient {
    async fn complete(&self, prompt: &str, escalate: bool) -> ActionResult {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return ActionResult::not_configured(Step::Complete, "anthropic");
        };

        let model = self.config.model_for(escalate);
        let request = MessagesRequest {
            model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        info!(model, escalate, "requesting completion");
        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.config.timeout())
            .header("x-api-key", api_key)
            .header("anthropic-version", self.config.api_version.as_str())
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                let err = transport_error(err, self.config.timeout());
                return ActionResult::from_error(Step::Complete, &err);
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                return body_read_failure(Step::Complete, status, err, self.config.timeout())
                    .with_payload(json!({ "model": model }))
            }
        };
        let raw = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
            debug!(status, "completion body is not JSON");
            json!({ "status_code": status, "text": text })
        });

        ActionResult::from_status(Step::Complete, status)
            .with_success(status == 200 || status == 201)
            .with_payload(json!({ "model": model, "raw": raw }))
    }
}
