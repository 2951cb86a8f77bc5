//! Redeploy through deploy-hook URLs.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tidewave_core::{DeployConfig, DeployReport, TargetStatus, WebhookTarget};
use tidewave_dispatch::Deployer;
use tracing::{debug, warn};

use crate::transport_error;

/// Calls every configured deploy hook concurrently.
#[derive(Clone)]
pub struct WebhookDeployer {
    client: reqwest::Client,
    hooks: Vec<WebhookTarget>,
    timeout: Duration,
}

impl WebhookDeployer {
    pub fn new(client: reqwest::Client, config: &DeployConfig) -> Self {
        Self {
            client,
            hooks: config.hooks.clone(),
            timeout: config.timeout(),
        }
    }

    async fn trigger(&self, hook: &WebhookTarget) -> TargetStatus {
        let Some(url) = hook.url.as_deref() else {
            return TargetStatus::NotConfigured;
        };

        match self.client.post(url).timeout(self.timeout).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                debug!(hook = %hook.name, code, "deploy hook answered");
                TargetStatus::Status { code }
            }
            Err(err) => {
                let err = transport_error(err, self.timeout);
                warn!(
                    hook = %hook.name,
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "deploy hook call failed"
                );
                TargetStatus::Error {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl Deployer for WebhookDeployer {
    async fn redeploy(&self) -> DeployReport {
        let calls = self.hooks.iter().map(|hook| async move {
            let status = self.trigger(hook).await;
            (hook.name.clone(), status)
        });

        let mut report = DeployReport::new();
        for (name, status) in join_all(calls).await {
            report.insert(name, status);
        }
        report
    }
}
