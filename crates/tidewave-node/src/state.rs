//! Application state.

use std::sync::Arc;

use tidewave_core::{Config, Result};
use tidewave_dispatch::{AuditSink, Dispatcher, EscalationPolicy};
use tidewave_http::{
    shared_client, AnthropicClient, HttpHealthProbe, SupabaseAuditSink, WebhookDeployer,
};

use crate::engine::Engine;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration.
    pub config: Arc<Config>,

    /// Runs orchestrations and audit logging.
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Create state from explicit parts.
    pub fn new(config: Config, dispatcher: Dispatcher, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(Engine::new(dispatcher, audit)),
        }
    }

    /// Wire the HTTP integrations over one pooled client.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = shared_client()?;

        let dispatcher = Dispatcher::new(
            Arc::new(WebhookDeployer::new(client.clone(), &config.deploy)),
            Arc::new(HttpHealthProbe::new(client.clone(), &config.health)),
            Arc::new(AnthropicClient::new(client.clone(), config.llm.clone())),
            EscalationPolicy::from_config(&config.llm),
        );
        let audit = Arc::new(SupabaseAuditSink::new(client, &config.audit));

        Ok(Self::new(config, dispatcher, audit))
    }
}
