//! Startup configuration.
//!
//! Built once when the node starts and shared read-only by every component.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

/// Service name reported by `/health` and `/ping`.
pub const DEFAULT_APP_NAME: &str = "tidewave-orchestrator";

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name.
    pub app_name: String,

    /// LLM completion settings.
    pub llm: LlmConfig,

    /// Redeploy webhook settings.
    pub deploy: DeployConfig,

    /// Health probe settings.
    pub health: HealthConfig,

    /// Audit log sink settings.
    pub audit: AuditConfig,

    /// Advertised token budgets.
    pub budgets: Budgets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            llm: LlmConfig::default(),
            deploy: DeployConfig::default(),
            health: HealthConfig::default(),
            audit: AuditConfig::default(),
            budgets: Budgets::default(),
        }
    }
}

impl Config {
    /// Default configuration with the given service name.
    pub fn named(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }
}

/// Settings for the LLM completion action.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key. `None` disables the action.
    pub api_key: Option<String>,

    /// Base URL of the messages API.
    pub api_url: String,

    /// Value of the `anthropic-version` header.
    pub api_version: String,

    /// Instructions longer than this many characters use the escalated model.
    pub promotion_threshold: usize,

    /// Maximum output tokens per call.
    pub max_tokens: u32,

    /// Model used by default.
    pub model: String,

    /// Model used for critical or long instructions.
    pub escalated_model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            promotion_threshold: 120,
            max_tokens: 512,
            model: "claude-3-5-haiku-20240307".to_string(),
            escalated_model: "claude-3-5-sonnet-20240620".to_string(),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Model to use for the given escalation decision.
    pub fn model_for(&self, escalate: bool) -> &str {
        if escalate {
            &self.escalated_model
        } else {
            &self.model
        }
    }
}

/// One redeploy webhook slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    /// Stable name used as the key in deploy reports.
    pub name: String,

    /// Webhook URL. `None` means the slot is empty.
    pub url: Option<String>,
}

/// Settings for the redeploy action.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Webhook slots, called on every redeploy.
    pub hooks: Vec<WebhookTarget>,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::from_urls([None, None])
    }
}

impl DeployConfig {
    /// Build slots named `hook1`, `hook2`, ... from optional URLs.
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let hooks = urls
            .into_iter()
            .enumerate()
            .map(|(idx, url)| WebhookTarget {
                name: format!("hook{}", idx + 1),
                url: non_blank(url),
            })
            .collect();

        Self {
            hooks,
            timeout_secs: 20,
        }
    }

    /// Returns true if any slot has a URL.
    pub fn is_configured(&self) -> bool {
        self.hooks.iter().any(|h| h.url.is_some())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the health probe.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Explicitly configured health endpoint.
    pub url: Option<String>,

    /// Endpoint probed when `url` is unset; normally this service's own `/health`.
    pub fallback_url: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            url: None,
            fallback_url: self_health_url(SocketAddr::from(([127, 0, 0, 1], 8000))),
            timeout_secs: 10,
        }
    }
}

impl HealthConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// The URL the probe will GET.
    pub fn target(&self) -> &str {
        self.url.as_deref().unwrap_or(self.fallback_url.as_str())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Health URL of a service bound to `bound`.
///
/// Wildcard binds are reached through loopback of the same family.
pub fn self_health_url(bound: SocketAddr) -> String {
    let ip = match bound.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}/health", SocketAddr::new(ip, bound.port()))
}

/// Settings for the remote audit table.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Base URL of the database REST API.
    pub url: Option<String>,

    /// Service key for the REST API.
    pub key: Option<String>,

    /// Table receiving audit rows.
    pub table: String,

    /// Insert timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: "ai_logs".to_string(),
            timeout_secs: 15,
        }
    }
}

impl AuditConfig {
    /// Both URL and key are required.
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.key.is_some()
    }

    /// REST endpoint for inserts into the audit table.
    pub fn insert_url(&self) -> Option<String> {
        self.url
            .as_deref()
            .map(|url| format!("{}/rest/v1/{}", url.trim_end_matches('/'), self.table))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Token budgets. Advertised on `/ops`, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub daily_tokens: u64,
    pub monthly_tokens: u64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            daily_tokens: 3_000,
            monthly_tokens: 80_000,
        }
    }
}

/// Treat blank values as unset and trim the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
