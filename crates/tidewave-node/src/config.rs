//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;
use tidewave_core::config::{non_blank, self_health_url, DEFAULT_APP_NAME};
use tidewave_core::{Config, DeployConfig, Result, TidewaveError};

/// Tidewave orchestrator node.
///
/// Every option can also be set through the environment variable named
/// next to it. Blank values count as unset.
#[derive(Debug, Clone, Parser)]
#[command(name = "tidewave-node", version, about)]
pub struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Service name reported by /health and /ping.
    #[arg(long, env = "APP_NAME", default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    #[arg(long, env = "ANTHROPIC_API_URL")]
    pub anthropic_api_url: Option<String>,

    #[arg(long, env = "ANTHROPIC_API_VERSION")]
    pub anthropic_api_version: Option<String>,

    /// Instructions longer than this many characters use the escalated model.
    #[arg(long, env = "LLM_PROMOTION_THRESHOLD")]
    pub llm_promotion_threshold: Option<usize>,

    #[arg(long, env = "LLM_MAX_TOKENS")]
    pub llm_max_tokens: Option<u32>,

    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    #[arg(long, env = "LLM_ESCALATED_MODEL")]
    pub llm_escalated_model: Option<String>,

    #[arg(long, env = "LLM_TIMEOUT_SECS")]
    pub llm_timeout_secs: Option<u64>,

    /// First redeploy webhook.
    #[arg(long, env = "VERCEL_HOOK_1")]
    pub vercel_hook_1: Option<String>,

    /// Second redeploy webhook.
    #[arg(long, env = "VERCEL_HOOK_2")]
    pub vercel_hook_2: Option<String>,

    #[arg(long, env = "WEBHOOK_TIMEOUT_SECS")]
    pub webhook_timeout_secs: Option<u64>,

    /// Health endpoint probed after deploys. Defaults to this node's /health.
    #[arg(long, env = "API_HEALTH")]
    pub api_health: Option<String>,

    #[arg(long, env = "HEALTH_TIMEOUT_SECS")]
    pub health_timeout_secs: Option<u64>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    #[arg(long, env = "AI_LOGS_TABLE")]
    pub ai_logs_table: Option<String>,

    #[arg(long, env = "AUDIT_TIMEOUT_SECS")]
    pub audit_timeout_secs: Option<u64>,

    #[arg(long, env = "DAILY_TOKEN_BUDGET")]
    pub daily_token_budget: Option<u64>,

    #[arg(long, env = "MONTHLY_TOKEN_BUDGET")]
    pub monthly_token_budget: Option<u64>,
}

impl Args {
    /// Resolve `HOST`/`PORT` to the address to bind. Accepts IP literals
    /// of either family and host names.
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let invalid = |reason: String| {
            TidewaveError::Config(format!("invalid HOST {:?}: {}", self.host, reason))
        };

        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no address found".to_string()))
    }

    /// Resolve the bind address, then the configuration for it.
    pub async fn load(self) -> Result<(SocketAddr, Config)> {
        let addr = self.resolve_addr().await?;
        let config = self.into_config(addr)?;
        Ok((addr, config))
    }

    /// Build the shared configuration for a node bound to `bound`,
    /// validating every URL.
    pub fn into_config(self, bound: SocketAddr) -> Result<Config> {
        let app_name = non_blank(Some(self.app_name)).unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let mut config = Config::named(app_name);

        let llm = &mut config.llm;
        llm.api_key = non_blank(self.anthropic_api_key);
        if let Some(url) = non_blank(self.anthropic_api_url) {
            llm.api_url = url;
        }
        if let Some(version) = non_blank(self.anthropic_api_version) {
            llm.api_version = version;
        }
        if let Some(model) = non_blank(self.llm_model) {
            llm.model = model;
        }
        if let Some(model) = non_blank(self.llm_escalated_model) {
            llm.escalated_model = model;
        }
        if let Some(threshold) = self.llm_promotion_threshold {
            llm.promotion_threshold = threshold;
        }
        if let Some(max_tokens) = self.llm_max_tokens {
            llm.max_tokens = max_tokens;
        }
        if let Some(secs) = self.llm_timeout_secs {
            llm.timeout_secs = secs;
        }

        let deploy_timeout = self
            .webhook_timeout_secs
            .unwrap_or(config.deploy.timeout_secs);
        config.deploy = DeployConfig::from_urls([self.vercel_hook_1, self.vercel_hook_2]);
        config.deploy.timeout_secs = deploy_timeout;

        config.health.url = non_blank(self.api_health);
        config.health.fallback_url = self_health_url(bound);
        if let Some(secs) = self.health_timeout_secs {
            config.health.timeout_secs = secs;
        }

        config.audit.url = non_blank(self.supabase_url);
        config.audit.key = non_blank(self.supabase_key);
        if let Some(table) = non_blank(self.ai_logs_table) {
            config.audit.table = table;
        }
        if let Some(secs) = self.audit_timeout_secs {
            config.audit.timeout_secs = secs;
        }

        if let Some(daily) = self.daily_token_budget {
            config.budgets.daily_tokens = daily;
        }
        if let Some(monthly) = self.monthly_token_budget {
            config.budgets.monthly_tokens = monthly;
        }

        validate(&config)?;
        Ok(config)
    }
}

/// Reject configured URLs that are not absolute http(s) URLs.
pub fn validate(config: &Config) -> Result<()> {
    check_url("ANTHROPIC_API_URL", &config.llm.api_url)?;
    for hook in &config.deploy.hooks {
        if let Some(url) = &hook.url {
            check_url(&hook.name, url)?;
        }
    }
    if let Some(url) = &config.health.url {
        check_url("API_HEALTH", url)?;
    }
    if let Some(url) = &config.audit.url {
        check_url("SUPABASE_URL", url)?;
    }
    Ok(())
}

fn check_url(name: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| TidewaveError::Config(format!("{} is not a valid URL ({}): {}", name, e, value)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TidewaveError::Config(format!(
            "{} must be http or https, got {}",
            name, scheme
        ))),
    }
}
