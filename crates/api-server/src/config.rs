use anyhow::Context;
use market_data::{DEFAULT_FMP_BASE_URL, DEFAULT_YAHOO_CHART_URL};
use std::net::SocketAddr;
use std::time::Duration;

use crate::session_store::DEFAULT_SESSION_IDLE;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Server settings read from the environment (and `.env`, when present)
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub fmp_api_key: Option<String>,
    pub fmp_base_url: String,
    pub yahoo_chart_url: String,
    /// `None` leaves provider requests without a client-side timeout
    pub http_timeout: Option<Duration>,
    /// Sessions untouched for this long are dropped
    pub session_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let http_timeout = var("HTTP_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>().context("HTTP_TIMEOUT_SECS must be a whole number of seconds"))
            .transpose()?
            .map(Duration::from_secs);

        let session_idle = var("SESSION_IDLE_SECS")
            .map(|v| v.parse::<u64>().context("SESSION_IDLE_SECS must be a whole number of seconds"))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_IDLE);

        Ok(Self {
            bind_addr,
            fmp_api_key: var("FMP_API_KEY"),
            fmp_base_url: var("FMP_BASE_URL").unwrap_or_else(|| DEFAULT_FMP_BASE_URL.to_string()),
            yahoo_chart_url: var("YAHOO_CHART_URL").unwrap_or_else(|| DEFAULT_YAHOO_CHART_URL.to_string()),
            http_timeout,
            session_idle,
        })
    }
}
