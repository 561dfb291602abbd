use std::{str::FromStr, time::Duration};

use anyhow::Context;
use hireboard_core::board::ReconcilePolicy;
use hireboard_core::constants::{DEFAULT_API_URL, DEFAULT_SOCKET_URL};

/// Log output format selected by `HB_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{}'", other),
        }
    }
}

pub struct Config {
    pub api_url: String,
    pub socket_url: String,
    pub request_timeout: Duration,
    pub reconcile_policy: ReconcilePolicy,
    pub log_format: LogFormat,
    pub job_id: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup("HB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let socket_url = lookup("HB_SOCKET_URL").unwrap_or_else(|| DEFAULT_SOCKET_URL.into());
        let timeout_ms: u64 = lookup("HB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        let reconcile_policy = match lookup("HB_RECONCILE") {
            Some(raw) => raw.parse::<ReconcilePolicy>().context("Invalid HB_RECONCILE")?,
            None => ReconcilePolicy::default(),
        };
        let log_format = match lookup("HB_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().context("Invalid HB_LOG_FORMAT")?,
            None => LogFormat::default(),
        };
        let job_id = lookup("HB_JOB_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            api_url,
            socket_url,
            request_timeout: Duration::from_millis(timeout_ms),
            reconcile_policy,
            log_format,
            job_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:4000/api");
        assert_eq!(config.socket_url, "ws://localhost:4000/socket/websocket");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.reconcile_policy, ReconcilePolicy::RefetchOnFailure);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.job_id, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HB_API_URL", "https://jobs.example.com/api"),
            ("HB_REQUEST_TIMEOUT_MS", "1500"),
            ("HB_RECONCILE", "await-invalidation"),
            ("HB_LOG_FORMAT", "JSON"),
            ("HB_JOB_ID", " 42 "),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://jobs.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.reconcile_policy, ReconcilePolicy::AwaitInvalidation);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.job_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(config(&[("HB_RECONCILE", "rollback")]).is_err());
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = config(&[("HB_REQUEST_TIMEOUT_MS", "soon")]).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
