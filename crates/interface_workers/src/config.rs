//! Worker configuration

use std::time::Duration;

use serde::Deserialize;

use infra_queue::PollerConfig;
use infra_rest::RestClientConfig;

/// Worker host configuration
///
/// Every collaborator URL is optional: a missing URL leaves that port
/// unconfigured and the owning services degrade to empty results instead of
/// failing. Only the task queue URL is required, checked at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// External task queue base URL (required)
    pub queue_url: Option<String>,
    /// Claim store base URL
    pub claims_url: Option<String>,
    /// Customer directory base URL
    pub customers_url: Option<String>,
    /// Policy directory base URL
    pub policies_url: Option<String>,
    /// Employee directory base URL (adjuster pool)
    pub employees_url: Option<String>,
    /// Notification gateway base URL
    pub notifications_url: Option<String>,
    /// Maximum tasks fetched per poll
    pub max_tasks: u32,
    /// Queue-side lock duration per fetched task, in seconds
    pub lock_duration_secs: u64,
    /// Pause between polls of an idle topic, in seconds
    pub poll_interval_secs: u64,
    /// Per-request timeout against the remote services, in seconds
    pub request_timeout_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_url: None,
            claims_url: None,
            customers_url: None,
            policies_url: None,
            employees_url: None,
            notifications_url: None,
            max_tasks: 10,
            lock_duration_secs: 30,
            poll_interval_secs: 5,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Loads configuration from `CLAIMS_WORKER_*` environment variables
    ///
    /// Unset variables keep their defaults; only malformed values fail.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS_WORKER").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The poller settings shared by every topic loop
    pub fn poller(&self) -> PollerConfig {
        PollerConfig {
            max_tasks: self.max_tasks,
            lock_duration: Duration::from_secs(self.lock_duration_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    /// REST client settings for one remote service URL
    pub fn rest(&self, base_url: &str) -> RestClientConfig {
        RestClientConfig::new(base_url)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_ports_unconfigured() {
        let config = WorkerConfig::default();
        assert!(config.queue_url.is_none());
        assert!(config.claims_url.is_none());
        assert_eq!(config.max_tasks, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_poller_settings_carry_over() {
        let config = WorkerConfig {
            max_tasks: 3,
            lock_duration_secs: 60,
            poll_interval_secs: 2,
            ..WorkerConfig::default()
        };
        let poller = config.poller();
        assert_eq!(poller.max_tasks, 3);
        assert_eq!(poller.lock_duration, Duration::from_secs(60));
        assert_eq!(poller.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_rest_settings_apply_timeout() {
        let config = WorkerConfig {
            request_timeout_secs: 5,
            ..WorkerConfig::default()
        };
        let rest = config.rest("http://claims.internal:8080/");
        assert_eq!(rest.base_url, "http://claims.internal:8080");
        assert_eq!(rest.timeout, Duration::from_secs(5));
    }
}
