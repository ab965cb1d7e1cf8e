//! Shared HTTP plumbing for the REST adapters
//!
//! One [`RestService`] per remote collaborator: it owns the `reqwest`
//! client, builds URLs against the service's base, and maps transport and
//! HTTP status failures onto [`PortError`] uniformly so the domain layer
//! classifies every remote the same way.

use std::time::{Duration, Instant};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use core_kernel::{HealthCheckResult, PortError};

/// Connection settings for one remote service
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Service base URL without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestClientConfig {
    /// Creates a config with the default 30 second timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP access to one remote service
#[derive(Debug, Clone)]
pub(crate) struct RestService {
    service: &'static str,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RestService {
    pub(crate) fn new(service: &'static str, config: RestClientConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                PortError::internal(format!("HTTP client construction failed: {error}"))
            })?;
        Ok(Self {
            service,
            client,
            base_url: config.base_url,
            timeout: config.timeout,
        })
    }

    pub(crate) fn service(&self) -> &'static str {
        self.service
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
    ) -> Result<T, PortError> {
        let url = self.url(path);
        debug!(service = self.service, %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| self.transport_error(operation, error))?;
        let response = self.ensure_success(operation, path, response)?;
        response
            .json()
            .await
            .map_err(|error| self.transport_error(operation, error))
    }

    pub(crate) async fn post_json<B, T>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<T, PortError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(service = self.service, %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| self.transport_error(operation, error))?;
        let response = self.ensure_success(operation, path, response)?;
        response
            .json()
            .await
            .map_err(|error| self.transport_error(operation, error))
    }

    /// POST where the caller only cares that the call succeeded
    pub(crate) async fn post_unit<B>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<(), PortError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(service = self.service, %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| self.transport_error(operation, error))?;
        self.ensure_success(operation, path, response)?;
        Ok(())
    }

    pub(crate) async fn put_json<B, T>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<T, PortError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(service = self.service, %url, "PUT");
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| self.transport_error(operation, error))?;
        let response = self.ensure_success(operation, path, response)?;
        response
            .json()
            .await
            .map_err(|error| self.transport_error(operation, error))
    }

    /// One-shot reachability probe against the service's health endpoint
    pub(crate) async fn probe(&self, path: &str) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.client.get(self.url(path)).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) if response.status().is_success() => {
                HealthCheckResult::healthy(self.service, latency_ms)
            }
            Ok(response) => HealthCheckResult::unhealthy(
                self.service,
                latency_ms,
                format!("probe returned {}", response.status()),
            ),
            Err(error) => HealthCheckResult::unhealthy(self.service, latency_ms, error.to_string()),
        }
    }

    fn ensure_success(
        &self,
        operation: &str,
        path: &str,
        response: Response,
    ) -> Result<Response, PortError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(0);
            return Err(PortError::RateLimited { retry_after_secs });
        }
        Err(self.status_error(operation, path, status))
    }

    fn status_error(&self, operation: &str, path: &str, status: StatusCode) -> PortError {
        match status {
            StatusCode::NOT_FOUND => PortError::NotFound {
                entity_type: self.service.to_string(),
                id: path.to_string(),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                PortError::validation(format!("{} rejected the {} payload", self.service, operation))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
                message: format!("{} rejected {}", self.service, operation),
            },
            StatusCode::REQUEST_TIMEOUT => PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            },
            status if status.is_server_error() => PortError::ServiceUnavailable {
                service: self.service.to_string(),
            },
            status => PortError::internal(format!(
                "{} returned unexpected status {status} for {operation}",
                self.service
            )),
        }
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if error.is_decode() {
            PortError::serialization(format!("{} response decode failed: {error}", self.service))
        } else {
            PortError::Connection {
                message: format!("{} unreachable: {error}", self.service),
                source: Some(Box::new(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RestService {
        RestService::new("claim-store", RestClientConfig::new("http://localhost:9000")).unwrap()
    }

    #[test]
    fn test_config_trims_trailing_slashes() {
        let config = RestClientConfig::new("http://localhost:9000///");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_url_joins_base_and_path() {
        assert_eq!(
            service().url("/claims/auto/7"),
            "http://localhost:9000/claims/auto/7"
        );
    }

    #[test]
    fn test_status_mapping() {
        let rest = service();

        assert!(rest
            .status_error("get", "/claims/auto/7", StatusCode::NOT_FOUND)
            .is_not_found());
        assert!(matches!(
            rest.status_error("create", "/x", StatusCode::BAD_REQUEST),
            PortError::Validation { .. }
        ));
        assert!(matches!(
            rest.status_error("get", "/x", StatusCode::UNAUTHORIZED),
            PortError::Unauthorized { .. }
        ));
        assert!(matches!(
            rest.status_error("get", "/x", StatusCode::FORBIDDEN),
            PortError::Unauthorized { .. }
        ));
        assert!(matches!(
            rest.status_error("get", "/x", StatusCode::REQUEST_TIMEOUT),
            PortError::Timeout { .. }
        ));
        assert!(matches!(
            rest.status_error("get", "/x", StatusCode::BAD_GATEWAY),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(rest
            .status_error("get", "/x", StatusCode::INTERNAL_SERVER_ERROR)
            .is_transient());
    }

    #[test]
    fn test_unexpected_status_is_internal() {
        let error = service().status_error("get", "/x", StatusCode::IM_A_TEAPOT);
        assert!(matches!(error, PortError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_probe_reports_unreachable_service_as_unhealthy() {
        // Nothing listens on port 1; the connection is refused immediately.
        let config =
            RestClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let rest = RestService::new("claim-store", config).unwrap();

        let result = rest.probe("/health").await;
        assert!(!result.is_healthy());
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn test_get_against_unreachable_service_is_connection_error() {
        let config =
            RestClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let rest = RestService::new("claim-store", config).unwrap();

        let error = rest
            .get_json::<serde_json::Value>("get_claim_by_id", "/claims/auto/7")
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            PortError::Connection { .. } | PortError::Timeout { .. }
        ));
    }
}
