//! HTTP client utilities and retry logic.
//!
//! This module provides the shared HTTP plumbing for console service clients:
//! retry policies with exponential backoff, connection pool configuration, and
//! the [`ServiceClient`] wrapper the client crates build on.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::BackendService;

// Service-specific timeout configurations (in seconds)

/// Default timeout for image directory requests
pub const IMAGE_DIRECTORY_DEFAULT_TIMEOUT: u64 = 20;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

/// Retry policy with exponential backoff.
///
/// Configures how HTTP requests should be retried on failure, using exponential
/// backoff to avoid overwhelming failing services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay_ms = self.initial_delay.as_millis() as u64 * u64::from(multiplier);
        let delay = Duration::from_millis(delay_ms);

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts, retries, and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify TLS certificates
    pub tls_verify: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            tls_verify: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: BackendService,
    base_url: String,
    http_config: ClientConfig,
    user_agent: Option<String>,
    basic_auth: Option<(String, SecretString)>,
    token: Option<SecretString>,
}

impl ServiceClientBuilder {
    /// Create a builder for a service with the given base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(
        service: BackendService,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        // Parse eagerly so a bad URL fails at build time, not per request.
        Url::parse(base_url.as_ref())?;
        Ok(Self {
            service,
            base_url: base_url.as_ref().to_string(),
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: None,
            basic_auth: None,
            token: None,
        })
    }

    /// Set the User-Agent header for all requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.http_config.tls_verify = verify;
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((username.into(), SecretString::from(password.into())));
        self
    }

    /// Configure a bearer access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let base_url = Url::parse(&self.base_url)?;

        let mut builder = reqwest::Client::builder()
            .timeout(self.http_config.timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression)
            .danger_accept_invalid_certs(!self.http_config.tls_verify);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(ServiceClient {
            service: self.service,
            base_url,
            http,
            retry_policy: self.http_config.retry_policy,
            tls_verify: self.http_config.tls_verify,
            basic_auth: self.basic_auth,
            token: self.token,
        })
    }
}

/// HTTP client for a single backend service.
///
/// Wraps a pooled [`reqwest::Client`] with the service's base URL,
/// authentication, request tagging, and retry behavior.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: BackendService,
    base_url: Url,
    http: reqwest::Client,
    retry_policy: RetryPolicy,
    tls_verify: bool,
    basic_auth: Option<(String, SecretString)>,
    token: Option<SecretString>,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the backend service this client targets.
    #[must_use]
    pub const fn service(&self) -> BackendService {
        self.service
    }

    /// Returns true if the client verifies TLS certificates.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Execute a request, retrying retryable failures per the retry policy.
    ///
    /// `customize` is applied to every attempt's request builder; `map_error`
    /// converts a non-success status and response body into an [`Error`].
    /// Each attempt carries a fresh `X-Request-Id` for log correlation.
    ///
    /// # Errors
    ///
    /// Returns the mapped error from the last attempt when all retries are
    /// exhausted, or immediately for non-retryable errors.
    pub async fn execute_with_retry<F, M>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        customize: F,
        map_error: M,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
        M: Fn(StatusCode, String) -> Error,
    {
        let url = self.base_url.join(path)?;
        let mut last_error = Error::InternalError("request was never attempted".to_string());

        for attempt in 0..=self.retry_policy.max_retries {
            let delay = self.retry_policy.delay_for_attempt(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let request_id = Uuid::new_v4();
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header("X-Request-Id", request_id.to_string());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some((username, password)) = &self.basic_auth {
                request = request.basic_auth(username, Some(password.expose_secret()));
            }
            if let Some(token) = &self.token {
                request = request.bearer_auth(token.expose_secret());
            }
            let request = customize(request);

            tracing::debug!(
                service = self.service.name(),
                %method,
                path,
                %request_id,
                attempt,
                "sending request"
            );

            let error = match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    map_error(status, text)
                }
                Err(err) => Error::from(err),
            };

            if error.is_retryable() && attempt < self.retry_policy.max_retries {
                tracing::warn!(
                    service = self.service.name(),
                    path,
                    %request_id,
                    attempt,
                    error = %error,
                    "request failed, retrying"
                );
                last_error = error;
            } else {
                return Err(error);
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_timeout_constants() {
        assert_eq!(IMAGE_DIRECTORY_DEFAULT_TIMEOUT, 20);
    }

    #[test]
    fn test_retry_policy_new() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(
            policy.initial_delay,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS)
        );
        assert_eq!(
            policy.max_delay,
            Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS)
        );
        assert_eq!(policy.backoff_multiplier, 2);
    }

    #[test]
    fn test_retry_policy_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_retries, 0);
        assert!(!policy.has_retries());
    }

    #[test]
    fn test_retry_policy_builder() {
        let policy = RetryPolicy::new()
            .with_max_retries(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(10))
            .with_backoff_multiplier(3);

        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(policy.backoff_multiplier, 3);
    }

    #[test]
    fn test_retry_policy_delay_calculation() {
        let policy = RetryPolicy::new();

        // Attempt 0 should return 0
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(0));

        // Attempt 1: initial_delay * 2^0 = 500ms
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));

        // Attempt 2: initial_delay * 2^1 = 1000ms
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));

        // Attempt 3: initial_delay * 2^2 = 2000ms
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2000));

        // Attempt 5: would be 8000ms but capped at max_delay (5000ms)
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(5000));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_retry_policy(RetryPolicy::no_retry())
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false)
            .with_tls_verify(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry_policy.max_retries, 0);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_client_config_verifies_tls_by_default() {
        assert!(ClientConfig::new().tls_verify);
    }

    #[test]
    fn test_client_config_without_retries() {
        let config = ClientConfig::new().without_retries();
        assert_eq!(config.retry_policy.max_retries, 0);
    }

    #[test]
    fn test_builder_applies_tls_verify() {
        let client = ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            "https://self-signed.example.com",
            Duration::from_secs(5),
        )
        .unwrap()
        .with_tls_verify(false)
        .build()
        .unwrap();
        assert!(!client.tls_verify());

        let client = ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            "https://console.example.com",
            Duration::from_secs(5),
        )
        .unwrap()
        .build()
        .unwrap();
        assert!(client.tls_verify());
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            "not a url",
            Duration::from_secs(5),
        );
        assert!(result.is_err());
    }

    fn test_client(server: &MockServer, retry: RetryPolicy) -> ServiceClient {
        ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            server.uri(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_policy(retry.with_initial_delay(Duration::from_millis(1)))
        .build()
        .unwrap()
    }

    fn map_error(status: StatusCode, text: String) -> Error {
        if status.is_server_error() {
            Error::ServiceUnavailable(text)
        } else {
            Error::HttpError(text)
        }
    }

    #[tokio::test]
    async fn execute_returns_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::no_retry());
        let response = client
            .execute_with_retry(Method::GET, "ping", &[], |r| r, map_error)
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn execute_retries_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::new().with_max_retries(3));
        let response = client
            .execute_with_retry(Method::GET, "flaky", &[], |r| r, map_error)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn execute_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::new().with_max_retries(3));
        let err = client
            .execute_with_retry(Method::GET, "missing", &[], |r| r, map_error)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
    }
}
