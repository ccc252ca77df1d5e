//! Asynchronous image directory client implementation.

use crate::directory::ImageDirectory;
use crate::filter::ImageFilter;
use crate::models::{CreateImageRequest, Image, ShareImageRequest};
use crate::Result;
use async_trait::async_trait;
use databench_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, IMAGE_DIRECTORY_DEFAULT_TIMEOUT,
};
use databench_core::config::ConsoleConfig;
use databench_core::types::BackendService;
use databench_core::Error;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("databench-images/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ImageDirectoryClient`].
#[derive(Debug, Clone)]
pub struct ImageDirectoryClientBuilder {
    inner: ServiceClientBuilder,
}

impl ImageDirectoryClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            base_url,
            Duration::from_secs(IMAGE_DIRECTORY_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a console configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured directory URL is invalid.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let mut builder = ServiceClientBuilder::new(
            BackendService::ImageDirectory,
            &config.directory_url,
            config.timeout(),
        )?
        .with_user_agent(USER_AGENT)
        .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries))
        .with_tls_verify(config.tls_verify);

        if let Some(token) = &config.access_token {
            builder = builder.with_token(token.expose_secret());
        }

        Ok(Self { inner: builder })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.inner = self.inner.with_tls_verify(verify);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Configure a bearer access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ImageDirectoryClient> {
        let inner = self.inner.build()?;
        Ok(ImageDirectoryClient { inner })
    }
}

/// Asynchronous client for the image directory service.
#[derive(Debug, Clone)]
pub struct ImageDirectoryClient {
    inner: ServiceClient,
}

impl ImageDirectoryClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ImageDirectoryClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Returns true if the client verifies TLS certificates.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.inner.tls_verify()
    }

    /// List the requesting user's images, own and received.
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        self.send_json::<(), Vec<Image>>(Method::GET, "api/image", None)
            .await
    }

    /// List the requesting user's images with a filter applied server-side.
    pub async fn list_images_filtered(&self, filter: &ImageFilter) -> Result<Vec<Image>> {
        self.send_json(Method::POST, "api/image/filter", Some(filter))
            .await
    }

    /// Fetch a single image by its coordinates.
    pub async fn fetch_image(&self, project: &str, endpoint: &str, name: &str) -> Result<Image> {
        let path = format!("api/image/{project}/{endpoint}/{name}");
        self.send_json::<(), Image>(Method::GET, &path, None).await
    }

    /// Create an image from a running instance.
    ///
    /// Returns the provisioning request identifier issued by the directory
    /// service.
    pub async fn request_image_creation(&self, request: &CreateImageRequest) -> Result<String> {
        let response = self
            .inner
            .execute_with_retry(
                Method::POST,
                "api/image",
                &[],
                |req| req.json(request),
                map_status_to_error,
            )
            .await?;

        response.text().await.map_err(Error::from)
    }

    /// Share an image with all users of its project.
    pub async fn share_image_all_users(&self, image: &Image) -> Result<()> {
        let request = ShareImageRequest::from_image(image);
        self.inner
            .execute_with_retry(
                Method::POST,
                "api/image/share",
                &[],
                |req| req.json(&request),
                map_status_to_error,
            )
            .await
            .map(|_| ())
    }

    /// Terminate an image.
    pub async fn request_image_termination(
        &self,
        project: &str,
        endpoint: &str,
        name: &str,
    ) -> Result<()> {
        let path = format!("api/image/{project}/{endpoint}/{name}");
        self.inner
            .execute_with_retry(
                Method::DELETE,
                &path,
                &[],
                |request| request,
                map_status_to_error,
            )
            .await
            .map(|_| ())
    }

    async fn send_json<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute_with_retry(
                method,
                path,
                &[],
                |mut request| {
                    request = request.header("Accept", "application/json");
                    if let Some(payload) = body {
                        request = request.json(payload);
                    }
                    request
                },
                map_status_to_error,
            )
            .await?;

        response.json::<R>().await.map_err(Error::from)
    }
}

#[async_trait]
impl ImageDirectory for ImageDirectoryClient {
    async fn share_with_all_users(&self, image: &Image) -> Result<()> {
        self.share_image_all_users(image).await
    }

    async fn get_user_images(&self) -> Result<Vec<Image>> {
        self.list_images().await
    }

    async fn get_image(&self, project: &str, endpoint: &str, name: &str) -> Result<Image> {
        self.fetch_image(project, endpoint, name).await
    }

    async fn create_image(&self, request: &CreateImageRequest) -> Result<String> {
        self.request_image_creation(request).await
    }

    async fn terminate_image(&self, project: &str, endpoint: &str, name: &str) -> Result<()> {
        self.request_image_termination(project, endpoint, name)
            .await
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized(format!("image directory authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::AlreadyExists(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("image directory temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("image directory server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("image directory error {status}: {text}")),
    }
}
