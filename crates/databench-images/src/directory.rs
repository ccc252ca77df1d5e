//! The image directory service contract.
//!
//! The directory service owns image records and the persistence of their
//! sharing state. Console components depend on this trait rather than the
//! HTTP client directly, so collaborators can be injected at construction.

use crate::models::{CreateImageRequest, Image};
use crate::Result;

/// Operations exposed by the image directory service.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageDirectory: Send + Sync {
    /// Share an image with all users of its project.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory service rejects the request or is
    /// unreachable.
    async fn share_with_all_users(&self, image: &Image) -> Result<()>;

    /// List the requesting user's images, own and received.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory service is unreachable.
    async fn get_user_images(&self) -> Result<Vec<Image>>;

    /// Fetch a single image by its coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`databench_core::Error::NotFound`] if no such image exists.
    async fn get_image(&self, project: &str, endpoint: &str, name: &str) -> Result<Image>;

    /// Create an image from a running instance.
    ///
    /// Returns the provisioning request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`databench_core::Error::AlreadyExists`] when an image with the
    /// same name already exists in the project.
    async fn create_image(&self, request: &CreateImageRequest) -> Result<String>;

    /// Terminate an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image does not exist or termination fails.
    async fn terminate_image(&self, project: &str, endpoint: &str, name: &str) -> Result<()>;
}
