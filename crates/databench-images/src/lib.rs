//! Image directory client and data models for the Databench console.
//!
//! Provides strongly typed models, the [`ImageDirectory`] service contract,
//! and an asynchronous client for the self-service image directory API.

#![deny(missing_docs)]

pub mod client;
pub mod directory;
pub mod filter;
pub mod models;
pub mod permissions;

pub use client::{ImageDirectoryClient, ImageDirectoryClientBuilder};
pub use directory::ImageDirectory;
pub use filter::{filter_images, ImageFilter, ImageFilterFormData};
pub use models::{
    group_by_project, CreateImageRequest, Image, ImageSharingStatus, ImageStatus, ProjectImages,
    ShareImageRequest,
};
pub use permissions::{user_image_permissions, ImageUserPermissions, PageAccess};

/// Convenient result alias using the shared console error type.
pub type Result<T> = databench_core::Result<T>;
