//! Image directory models shared by the client and the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageStatus {
    /// Image is being created from a running instance.
    Creating,
    /// Image is ready to use.
    Active,
    /// Image creation failed.
    Failed,
    /// Image termination has been requested.
    Terminating,
    /// Image has been terminated.
    Terminated,
}

impl ImageStatus {
    /// Return the wire representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
        }
    }
}

/// Sharing visibility of an image, relative to the requesting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageSharingStatus {
    /// Visible only to its creator.
    Private,
    /// Shared by the requesting user with others.
    Shared,
    /// Shared with the requesting user by someone else.
    Received,
}

impl ImageSharingStatus {
    /// Return the wire representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Shared => "SHARED",
            Self::Received => "RECEIVED",
        }
    }
}

/// An image record as returned by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project the image belongs to.
    pub project: String,
    /// Endpoint the image was created on.
    pub endpoint: String,
    /// Name of the user who created the image.
    pub user: String,
    /// Cloud provider hosting the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    /// Base docker image of the source instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// Template the source instance was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    /// Name of the source instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: ImageStatus,
    /// Sharing visibility, computed by the directory service per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_status: Option<ImageSharingStatus>,
}

/// Request payload for sharing an image with all users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareImageRequest {
    /// Name of the image to share.
    pub image_name: String,
    /// Project the image belongs to.
    pub project_name: String,
    /// Endpoint the image lives on.
    pub endpoint: String,
}

impl ShareImageRequest {
    /// Build the request from an image record.
    #[must_use]
    pub fn from_image(image: &Image) -> Self {
        Self {
            image_name: image.name.clone(),
            project_name: image.project.clone(),
            endpoint: image.endpoint.clone(),
        }
    }
}

/// Request payload for creating an image from a running instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
    /// Project of the source instance.
    pub project_name: String,
    /// Name of the source instance.
    pub exploratory_name: String,
    /// Name for the new image.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Images of a single project, as grouped on the images page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImages {
    /// Project name.
    pub project: String,
    /// Images belonging to the project.
    pub images: Vec<Image>,
}

/// Group a flat image list by project, preserving first-seen project order.
#[must_use]
pub fn group_by_project(images: Vec<Image>) -> Vec<ProjectImages> {
    let mut groups: Vec<ProjectImages> = Vec::new();
    for image in images {
        match groups.iter_mut().find(|g| g.project == image.project) {
            Some(group) => group.images.push(image),
            None => groups.push(ProjectImages {
                project: image.project.clone(),
                images: vec![image],
            }),
        }
    }
    groups
}
