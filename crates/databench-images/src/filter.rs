//! Image list filtering.
//!
//! The console's image table supports filtering by name substring, status,
//! endpoint, template, and sharing status. An empty criterion matches
//! everything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Image, ImageSharingStatus, ImageStatus};

/// Filter criteria for the image table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilter {
    /// Case-insensitive substring match on the image name.
    #[serde(default)]
    pub image_name: String,
    /// Statuses to include; empty means all.
    #[serde(default)]
    pub statuses: Vec<ImageStatus>,
    /// Endpoints to include; empty means all.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Template names to include; empty means all.
    #[serde(default)]
    pub template_names: Vec<String>,
    /// Sharing statuses to include; empty means all.
    #[serde(default)]
    pub sharing_statuses: Vec<ImageSharingStatus>,
}

impl ImageFilter {
    /// Returns true if the image satisfies every criterion.
    #[must_use]
    pub fn matches(&self, image: &Image) -> bool {
        let name_matches = image
            .name
            .to_lowercase()
            .contains(&self.image_name.to_lowercase());
        let status_matches = self.statuses.is_empty() || self.statuses.contains(&image.status);
        let endpoint_matches =
            self.endpoints.is_empty() || self.endpoints.contains(&image.endpoint);
        let template_matches = self.template_names.is_empty()
            || image
                .template_name
                .as_ref()
                .is_some_and(|t| self.template_names.contains(t));
        let sharing_matches = self.sharing_statuses.is_empty()
            || image
                .sharing_status
                .is_some_and(|s| self.sharing_statuses.contains(&s));

        name_matches && status_matches && endpoint_matches && template_matches && sharing_matches
    }
}

/// Apply a filter to a list of images.
#[must_use]
pub fn filter_images(images: Vec<Image>, filter: &ImageFilter) -> Vec<Image> {
    images
        .into_iter()
        .filter(|image| filter.matches(image))
        .collect()
}

/// Option sets for the filter form, collected from the visible images.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilterFormData {
    /// All image names.
    pub image_names: BTreeSet<String>,
    /// All statuses present.
    pub statuses: BTreeSet<ImageStatus>,
    /// All endpoints present.
    pub endpoints: BTreeSet<String>,
    /// All template names present.
    pub template_names: BTreeSet<String>,
    /// All sharing statuses present.
    pub sharing_statuses: BTreeSet<ImageSharingStatus>,
}

impl ImageFilterFormData {
    /// Collect the filter form options from a list of images.
    #[must_use]
    pub fn collect(images: &[Image]) -> Self {
        Self {
            image_names: images.iter().map(|i| i.name.clone()).collect(),
            statuses: images.iter().map(|i| i.status).collect(),
            endpoints: images.iter().map(|i| i.endpoint.clone()).collect(),
            template_names: images
                .iter()
                .filter_map(|i| i.template_name.clone())
                .collect(),
            sharing_statuses: images.iter().filter_map(|i| i.sharing_status).collect(),
        }
    }
}
