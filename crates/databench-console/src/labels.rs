//! Display strings for the images page.
//!
//! Plain lookup tables; no behavior attaches to them beyond lookup.

use databench_images::models::{ImageSharingStatus, ImageStatus};

/// Columns of the image table, in display order after the checkbox column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTableColumn {
    /// Image name.
    ImageName,
    /// Creation date.
    CreationDate,
    /// Cloud provider.
    Provider,
    /// Lifecycle status.
    ImageStatus,
    /// Sharing visibility.
    SharedStatus,
    /// Source template name.
    TemplateName,
    /// Source instance name.
    InstanceName,
    /// Row actions.
    Actions,
}

impl ImageTableColumn {
    /// Return the column header shown to the user.
    #[must_use]
    pub const fn header(&self) -> &'static str {
        match self {
            Self::ImageName => "Image name",
            Self::CreationDate => "Creation date",
            Self::Provider => "Provider",
            Self::ImageStatus => "Image status",
            Self::SharedStatus => "Shared status",
            Self::TemplateName => "Template name",
            Self::InstanceName => "Instance name",
            Self::Actions => "Actions",
        }
    }
}

/// Column identifiers of the image table, in display order.
pub const IMAGE_TABLE_TITLES: [&str; 9] = [
    "checkbox",
    "imageName",
    "creationDate",
    "provider",
    "imageStatus",
    "sharedStatus",
    "templateName",
    "instanceName",
    "actions",
];

/// Tooltip messages for disabled row actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipMessage {
    /// Share is disabled for non-active images.
    ActiveOnly,
    /// Share is restricted to the image's creator.
    CreatorOnly,
    /// Terminate is blocked by in-progress computes.
    UnableTerminate,
}

impl TooltipMessage {
    /// Return the tooltip text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveOnly => {
                "The image cannot be shared because it is not in the \"Active\" status"
            }
            Self::CreatorOnly => "Images may be shared by creators only",
            Self::UnableTerminate => {
                "Unable to terminate notebook because at least one compute is in progress"
            }
        }
    }
}

/// Toast shown after a successful share.
pub const SUCCESS_SHARE_MESSAGE: &str =
    "The image has been shared with all current Regular Users on the project!";

/// Title of success toasts.
pub const SUCCESS_TITLE: &str = "Success!";

/// Placeholder for the project selector.
pub const PROJECT_SELECT_PLACEHOLDER: &str = "Select project";

/// Display label for a lifecycle status.
#[must_use]
pub const fn image_status_label(status: ImageStatus) -> &'static str {
    match status {
        ImageStatus::Creating => "Creating",
        ImageStatus::Active => "Active",
        ImageStatus::Failed => "Failed",
        ImageStatus::Terminating => "Terminating",
        ImageStatus::Terminated => "Terminated",
    }
}

/// Display label for a sharing status.
#[must_use]
pub const fn sharing_status_label(status: ImageSharingStatus) -> &'static str {
    match status {
        ImageSharingStatus::Private => "Private",
        ImageSharingStatus::Shared => "Shared",
        ImageSharingStatus::Received => "Received",
    }
}
