//! Per-image action permissions.
//!
//! Which actions the console offers on an image row depends on the image's
//! status, on whether the requesting user created it, and on the user's page
//! access grants.

use serde::{Deserialize, Serialize};

use crate::models::{Image, ImageStatus};

/// Page-level grants of the requesting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageAccess {
    /// May share images they created.
    pub share_own: bool,
    /// May re-share images shared with them.
    pub share_received: bool,
    /// May terminate images they created.
    pub terminate_own: bool,
}

/// Actions available to a user on one image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageUserPermissions {
    /// The share action is offered.
    pub can_share: bool,
    /// The terminate action is offered.
    pub can_terminate: bool,
}

/// Evaluate the actions `username` may perform on `image`.
///
/// Only active images can be shared; owners need the share-own grant,
/// recipients the share-received grant. Terminating requires ownership, the
/// terminate grant, and an active or failed image.
#[must_use]
pub fn user_image_permissions(
    username: &str,
    image: &Image,
    access: PageAccess,
) -> ImageUserPermissions {
    let is_owner = image.user == username;

    let can_terminate = matches!(image.status, ImageStatus::Active | ImageStatus::Failed)
        && is_owner
        && access.terminate_own;

    let can_share = image.status == ImageStatus::Active
        && if is_owner {
            access.share_own
        } else {
            access.share_received
        };

    ImageUserPermissions {
        can_share,
        can_terminate,
    }
}
