//! User console components for the image directory.
//!
//! This crate hosts the interactive pieces of the images page: the share
//! dialog controller, the notification channel it reports through, and the
//! display strings the page renders. Components receive their backend
//! collaborators as trait objects at construction.

#![deny(missing_docs)]

pub mod dialog;
pub mod labels;
pub mod notify;

pub use dialog::{DialogRef, DialogState, ShareImageDialog, ShareModalData};
pub use notify::{NotificationChannel, TracingNotifier};
