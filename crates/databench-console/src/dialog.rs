//! Share image dialog.
//!
//! Mediates one user action: sharing an image with all users of its project.
//! The dialog closes as soon as the user confirms; the share request itself
//! runs in the background and surfaces a success toast when it completes.

use std::sync::Arc;

use tokio::sync::oneshot;

use databench_images::models::Image;
use databench_images::ImageDirectory;

use crate::labels;
use crate::notify::NotificationChannel;

/// Input handed to the dialog when it opens.
#[derive(Debug, Clone)]
pub struct ShareModalData {
    /// The image the share action applies to. The dialog only reads it.
    pub image: Image,
}

/// Lifecycle state of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Dialog is open, showing the image name.
    Idle,
    /// Dialog has been closed. Terminal.
    Closed,
}

/// Handle to the dialog's closed signal.
///
/// The signal fires at most once; closing an already-closed dialog is a
/// no-op.
#[derive(Debug)]
pub struct DialogRef {
    closed: Option<oneshot::Sender<()>>,
}

impl DialogRef {
    /// Create a dialog handle and the receiver its closed signal fires on.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { closed: Some(tx) }, rx)
    }

    /// Fire the closed signal. Returns false if it already fired.
    pub fn close(&mut self) -> bool {
        match self.closed.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Returns true once the closed signal has fired.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed.is_none()
    }
}

/// Controller for the share image dialog.
///
/// Collaborators are injected at construction; the controller never mutates
/// the image record itself.
pub struct ShareImageDialog {
    data: ShareModalData,
    image_name: String,
    state: DialogState,
    dialog_ref: DialogRef,
    directory: Arc<dyn ImageDirectory>,
    notifier: Arc<dyn NotificationChannel>,
}

impl ShareImageDialog {
    /// Open the dialog for the image in `data`.
    ///
    /// The displayed name is read once here.
    #[must_use]
    pub fn open(
        data: ShareModalData,
        dialog_ref: DialogRef,
        directory: Arc<dyn ImageDirectory>,
        notifier: Arc<dyn NotificationChannel>,
    ) -> Self {
        let image_name = data.image.name.clone();
        tracing::debug!(image = %image_name, "share dialog opened");
        Self {
            data,
            image_name,
            state: DialogState::Idle,
            dialog_ref,
            directory,
            notifier,
        }
    }

    /// Name of the image the dialog presents.
    #[must_use]
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DialogState {
        self.state
    }

    /// Confirm the share action.
    ///
    /// Closes the dialog immediately, then issues the share request in the
    /// background. On success a toast with [`labels::SUCCESS_SHARE_MESSAGE`]
    /// is emitted. A failed request is not surfaced to the user. Calling
    /// this on a closed dialog does nothing.
    pub fn on_share(&mut self) {
        if self.state == DialogState::Closed {
            return;
        }
        self.state = DialogState::Closed;
        self.dialog_ref.close();

        let image = self.data.image.clone();
        let directory = Arc::clone(&self.directory);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match directory.share_with_all_users(&image).await {
                Ok(()) => {
                    notifier.notify_success(labels::SUCCESS_SHARE_MESSAGE, labels::SUCCESS_TITLE);
                }
                Err(err) => {
                    tracing::warn!(image = %image.name, error = %err, "share request failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use databench_core::Error;
    use databench_images::models::{CreateImageRequest, ImageStatus};
    use databench_images::Result;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Shared(Image),
        Notified(String, String),
    }

    #[derive(Clone, Copy)]
    enum ShareBehavior {
        Succeed,
        Fail,
        NeverComplete,
    }

    struct RecordingDirectory {
        events: Arc<Mutex<Vec<Event>>>,
        behavior: ShareBehavior,
    }

    #[async_trait]
    impl ImageDirectory for RecordingDirectory {
        async fn share_with_all_users(&self, image: &Image) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(Event::Shared(image.clone()));
            match self.behavior {
                ShareBehavior::Succeed => Ok(()),
                ShareBehavior::Fail => Err(Error::ServiceUnavailable("directory down".into())),
                ShareBehavior::NeverComplete => std::future::pending().await,
            }
        }

        async fn get_user_images(&self) -> Result<Vec<Image>> {
            unimplemented!("not exercised by the dialog")
        }

        async fn get_image(&self, _: &str, _: &str, _: &str) -> Result<Image> {
            unimplemented!("not exercised by the dialog")
        }

        async fn create_image(&self, _: &CreateImageRequest) -> Result<String> {
            unimplemented!("not exercised by the dialog")
        }

        async fn terminate_image(&self, _: &str, _: &str, _: &str) -> Result<()> {
            unimplemented!("not exercised by the dialog")
        }
    }

    struct RecordingNotifier {
        events: Arc<Mutex<Vec<Event>>>,
        done: Arc<Notify>,
    }

    impl NotificationChannel for RecordingNotifier {
        fn notify_success(&self, message: &str, title: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Notified(message.to_string(), title.to_string()));
            self.done.notify_one();
        }

        fn notify_error(&self, message: &str, title: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Notified(message.to_string(), title.to_string()));
            self.done.notify_one();
        }
    }

    fn sample_image() -> Image {
        Image {
            name: "model-v2".into(),
            description: None,
            project: "demo".into(),
            endpoint: "aws-east".into(),
            user: "alice".into(),
            cloud_provider: Some("aws".into()),
            docker_image: None,
            template_name: Some("Jupyter notebook".into()),
            instance_name: Some("jup-01".into()),
            creation_date: None,
            status: ImageStatus::Active,
            sharing_status: None,
        }
    }

    struct Harness {
        dialog: ShareImageDialog,
        closed_rx: oneshot::Receiver<()>,
        events: Arc<Mutex<Vec<Event>>>,
        done: Arc<Notify>,
    }

    fn open_dialog(behavior: ShareBehavior) -> Harness {
        let events = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Notify::new());
        let directory = Arc::new(RecordingDirectory {
            events: Arc::clone(&events),
            behavior,
        });
        let notifier = Arc::new(RecordingNotifier {
            events: Arc::clone(&events),
            done: Arc::clone(&done),
        });
        let (dialog_ref, closed_rx) = DialogRef::channel();
        let dialog = ShareImageDialog::open(
            ShareModalData {
                image: sample_image(),
            },
            dialog_ref,
            directory,
            notifier,
        );
        Harness {
            dialog,
            closed_rx,
            events,
            done,
        }
    }

    #[tokio::test]
    async fn displays_image_name_from_modal_data() {
        let harness = open_dialog(ShareBehavior::Succeed);
        assert_eq!(harness.dialog.image_name(), "model-v2");
        assert_eq!(harness.dialog.state(), DialogState::Idle);
    }

    #[tokio::test]
    async fn share_closes_before_notifying_and_shares_exact_image() {
        let mut harness = open_dialog(ShareBehavior::Succeed);
        harness.dialog.on_share();

        // The closed signal fired synchronously, before the request resolved.
        assert!(harness.closed_rx.try_recv().is_ok());
        assert!(harness.events.lock().unwrap().is_empty());
        assert_eq!(harness.dialog.state(), DialogState::Closed);

        harness.done.notified().await;
        let events = harness.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                Event::Shared(sample_image()),
                Event::Notified(
                    labels::SUCCESS_SHARE_MESSAGE.to_string(),
                    labels::SUCCESS_TITLE.to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn dialog_closes_even_if_share_never_completes() {
        let mut harness = open_dialog(ShareBehavior::NeverComplete);
        harness.dialog.on_share();

        assert!(harness.closed_rx.try_recv().is_ok());

        // Give the request task a chance to run; it must not notify.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        let events = harness.events.lock().unwrap();
        assert_eq!(*events, vec![Event::Shared(sample_image())]);
    }

    #[tokio::test]
    async fn share_failure_is_not_surfaced() {
        let mut harness = open_dialog(ShareBehavior::Fail);
        harness.dialog.on_share();

        assert!(harness.closed_rx.try_recv().is_ok());

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        let events = harness.events.lock().unwrap();
        assert_eq!(*events, vec![Event::Shared(sample_image())]);
    }

    #[tokio::test]
    async fn second_share_action_is_ignored() {
        let mut harness = open_dialog(ShareBehavior::Succeed);
        harness.dialog.on_share();
        harness.dialog.on_share();

        harness.done.notified().await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        let events = harness.events.lock().unwrap();
        let share_count = events
            .iter()
            .filter(|e| matches!(e, Event::Shared(_)))
            .count();
        assert_eq!(share_count, 1);
    }

    #[test]
    fn dialog_ref_close_fires_once() {
        let (mut dialog_ref, mut rx) = DialogRef::channel();
        assert!(!dialog_ref.is_closed());
        assert!(dialog_ref.close());
        assert!(dialog_ref.is_closed());
        assert!(!dialog_ref.close());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
