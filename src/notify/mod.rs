//! Progress notifications while image extraction is outstanding.
//!
//! The external endpoint receives a POST every interval with the
//! notification text and conversation id as query parameters. Send failures
//! are logged and swallowed; a flaky notification channel must never affect
//! the conversation pipeline.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const PROGRESS_MESSAGES: [&str; 5] = [
    "Processing your image...",
    "This might take a few more seconds...",
    "Almost there! Thanks for your patience.",
    "Just a bit longer...",
    "Finalizing the image processing...",
];

#[derive(Clone)]
pub struct Notifier {
    url: Option<String>,
    interval: Duration,
    client: reqwest::Client,
}

/// Handle to a running progress loop. Dropping it without calling `stop`
/// leaves the loop running until its next tick observes the closed channel.
pub struct ProgressGuard {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ProgressGuard {
    /// Signal the loop to stop and wait for it to finish so no stale
    /// notification lands after the real response.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

impl Notifier {
    pub fn new(url: Option<String>, interval_secs: u64) -> Self {
        Self {
            url,
            interval: Duration::from_secs(interval_secs),
            client: reqwest::Client::new(),
        }
    }

    /// Fire a single notification, swallowing any failure.
    pub async fn send(&self, conversation_id: &str, message: &str) {
        let Some(url) = &self.url else {
            return;
        };
        let result = self
            .client
            .post(url)
            .query(&[("notification", message), ("conversationId", conversation_id)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        match result {
            Ok(_) => debug!("notification sent: {message}"),
            Err(e) => warn!("failed to send notification: {e}"),
        }
    }

    /// Spawn the rotating progress loop for a conversation. Returns a guard
    /// the caller must stop once the slow operation completes.
    pub fn start_progress(&self, conversation_id: &str) -> ProgressGuard {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let notifier = self.clone();
        let conversation_id = conversation_id.to_string();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                notifier
                    .send(&conversation_id, PROGRESS_MESSAGES[index])
                    .await;
                index = (index + 1) % PROGRESS_MESSAGES.len();

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => break,
                }
                if *stop_rx.borrow() {
                    break;
                }
            }
        });

        ProgressGuard {
            stop: stop_tx,
            handle,
        }
    }
}
