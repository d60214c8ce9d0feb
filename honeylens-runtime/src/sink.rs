//! Badge notification sinks
//!
//! Delivery is fire-and-forget: a sink never reports failure back to the
//! engine. Failed deliveries are logged and dropped.

use honeylens_core::{BadgeUpdate, Outbound};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Receiver of badge updates
pub trait NotificationSink: Send + Sync {
    fn notify(&self, update: BadgeUpdate);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn notify(&self, update: BadgeUpdate) {
        (**self).notify(update)
    }
}

/// Logs every badge update
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, update: BadgeUpdate) {
        info!(text = %update.text, color = %update.color, "Badge updated");
    }
}

/// Forwards badge updates into a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BadgeUpdate>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BadgeUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, update: BadgeUpdate) {
        if self.tx.send(update).is_err() {
            debug!("Badge receiver dropped, update discarded");
        }
    }
}

/// POSTs each update as an `updateBadge` message
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationSink for WebhookSink {
    fn notify(&self, update: BadgeUpdate) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(url = %self.url, "No async runtime, badge webhook skipped");
            return;
        };

        let client = self.client.clone();
        let url = self.url.clone();
        let message: Outbound = update.into_message();

        runtime.spawn(async move {
            let result = client
                .post(&url)
                .json(&message)
                .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
                .send()
                .await;

            match result {
                Ok(resp) if resp.status().is_success() => {
                    debug!(url = %url, "Badge webhook delivered")
                }
                Ok(resp) => warn!(url = %url, status = %resp.status(), "Badge webhook rejected"),
                Err(e) => warn!(url = %url, error = %e, "Badge webhook delivery failed"),
            }
        });
    }
}

/// Delivers each update to several sinks in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotificationSink for FanoutSink {
    fn notify(&self, update: BadgeUpdate) {
        for sink in &self.sinks {
            sink.notify(update.clone());
        }
    }
}
