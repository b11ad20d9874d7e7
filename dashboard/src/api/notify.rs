// Notification sink contract + the toast queue the dashboard renders.
//
// Sinks are fire-and-forget: callers never learn whether a toast was shown.

use log::{info, warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Sink that only writes to the log (headless smoke runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
    }
}

fn log_notification(n: &Notification) {
    match n.variant {
        NotificationVariant::Default => info!(
            "[PHASE: notify] [STEP: toast] {}: {}",
            n.title, n.description
        ),
        NotificationVariant::Destructive => warn!(
            "[PHASE: notify] [STEP: toast] {}: {}",
            n.title, n.description
        ),
    }
}

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Bounded queue of recent toasts. Entries expire after `ttl`.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: Self::DEFAULT_CAPACITY,
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    fn push_at(&self, notification: Notification, now: Instant) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.push_back(Toast {
            notification,
            shown_at: now,
        });
        while inner.len() > self.capacity {
            inner.pop_front();
        }
    }

    /// Toasts still alive at `now`, oldest first. Expired entries are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let Ok(mut inner) = self.inner.lock() else {
            return Vec::new();
        };
        let ttl = self.ttl;
        inner.retain(|t| now.saturating_duration_since(t.shown_at) < ttl);
        inner.iter().map(|t| t.notification.clone()).collect()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Everything currently queued regardless of age.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|inner| inner.iter().map(|t| t.notification.clone()).collect())
            .unwrap_or_default()
    }

    pub fn dismiss_all(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.clear();
        }
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
        self.push_at(notification, Instant::now());
    }
}
