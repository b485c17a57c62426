use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::params::ConfigError;

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Oldest toasts are dropped beyond this
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Destructive,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn goal_achieved() -> Self {
        Self::new(
            NotificationLevel::Success,
            "Goal achieved!",
            "You can now safely copy your text. Great work!",
        )
    }

    pub fn text_erased() -> Self {
        Self::new(
            NotificationLevel::Destructive,
            "Text faded away!",
            "Your text has been permanently deleted. Keep writing!",
        )
    }

    pub fn invalid_config(err: &ConfigError) -> Self {
        Self::new(NotificationLevel::Error, "Invalid session", err.to_string())
    }
}

/// Receiver of session and configuration notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Transient on-screen notifications, newest last.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_at(&mut self, notification: Notification, now: Instant) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(title = %notification.title, "notification");
            }
            NotificationLevel::Destructive | NotificationLevel::Error => {
                let Notification { title, body, .. } = &notification;
                tracing::warn!(%title, %body, "notification");
            }
        }

        self.toasts.push_back(Toast {
            notification,
            shown_at: now,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Drop toasts older than [`TOAST_TTL`]
    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
    }

    /// Toasts still inside their TTL at `now`, oldest first
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.toasts
            .iter()
            .filter(move |t| now.saturating_duration_since(t.shown_at) < TOAST_TTL)
    }

    /// When the oldest toast runs out, if any are queued
    pub fn next_expiry(&self) -> Option<Instant> {
        self.toasts.iter().map(|t| t.shown_at + TOAST_TTL).min()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }
}
