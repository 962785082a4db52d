//! User-facing notifications
//!
//! The gateway and session store report outcomes through the [`Notifier`]
//! capability. [`NotificationManager`] keeps a bounded toast queue in a
//! reactive signal for the view layer to render.

use leptos::prelude::*;
use std::collections::VecDeque;

/// Maximum number of notifications to keep at once
const MAX_NOTIFICATIONS: usize = 5;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

/// Notification item with unique ID for tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: u64,
    pub kind: NotificationType,
    pub message: String,
}

/// Sink for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationType, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationType::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationType::Error, message);
    }
}

/// Reactive toast queue
#[derive(Clone)]
pub struct NotificationManager {
    notifications: ArcRwSignal<VecDeque<NotificationItem>>,
    next_id: ArcRwSignal<u64>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: ArcRwSignal::new(VecDeque::new()),
            next_id: ArcRwSignal::new(0),
        }
    }

    /// Get the notifications signal for the container
    pub fn notifications(&self) -> ArcRwSignal<VecDeque<NotificationItem>> {
        self.notifications.clone()
    }

    /// Snapshot of the queued notifications, oldest first
    pub fn items(&self) -> Vec<NotificationItem> {
        self.notifications
            .with_untracked(|n| n.iter().cloned().collect())
    }

    /// Remove a single notification
    pub fn dismiss(&self, id: u64) {
        self.notifications.update(|n| n.retain(|i| i.id != id));
    }

    /// Clear all notifications
    pub fn clear(&self) {
        self.notifications.set(VecDeque::new());
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationManager {
    fn notify(&self, kind: NotificationType, message: &str) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);

        self.notifications.update(|n| {
            n.push_back(NotificationItem {
                id,
                kind,
                message: message.to_string(),
            });

            // Remove oldest if we exceed max
            while n.len() > MAX_NOTIFICATIONS {
                n.pop_front();
            }
        });
    }
}

/// Notifier that writes to the log instead of the screen
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationType, message: &str) {
        match kind {
            NotificationType::Error | NotificationType::Warning => {
                leptos::logging::warn!("[{:?}] {}", kind, message)
            }
            NotificationType::Success | NotificationType::Info => {
                leptos::logging::log!("[{:?}] {}", kind, message)
            }
        }
    }
}
