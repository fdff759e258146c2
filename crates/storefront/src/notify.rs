//! User-facing notifications (toasts).
//!
//! Cart operations never fail outward; when one does not go through, its
//! message is handed to a [`Notifier`] for the UI to show.

use std::sync::{Arc, Mutex, PoisonError};

/// Receives messages meant for the person using the cart.
pub trait Notifier: Send + Sync {
    /// Show an error message.
    fn error(&self, message: &str);
}

/// Collects notifications until the UI drains them.
///
/// Clones share the same queue, so one handle can live inside the cart
/// manager while another is drained by whoever renders the response.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    messages: Arc<Mutex<Vec<String>>>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending messages, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    /// Messages waiting to be drained.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while pushing a string cannot leave the Vec inconsistent.
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NotificationQueue {
    fn error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = NotificationQueue::new();
        let handle = queue.clone();

        handle.error("first");
        handle.error("second");

        assert_eq!(queue.pending(), vec!["first", "second"]);
        assert_eq!(queue.drain(), vec!["first", "second"]);
        assert!(queue.drain().is_empty());
    }
}
