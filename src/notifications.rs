use std::collections::VecDeque;

use crate::util::time;

const DEFAULT_LIFETIME_SECS: f64 = 4.0;
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    created_at: f64,
}

/// Toast queue. Messages expire on their own; the oldest is dropped when
/// too many pile up.
#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    lifetime_secs: f64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME_SECS)
    }
}

impl Notifications {
    pub fn new(lifetime_secs: f64) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime_secs,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(NotificationKind::Success, message.into(), time::current_time_secs());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(NotificationKind::Error, message.into(), time::current_time_secs());
    }

    pub fn push_at(&mut self, kind: NotificationKind, message: String, now: f64) {
        self.items.push_back(Notification {
            kind,
            message,
            created_at: now,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Drop expired messages and return the ones still showing
    pub fn active(&mut self, now: f64) -> impl Iterator<Item = &Notification> {
        let lifetime = self.lifetime_secs;
        self.items.retain(|n| now - n.created_at < lifetime);
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_expire() {
        let mut toasts = Notifications::new(2.0);
        toasts.push_at(NotificationKind::Success, "uploaded".into(), 10.0);
        toasts.push_at(NotificationKind::Error, "failed".into(), 11.0);

        assert_eq!(toasts.active(11.5).count(), 2);
        let remaining: Vec<_> = toasts.active(12.5).map(|n| n.message.clone()).collect();
        assert_eq!(remaining, vec!["failed".to_string()]);
        assert_eq!(toasts.active(20.0).count(), 0);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut toasts = Notifications::new(60.0);
        for i in 0..7 {
            toasts.push_at(NotificationKind::Success, format!("m{}", i), 0.0);
        }
        let messages: Vec<_> = toasts.active(1.0).map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4", "m5", "m6"]);
    }
}
