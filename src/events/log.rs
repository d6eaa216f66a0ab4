//! Bounded log and transient notifications.
//!
//! ## LogBook
//!
//! - Entries are kept newest-first and capped (oldest evicted)
//! - Each response's block is prepended as a unit, in its original order
//! - Notifications are capped separately and expire after a fixed delay
//! - Error entries always raise a notification
//!
//! Time is passed in as milliseconds since the Unix epoch so the book stays
//! deterministic under test; `app::AppContext` supplies the wall clock.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::translator::{LogLevel, Translated};
use crate::core::ClientConfig;

/// One log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Unique within the book.
    pub id: String,
    /// Creation time, ms since epoch.
    pub at_ms: u64,
    /// Severity.
    pub level: LogLevel,
    /// Heading.
    pub title: String,
    /// Body.
    #[serde(default)]
    pub message: String,
}

/// A transient notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique within the book.
    pub id: String,
    /// Creation time, ms since epoch.
    pub at_ms: u64,
    /// Heading.
    pub title: String,
    /// Body.
    #[serde(default)]
    pub message: String,
    /// When it disappears, ms since epoch.
    pub expires_at_ms: u64,
}

/// Persisted shape of a `LogBook`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshot {
    /// Entries, newest first.
    #[serde(default)]
    pub items: Vec<LogEntry>,
    /// Live notifications, newest first.
    #[serde(default)]
    pub toasts: Vec<Notification>,
}

/// Bounded, newest-first log plus notifications.
#[derive(Clone, Debug)]
pub struct LogBook {
    entries: VecDeque<LogEntry>,
    notifications: VecDeque<Notification>,
    capacity: usize,
    notification_capacity: usize,
    ttl_ms: u64,
    next_id: u64,
}

impl Default for LogBook {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl LogBook {
    /// Create an empty book.
    #[must_use]
    pub fn new(capacity: usize, notification_capacity: usize, ttl_ms: u64) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            notifications: VecDeque::with_capacity(notification_capacity),
            capacity,
            notification_capacity,
            ttl_ms,
            next_id: 0,
        }
    }

    /// Create an empty book sized by `config`.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.log_capacity,
            config.notification_capacity,
            config.notification_ttl_ms,
        )
    }

    /// Restore persisted content, re-applying the caps.
    pub fn restore(&mut self, snapshot: LogSnapshot) {
        self.entries = snapshot.items.into_iter().take(self.capacity).collect();
        self.notifications = snapshot
            .toasts
            .into_iter()
            .take(self.notification_capacity)
            .collect();
        // Ids continue past anything restored so they stay unique.
        let restored_max = self
            .entries
            .iter()
            .map(|e| e.id.as_str())
            .chain(self.notifications.iter().map(|n| n.id.as_str()))
            .filter_map(|id| id.split('-').nth(1)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(restored_max);
    }

    /// Persistable copy.
    #[must_use]
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            items: self.entries.iter().cloned().collect(),
            toasts: self.notifications.iter().cloned().collect(),
        }
    }

    fn fresh_id(&mut self, prefix: &str, now_ms: u64) -> String {
        self.next_id += 1;
        format!("{prefix}-{}-{now_ms}", self.next_id)
    }

    fn entry(&mut self, level: LogLevel, title: String, message: String, now_ms: u64) -> LogEntry {
        LogEntry {
            id: self.fresh_id("l", now_ms),
            at_ms: now_ms,
            level,
            title,
            message,
        }
    }

    /// Append a single entry. Errors also notify.
    pub fn push(&mut self, level: LogLevel, title: impl Into<String>, message: impl Into<String>, now_ms: u64) {
        self.append_block(
            vec![Translated {
                level,
                title: title.into(),
                message: message.into(),
                notify: level == LogLevel::Error,
            }],
            now_ms,
        );
    }

    /// Append an info entry.
    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>, now_ms: u64) {
        self.push(LogLevel::Info, title, message, now_ms);
    }

    /// Append a warning entry.
    pub fn warn(&mut self, title: impl Into<String>, message: impl Into<String>, now_ms: u64) {
        self.push(LogLevel::Warn, title, message, now_ms);
    }

    /// Append an error entry and notify.
    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>, now_ms: u64) {
        self.push(LogLevel::Error, title, message, now_ms);
    }

    /// Prepend one response's translated block, keeping its internal order.
    pub fn append_block(&mut self, block: Vec<Translated>, now_ms: u64) {
        let mut fresh = Vec::with_capacity(block.len());
        for item in block {
            let notify = item.notify || item.level == LogLevel::Error;
            if notify {
                self.notify(item.title.clone(), item.message.clone(), now_ms);
            }
            fresh.push(self.entry(item.level, item.title, item.message, now_ms));
        }
        for entry in fresh.into_iter().rev() {
            self.entries.push_front(entry);
        }
        self.entries.truncate(self.capacity);
    }

    /// Raise a notification; returns its id.
    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>, now_ms: u64) -> String {
        let id = self.fresh_id("t", now_ms);
        self.notifications.push_front(Notification {
            id: id.clone(),
            at_ms: now_ms,
            title: title.into(),
            message: message.into(),
            expires_at_ms: now_ms.saturating_add(self.ttl_ms),
        });
        self.notifications.truncate(self.notification_capacity);
        id
    }

    /// Drop notifications whose deadline has passed; returns how many.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.expires_at_ms > now_ms);
        before - self.notifications.len()
    }

    /// Dismiss a notification by id.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        before != self.notifications.len()
    }

    /// Remove every entry (notifications stay).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Live notifications, newest first.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(title: &str) -> Translated {
        Translated {
            level: LogLevel::Info,
            title: title.to_string(),
            message: String::new(),
            notify: false,
        }
    }

    #[test]
    fn test_block_prepended_in_order() {
        let mut book = LogBook::new(10, 6, 3500);
        book.append_block(vec![line("a1"), line("a2")], 0);
        book.append_block(vec![line("b1"), line("b2")], 1);

        let titles: Vec<_> = book.entries().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "b2", "a1", "a2"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut book = LogBook::new(200, 6, 3500);
        for i in 0..250 {
            book.info(format!("e{i}"), "", i);
        }
        assert_eq!(book.len(), 200);
        assert_eq!(book.entries().next().unwrap().title, "e249");
        assert_eq!(book.entries().last().unwrap().title, "e50");
    }

    #[test]
    fn test_notifications_expire_and_cap() {
        let mut book = LogBook::new(200, 6, 3500);
        for i in 0..8 {
            book.notify(format!("n{i}"), "", 1000);
        }
        assert_eq!(book.notifications().count(), 6);

        assert_eq!(book.expire(4499), 0);
        assert_eq!(book.expire(4500), 6);
        assert_eq!(book.notifications().count(), 0);
    }

    #[test]
    fn test_error_notifies_and_dismiss() {
        let mut book = LogBook::default();
        book.error("boom", "bad", 10);
        book.warn("careful", "", 10);

        assert_eq!(book.len(), 2);
        let ids: Vec<String> = book.notifications().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), 1);
        assert!(book.dismiss(&ids[0]));
        assert!(!book.dismiss(&ids[0]));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut book = LogBook::default();
        book.info("one", "", 1);
        book.error("two", "", 2);

        let mut restored = LogBook::default();
        restored.restore(book.snapshot());
        assert_eq!(restored.snapshot(), book.snapshot());

        restored.info("three", "", 3);
        let ids: std::collections::BTreeSet<_> = restored.entries().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }
}
