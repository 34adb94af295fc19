// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier that captures session-expired notifications for assertions.

use std::sync::{Arc, Mutex};

use bierzmo_client::ExpiryNotifier;

/// One captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub reason: String,
}

/// Records every notification it receives. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or_default()
    }
}

impl ExpiryNotifier for RecordingNotifier {
    fn session_expired(&self, message: &str, reason: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(Notification {
                message: message.to_string(),
                reason: reason.to_string(),
            });
        }
    }
}
