// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Bierzmo integration tests.
//!
//! Provides a scripted fake of the parish backend and a notifier that
//! records what the user would have been shown.
//!
//! # Components
//!
//! - [`MockBackend`] - wiremock server with cookie-gated endpoints and a
//!   scripted refresh endpoint
//! - [`RecordingNotifier`] - captures session-expired notifications

pub mod mock_backend;
pub mod recording_notifier;

pub use mock_backend::{MockBackend, RefreshScript, SESSION_TOKEN};
pub use recording_notifier::{Notification, RecordingNotifier};
