// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated REST client for the Bierzmo parish backend.
//!
//! [`ApiClient`] keeps the session cookie, decodes the backend's response
//! envelope and recovers expired sessions through a single shared refresh
//! coordinated by [`SessionManager`]. The [`api`] module exposes the typed
//! resource wrappers built on top of it.

pub mod api;
pub mod client;
pub mod request;
pub mod session;
pub mod types;

pub use client::{ApiClient, ClientSettings};
pub use request::{ApiRequest, ApiResponse};
pub use session::{
    ExpiryNotifier, SESSION_EXPIRED_MESSAGE, SessionManager, TokenRefresher, TracingNotifier,
};
pub use types::{Address, Candidate, Event, Group, NewEvent, Parish, School, User};
