// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bierzmo parish client.

use thiserror::Error;

/// The primary error type used across the Bierzmo workspace.
#[derive(Debug, Error)]
pub enum BierzmoError {
    /// Configuration errors (invalid base URL, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failures (connection refused, timeout, TLS).
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success status other than an
    /// authentication failure. Propagated unchanged to the caller.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A 401 that could not be recovered by a session refresh.
    #[error("unauthorized request to {path}")]
    Unauthorized { path: String },

    /// The session refresh failed; every request waiting on it receives this.
    #[error("session expired: {reason}")]
    SessionExpired { reason: String },

    /// The response body could not be decoded into the expected record.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BierzmoError {
    /// Returns true for the authentication branch of the error taxonomy
    /// (an unrecoverable 401 or a failed refresh).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            BierzmoError::Unauthorized { .. } | BierzmoError::SessionExpired { .. }
        )
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BierzmoError::Api { status, .. } => Some(*status),
            BierzmoError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Builds the error handed to every request queued behind a failed refresh.
    pub fn session_expired(reason: impl Into<String>) -> Self {
        BierzmoError::SessionExpired {
            reason: reason.into(),
        }
    }
}
