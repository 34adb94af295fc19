// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request descriptors and the backend's `{ success, data, message }` envelope.

use bierzmo_core::BierzmoError;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A replayable description of one API call.
///
/// `reqwest::RequestBuilder` cannot be cloned reliably, so the client keeps
/// this descriptor and rebuilds the request when it has to replay it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    retried: bool,
    refreshable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retried: false,
            refreshable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, BierzmoError> {
        let value = serde_json::to_value(body).map_err(|e| {
            BierzmoError::Internal(format!("failed to serialize request body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Opts out of 401 recovery. Used for calls that establish a session,
    /// where a 401 means bad credentials rather than an expired session.
    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    /// True once the request has been replayed after a session refresh.
    pub fn is_retry(&self) -> bool {
        self.retried
    }

    /// True when a 401 on this request may trigger a session refresh.
    pub fn is_refreshable(&self) -> bool {
        self.refreshable && !self.retried
    }

    pub(crate) fn mark_retry(&mut self) {
        self.retried = true;
    }
}

/// A decoded 2xx response body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Parses a raw body. Empty bodies become `null`.
    pub(crate) fn parse(status: u16, raw: &str) -> Result<Self, BierzmoError> {
        let body = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).map_err(|e| BierzmoError::Decode {
                message: format!("response is not JSON: {e}"),
                source: Some(Box::new(e)),
            })?
        };
        Ok(Self { status, body })
    }

    /// The envelope's `success` flag; absent means success.
    pub fn success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// The envelope's `message`, if any.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// Decodes the `data` member.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, BierzmoError> {
        self.field("data")
    }

    /// Decodes a named top-level member (e.g. `user` in the login reply).
    pub fn field<T: DeserializeOwned>(mut self, name: &str) -> Result<T, BierzmoError> {
        let value = match self.body.get_mut(name) {
            Some(value) => value.take(),
            None => {
                return Err(BierzmoError::Decode {
                    message: format!("response has no `{name}` member"),
                    source: None,
                });
            }
        };
        serde_json::from_value(value).map_err(|e| BierzmoError::Decode {
            message: format!("failed to decode `{name}`: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Builds a readable message from an error body: the envelope's `message`
/// or `error` member when present, otherwise the raw text.
pub(crate) fn error_message(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| raw.trim().to_string())
}
