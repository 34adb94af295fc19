// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the parish REST backend.
//!
//! Provides [`ApiClient`] which attaches the session cookie, decodes the
//! response envelope, and routes 401 responses through the
//! [`SessionManager`] so that concurrent expiries cause a single refresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bierzmo_config::BierzmoConfig;
use bierzmo_core::{BierzmoError, RoleCatalog};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::request::{ApiRequest, ApiResponse, error_message};
use crate::session::{ExpiryNotifier, SessionManager, TokenRefresher, TracingNotifier};

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub refresh_path: String,
    pub cookie_name: String,
    pub timeout: Duration,
    pub catalog: RoleCatalog,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: "/auth/refresh-token".to_string(),
            cookie_name: "token".to_string(),
            timeout: Duration::from_secs(30),
            catalog: RoleCatalog::default(),
        }
    }

    pub fn from_config(config: &BierzmoConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            refresh_path: config.api.refresh_path.clone(),
            cookie_name: config.session.cookie_name.clone(),
            timeout: Duration::from_secs(config.api.timeout_secs),
            catalog: config.roles.to_catalog(),
        }
    }
}

/// Authenticated client for the parish backend.
///
/// Cheap to clone; clones share the cookie jar and the session manager.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
    refresh_path: String,
    cookie_name: String,
    catalog: Arc<RoleCatalog>,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Creates a client that reports session expiry through `tracing`.
    pub fn new(settings: ClientSettings) -> Result<Self, BierzmoError> {
        Self::with_notifier(settings, Arc::new(TracingNotifier))
    }

    /// Creates a client with a custom session-expiry notifier.
    pub fn with_notifier(
        settings: ClientSettings,
        notifier: Arc<dyn ExpiryNotifier>,
    ) -> Result<Self, BierzmoError> {
        let base_url = Url::parse(settings.base_url.trim_end_matches('/')).map_err(|e| {
            BierzmoError::Config(format!("invalid base URL `{}`: {e}", settings.base_url))
        })?;

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| BierzmoError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            jar,
            base_url,
            refresh_path: settings.refresh_path,
            cookie_name: settings.cookie_name,
            catalog: Arc::new(settings.catalog),
            session: Arc::new(SessionManager::new(notifier)),
        })
    }

    pub fn from_config(
        config: &BierzmoConfig,
        notifier: Arc<dyn ExpiryNotifier>,
    ) -> Result<Self, BierzmoError> {
        Self::with_notifier(ClientSettings::from_config(config), notifier)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// True when the jar holds the session cookie for the backend.
    pub fn has_session_cookie(&self) -> bool {
        let prefix = format!("{}=", self.cookie_name);
        self.jar
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().map(str::to_string).ok())
            .is_some_and(|cookies| {
                cookies
                    .split(';')
                    .any(|pair| pair.trim().starts_with(&prefix))
            })
    }

    /// Sends a request and returns the decoded 2xx envelope.
    ///
    /// A 401 triggers one session refresh (shared with any concurrent
    /// failures) followed by one replay. Every other non-success status is
    /// returned unchanged as [`BierzmoError::Api`].
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, BierzmoError> {
        loop {
            let response = self.dispatch(&request).await?;
            let status = response.status();
            debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                retry = request.is_retry(),
                "response received"
            );

            if status == StatusCode::UNAUTHORIZED {
                if !request.is_refreshable() || self.is_refresh_path(&request.path) {
                    return Err(BierzmoError::Unauthorized { path: request.path });
                }
                self.session.handle_unauthorized(self).await?;
                request.mark_retry();
                continue;
            }

            let raw = response.text().await.map_err(|e| BierzmoError::Http {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;

            if !status.is_success() {
                return Err(BierzmoError::Api {
                    status: status.as_u16(),
                    message: error_message(&raw),
                });
            }

            let parsed = ApiResponse::parse(status.as_u16(), &raw)?;
            if !parsed.success() {
                return Err(BierzmoError::Api {
                    status: status.as_u16(),
                    message: parsed
                        .message()
                        .unwrap_or("request was not successful")
                        .to_string(),
                });
            }
            return Ok(parsed);
        }
    }

    /// Sends `request` and decodes the envelope's `data` member.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, BierzmoError> {
        self.send(request).await?.data()
    }

    /// GET `path` and decode its `data` member.
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, BierzmoError> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// Posts to the refresh endpoint directly, outside the 401 handling.
    pub async fn refresh_session(&self) -> Result<(), BierzmoError> {
        let request = ApiRequest::post(self.refresh_path.clone());
        let response = self.dispatch(&request).await?;
        let status = response.status();
        let raw = response.text().await.map_err(|e| BierzmoError::Http {
            message: format!("failed to read refresh response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(BierzmoError::Api {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }
        let parsed = ApiResponse::parse(status.as_u16(), &raw)?;
        if !parsed.success() {
            return Err(BierzmoError::Api {
                status: status.as_u16(),
                message: parsed
                    .message()
                    .unwrap_or("session refresh was rejected")
                    .to_string(),
            });
        }
        Ok(())
    }

    fn is_refresh_path(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.refresh_path.trim_end_matches('/')
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response, BierzmoError> {
        let mut url = Url::parse(&self.url_for(&request.path)).map_err(|e| {
            BierzmoError::Internal(format!("invalid request path `{}`: {e}", request.path))
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(|e| BierzmoError::Http {
            message: format!("{} {} failed: {e}", request.method, request.path),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl TokenRefresher for ApiClient {
    async fn refresh(&self) -> Result<(), BierzmoError> {
        self.refresh_session().await
    }
}
