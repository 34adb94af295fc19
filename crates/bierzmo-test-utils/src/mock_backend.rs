// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake parish backend for deterministic client tests.
//!
//! Protected endpoints answer 200 only when the request carries the
//! session cookie `token=<SESSION_TOKEN>` and 401 otherwise. The login and
//! refresh endpoints hand that cookie out, so a client without it sees a 401
//! on every call issued before the refresh lands, regardless of timing.

use std::time::Duration;

use bierzmo_client::ClientSettings;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Cookie value that protected endpoints accept.
pub const SESSION_TOKEN: &str = "bierzmo-session";

const API_PREFIX: &str = "/api";
const REFRESH_PATH: &str = "/auth/refresh-token";

/// How the refresh endpoint behaves.
#[derive(Debug, Clone, Copy)]
pub enum RefreshScript {
    /// Hands out a valid session cookie.
    Succeed,
    /// Reports success but hands out a cookie the protected routes reject.
    IssueToken(&'static str),
    /// Answers with the given status and no cookie.
    Fail(u16),
}

/// A wiremock server scripted as the parish REST backend.
pub struct MockBackend {
    server: MockServer,
    refresh_delay: Duration,
}

impl MockBackend {
    /// Starts a backend whose refresh endpoint answers after 200 ms, long
    /// enough for concurrently issued requests to all observe their 401.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            refresh_delay: Duration::from_millis(200),
        }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Base URL to configure the client with (`<server>/api`).
    pub fn api_url(&self) -> String {
        format!("{}{API_PREFIX}", self.server.uri())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.api_url())
    }

    /// Mounts the refresh endpoint, asserting it is hit exactly `expected`
    /// times when the server shuts down.
    pub async fn mount_refresh(&self, script: RefreshScript, expected: u64) {
        let response = match script {
            RefreshScript::Succeed => session_cookie(ResponseTemplate::new(200), SESSION_TOKEN)
                .set_body_json(json!({ "success": true })),
            RefreshScript::IssueToken(token) => session_cookie(ResponseTemplate::new(200), token)
                .set_body_json(json!({ "success": true })),
            RefreshScript::Fail(status) => ResponseTemplate::new(status)
                .set_body_json(json!({ "success": false, "message": "Sesja wygasła" })),
        };

        Mock::given(method("POST"))
            .and(path(api_path(REFRESH_PATH)))
            .respond_with(response.set_delay(self.refresh_delay))
            .expect(expected)
            .named("session refresh")
            .mount(&self.server)
            .await;
    }

    /// Mounts `POST /auth/login` returning `user` and setting the cookie to
    /// `token`. Pass [`SESSION_TOKEN`] for a session the protected
    /// endpoints accept.
    pub async fn mount_login(&self, user: Value, token: &str) {
        Mock::given(method("POST"))
            .and(path(api_path("/auth/login")))
            .respond_with(
                session_cookie(ResponseTemplate::new(200), token)
                    .set_body_json(json!({ "success": true, "user": user })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mounts `POST /auth/login` rejecting the credentials.
    pub async fn mount_login_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(api_path("/auth/login")))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "success": false, "message": "Nieprawidłowe dane" })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mounts a cookie-gated endpoint answering `{ success, data }`.
    pub async fn mount_protected(&self, http_method: &str, route: &str, data: Value) {
        Mock::given(method(http_method))
            .and(path(api_path(route)))
            .and(header("cookie", format!("token={SESSION_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data })),
            )
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method(http_method))
            .and(path(api_path(route)))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "success": false, "message": "Brak autoryzacji" })),
            )
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// Mounts an endpoint that always fails with `status`.
    pub async fn mount_failure(&self, http_method: &str, route: &str, status: u16, message: &str) {
        Mock::given(method(http_method))
            .and(path(api_path(route)))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({ "success": false, "message": message })),
            )
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen for `route`.
    pub async fn hits(&self, route: &str) -> usize {
        let full = api_path(route);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == full)
            .count()
    }
}

fn api_path(route: &str) -> String {
    format!("{API_PREFIX}{route}")
}

fn session_cookie(template: ResponseTemplate, token: &str) -> ResponseTemplate {
    template.insert_header("set-cookie", format!("token={token}; Path=/; HttpOnly").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn protected_route_requires_cookie() {
        let backend = MockBackend::start().await;
        backend.mount_protected("GET", "/groups", json!([])).await;

        let http = reqwest::Client::new();
        let url = format!("{}/groups", backend.api_url());

        let anonymous = http.get(&url).send().await.unwrap();
        assert_eq!(anonymous.status().as_u16(), 401);

        let authed = http
            .get(&url)
            .header("cookie", format!("token={SESSION_TOKEN}"))
            .send()
            .await
            .unwrap();
        assert_eq!(authed.status().as_u16(), 200);
        assert_eq!(backend.hits("/groups").await, 2);
    }
}
