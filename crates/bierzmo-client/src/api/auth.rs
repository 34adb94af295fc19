// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login, logout and session checks.

use bierzmo_core::BierzmoError;
use serde::Serialize;
use tracing::info;

use crate::client::ApiClient;
use crate::request::ApiRequest;
use crate::types::User;

#[derive(Serialize)]
struct Credentials<'a> {
    identifier: &'a str,
    password: &'a str,
}

pub struct AuthApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// Logs in and stores the session cookie. A successful login starts a
    /// new session, so the expiry notification may fire again later.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, BierzmoError> {
        let request = ApiRequest::post("/auth/login")
            .without_refresh()
            .json(&Credentials {
                identifier,
                password,
            })?;
        let user: User = self.client.send(request).await?.field("user")?;
        self.client.session().mark_authenticated();
        info!(user = %user.login, roles = user.roles.len(), "logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), BierzmoError> {
        self.client.send(ApiRequest::post("/auth/logout")).await?;
        info!("logged out");
        Ok(())
    }

    /// Rotates the session cookie explicitly.
    pub async fn refresh(&self) -> Result<(), BierzmoError> {
        self.client.refresh_session().await?;
        info!("session refreshed");
        Ok(())
    }

    /// Returns the user behind the current session and re-arms the expiry
    /// notification.
    pub async fn check_session(&self) -> Result<User, BierzmoError> {
        let user: User = self
            .client
            .send(ApiRequest::get("/auth/check-session"))
            .await?
            .field("user")?;
        self.client.session().mark_authenticated();
        Ok(user)
    }
}
