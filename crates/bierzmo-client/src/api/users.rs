// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bierzmo_core::{BierzmoError, UserId};

use crate::client::ApiClient;
use crate::types::User;

pub struct UsersApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UsersApi<'_> {
    pub async fn list(&self) -> Result<Vec<User>, BierzmoError> {
        self.client.get_data("/users").await
    }

    pub async fn get(&self, id: UserId) -> Result<User, BierzmoError> {
        self.client.get_data(&format!("/users/{id}")).await
    }
}
