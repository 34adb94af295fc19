// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bierzmo_core::{BierzmoError, GroupId};

use crate::client::ApiClient;
use crate::types::{Group, User};

pub struct GroupsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl GroupsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Group>, BierzmoError> {
        self.client.get_data("/groups").await
    }

    /// Users assigned to a formation group.
    pub async fn members(&self, group: GroupId) -> Result<Vec<User>, BierzmoError> {
        self.client
            .get_data(&format!("/groups/{group}/members"))
            .await
    }
}
