// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bierzmo_core::{BierzmoError, GroupId};

use crate::client::ApiClient;
use crate::request::ApiRequest;
use crate::types::Candidate;

pub struct CandidatesApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl CandidatesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Candidate>, BierzmoError> {
        self.client.get_data("/candidates").await
    }

    pub async fn for_group(&self, group: GroupId) -> Result<Vec<Candidate>, BierzmoError> {
        let request = ApiRequest::get("/candidates").query("grupa", group.to_string());
        self.client.send_json(request).await
    }
}
