// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parishes, schools and addresses used by the candidate forms.

use bierzmo_core::BierzmoError;

use crate::client::ApiClient;
use crate::types::{Address, Parish, School};

pub struct LocationsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl LocationsApi<'_> {
    pub async fn parishes(&self) -> Result<Vec<Parish>, BierzmoError> {
        self.client.get_data("/parishes").await
    }

    pub async fn schools(&self) -> Result<Vec<School>, BierzmoError> {
        self.client.get_data("/schools").await
    }

    pub async fn addresses(&self) -> Result<Vec<Address>, BierzmoError> {
        self.client.get_data("/addresses").await
    }
}
