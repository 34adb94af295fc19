// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed wrappers over the backend's REST resources.
//!
//! Each wrapper borrows an [`ApiClient`] and inherits its session handling:
//! a 401 on any call goes through the shared refresh before the caller sees
//! an error.

pub mod auth;
pub mod candidates;
pub mod events;
pub mod groups;
pub mod locations;
pub mod users;

pub use auth::AuthApi;
pub use candidates::CandidatesApi;
pub use events::EventsApi;
pub use groups::GroupsApi;
pub use locations::LocationsApi;
pub use users::UsersApi;

use crate::client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn events(&self) -> EventsApi<'_> {
        EventsApi { client: self }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }

    pub fn groups(&self) -> GroupsApi<'_> {
        GroupsApi { client: self }
    }

    pub fn candidates(&self) -> CandidatesApi<'_> {
        CandidatesApi { client: self }
    }

    pub fn locations(&self) -> LocationsApi<'_> {
        LocationsApi { client: self }
    }
}
