// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar events and their audience filtering.

use bierzmo_core::{BierzmoError, EventId, GroupId, RoleId, Viewer, filter_visible};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::request::ApiRequest;
use crate::types::{Created, Event, NewEvent};

pub struct EventsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl EventsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Event>, BierzmoError> {
        self.client.get_data("/events").await
    }

    /// Events the backend files under a role.
    pub async fn list_for_role(&self, role: RoleId) -> Result<Vec<Event>, BierzmoError> {
        self.client.get_data(&format!("/events/role/{role}")).await
    }

    /// Events the backend files under a formation group.
    pub async fn list_for_group(&self, group: GroupId) -> Result<Vec<Event>, BierzmoError> {
        self.client.get_data(&format!("/events/group/{group}")).await
    }

    pub async fn get(&self, id: EventId) -> Result<Event, BierzmoError> {
        self.client.get_data(&format!("/events/{id}")).await
    }

    /// Creates an event. A role list naming every catalog role is written
    /// as the `wszystkie` sentinel so stored scopes stay canonical.
    pub async fn create(&self, mut draft: NewEvent) -> Result<EventId, BierzmoError> {
        draft.roles = draft.roles.normalized(self.client.catalog());
        let request = ApiRequest::post("/events").json(&draft)?;
        let created: Created<EventId> = self.client.send_json(request).await?;
        info!(event = %created.id, roles = %draft.roles, "event created");
        Ok(created.id)
    }

    pub async fn delete(&self, id: EventId) -> Result<(), BierzmoError> {
        self.client
            .send(ApiRequest::delete(format!("/events/{id}")))
            .await?;
        debug!(event = %id, "event deleted");
        Ok(())
    }

    /// Fetches every event and keeps the ones `viewer` may see.
    pub async fn visible_for(&self, viewer: &Viewer) -> Result<Vec<Event>, BierzmoError> {
        let events = self.list().await?;
        Ok(filter_visible(&events, viewer, self.client.catalog())
            .into_iter()
            .cloned()
            .collect())
    }
}
