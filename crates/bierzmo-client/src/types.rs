// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records exchanged with the parish backend.
//!
//! Wire field names are the backend's Polish column names; scope and date
//! fields are decoded once here into typed values.

use bierzmo_core::dates::lenient;
use bierzmo_core::scope::WireScope;
use bierzmo_core::types::parse_id_list;
use bierzmo_core::{
    EventId, GroupId, GroupScope, RoleId, RoleScope, RoleSet, Scoped, UserId, Viewer,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// --- Events ---

/// A calendar event as returned by the events endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "tytul")]
    pub title: String,
    #[serde(rename = "opis", default)]
    pub description: Option<String>,
    #[serde(rename = "data_rozpoczecia", default, with = "lenient")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(rename = "data_zakonczenia", default, with = "lenient")]
    pub ends_at: Option<NaiveDateTime>,
    #[serde(rename = "miejsce", default)]
    pub location: Option<String>,
    /// Audience by role (`dlaroli`).
    #[serde(rename = "dlaroli", default)]
    pub roles: RoleScope,
    /// Audience by formation group (`dlagrupy`).
    #[serde(rename = "dlagrupy", default)]
    pub groups: GroupScope,
}

impl Scoped for Event {
    fn role_scope(&self) -> &RoleScope {
        &self.roles
    }

    fn group_scope(&self) -> &GroupScope {
        &self.groups
    }
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    #[serde(rename = "tytul")]
    pub title: String,
    #[serde(rename = "opis", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "data_rozpoczecia", serialize_with = "wire_datetime")]
    pub starts_at: NaiveDateTime,
    #[serde(rename = "data_zakonczenia", with = "lenient")]
    pub ends_at: Option<NaiveDateTime>,
    #[serde(rename = "miejsce", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "dlaroli")]
    pub roles: RoleScope,
    #[serde(rename = "dlagrupy")]
    pub groups: GroupScope,
}

impl NewEvent {
    /// An event open to everyone.
    pub fn new(title: impl Into<String>, starts_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            starts_at,
            ends_at: None,
            location: None,
            roles: RoleScope::All,
            groups: GroupScope::All,
        }
    }

    #[must_use]
    pub fn for_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = RoleScope::Roles(roles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn for_group(mut self, group: GroupId) -> Self {
        self.groups = GroupScope::single(group);
        self
    }
}

impl Scoped for NewEvent {
    fn role_scope(&self) -> &RoleScope {
        &self.roles
    }

    fn group_scope(&self) -> &GroupScope {
        &self.groups
    }
}

fn wire_datetime<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    lenient::serialize(&Some(*value), serializer)
}

/// `{ "id": .. }` reply to a create call.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Created<T> {
    pub id: T,
}

// --- Users ---

/// A user account with its roles and optional formation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    #[serde(rename = "imie", default)]
    pub first_name: Option<String>,
    #[serde(rename = "nazwisko", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Decoded from the comma-separated `role` column.
    #[serde(rename = "role", default, deserialize_with = "role_set")]
    pub roles: RoleSet,
    #[serde(rename = "grupa", default)]
    pub group: Option<GroupId>,
}

impl User {
    /// The identity used when filtering events for this user.
    pub fn viewer(&self) -> Viewer {
        let viewer = Viewer::new(self.roles.clone());
        match self.group {
            Some(group) => viewer.with_group(group),
            None => viewer,
        }
    }

    /// "First Last" when both names are known, otherwise the login.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.login.clone(),
        }
    }
}

fn role_set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoleSet, D::Error> {
    Ok(match WireScope::deserialize(deserializer)? {
        WireScope::Null(()) => RoleSet::new(),
        WireScope::Number(id) => [RoleId(id)].into_iter().collect(),
        WireScope::List(ids) => ids.into_iter().map(RoleId).collect(),
        WireScope::Text(text) => parse_id_list(&text),
        WireScope::Other(_) => RoleSet::new(),
    })
}

// --- Groups and candidates ---

/// A formation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(rename = "nazwa")]
    pub name: String,
    #[serde(rename = "animator_id", default)]
    pub animator: Option<UserId>,
}

/// A confirmation candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u32,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "grupa", default)]
    pub group: Option<GroupId>,
    #[serde(rename = "parafia", default)]
    pub parish: Option<String>,
}

// --- Locations ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parish {
    pub id: u32,
    #[serde(rename = "nazwa")]
    pub name: String,
    #[serde(rename = "miejscowosc", default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: u32,
    #[serde(rename = "nazwa")]
    pub name: String,
    #[serde(rename = "miejscowosc", default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: u32,
    #[serde(rename = "ulica", default)]
    pub street: Option<String>,
    #[serde(rename = "miejscowosc", default)]
    pub city: Option<String>,
    #[serde(rename = "kod_pocztowy", default)]
    pub postal_code: Option<String>,
}
