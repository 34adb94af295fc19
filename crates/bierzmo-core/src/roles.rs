// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Known user roles and their display labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::types::{RoleId, RoleSet};

/// The fixed set of user categories the parish backend assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum KnownRole {
    #[strum(to_string = "Administrator")]
    Administrator,
    #[strum(to_string = "Pastor")]
    Pastor,
    #[strum(to_string = "Office staff")]
    OfficeStaff,
    #[strum(to_string = "Animator")]
    Animator,
    #[strum(to_string = "Parent")]
    Parent,
    #[strum(to_string = "Candidate")]
    Candidate,
    #[strum(to_string = "Witness")]
    Witness,
}

impl KnownRole {
    /// Backend identifier of the role.
    pub fn id(self) -> RoleId {
        RoleId(match self {
            KnownRole::Administrator => 1,
            KnownRole::Pastor => 2,
            KnownRole::OfficeStaff => 3,
            KnownRole::Animator => 4,
            KnownRole::Parent => 5,
            KnownRole::Candidate => 6,
            KnownRole::Witness => 7,
        })
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleInfo {
    pub id: RoleId,
    pub label: String,
}

/// Maps role identifiers to labels and defines the "every known role" set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    labels: BTreeMap<RoleId, String>,
}

impl RoleCatalog {
    /// Builds a catalog from explicit entries. Later duplicates win.
    pub fn new(entries: impl IntoIterator<Item = RoleInfo>) -> Self {
        Self {
            labels: entries
                .into_iter()
                .map(|info| (info.id, info.label))
                .collect(),
        }
    }

    /// Label for a role, or `Role #<id>` when the identifier is unknown.
    pub fn label(&self, id: RoleId) -> String {
        self.labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Role #{id}"))
    }

    pub fn contains(&self, id: RoleId) -> bool {
        self.labels.contains_key(&id)
    }

    /// Every known role identifier.
    pub fn all_ids(&self) -> RoleSet {
        self.labels.keys().copied().collect()
    }

    /// True when `roles` lists exactly every known role.
    pub fn is_complete(&self, roles: &RoleSet) -> bool {
        !self.labels.is_empty()
            && roles.len() == self.labels.len()
            && self.labels.keys().all(|id| roles.contains(id))
    }

    pub fn entries(&self) -> impl Iterator<Item = RoleInfo> + '_ {
        self.labels.iter().map(|(id, label)| RoleInfo {
            id: *id,
            label: label.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(KnownRole::iter().map(|role| RoleInfo {
            id: role.id(),
            label: role.to_string(),
        }))
    }
}
