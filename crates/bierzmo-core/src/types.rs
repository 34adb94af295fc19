// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers shared by the API records and the visibility filter.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a user role (administrator, pastor, animator, ...).
    RoleId
);
numeric_id!(
    /// Identifier of a formation group.
    GroupId
);
numeric_id!(
    /// Identifier of a user account.
    UserId
);
numeric_id!(
    /// Identifier of a calendar event.
    EventId
);

/// The set of roles held by a user. Ordered so that rendering is stable.
pub type RoleSet = BTreeSet<RoleId>;

/// Parses a comma-separated list of numeric identifiers.
///
/// Whitespace around fragments is tolerated and unparseable fragments are
/// skipped, so `" 1, x ,3"` yields `{1, 3}`.
pub fn parse_id_list<T: From<u32> + Ord>(raw: &str) -> BTreeSet<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .filter_map(|fragment| fragment.parse::<u32>().ok())
        .map(T::from)
        .collect()
}

/// Renders identifiers back into the comma-separated wire form.
pub fn join_id_list<T: fmt::Display>(ids: impl IntoIterator<Item = T>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
