// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event audience scopes, decoded once from the backend's string fields.
//!
//! The backend stores the audience of an event as two strings: `dlaroli`
//! (a comma-separated role list or a sentinel) and `dlagrupy` (a group id or
//! a sentinel). Both are turned into tagged variants here so that consumers
//! never re-parse them.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::roles::RoleCatalog;
use crate::types::{GroupId, RoleId, RoleSet, join_id_list, parse_id_list};

/// Sentinel written by the backend for "no restriction".
pub const WIRE_ALL: &str = "wszystkie";

/// Returns true for the empty string and the "all" sentinels.
fn is_unrestricted_wire(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(WIRE_ALL)
        || trimmed.eq_ignore_ascii_case("all")
}

/// Raw shapes the scope fields arrive in: a string, a bare id, an id array
/// or `null`. Anything else lands in `Other` so that one malformed row never
/// fails a whole listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireScope {
    Null(()),
    Number(u32),
    List(Vec<u32>),
    Text(String),
    Other(IgnoredAny),
}

/// Which roles an event is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireScope", into = "String")]
pub enum RoleScope {
    /// Visible to every role.
    #[default]
    All,
    /// Visible to holders of at least one of these roles.
    Roles(RoleSet),
}

impl RoleScope {
    /// Decodes the wire form. Never fails: malformed input degrades to
    /// [`RoleScope::All`].
    pub fn parse(raw: &str) -> Self {
        if is_unrestricted_wire(raw) {
            return RoleScope::All;
        }
        let roles: RoleSet = parse_id_list(raw);
        if roles.is_empty() {
            tracing::debug!(raw, "role scope has no parseable role ids, treating as all");
            RoleScope::All
        } else {
            RoleScope::Roles(roles)
        }
    }

    /// True when this scope addresses everyone: the sentinel, or an explicit
    /// list of every role in the catalog.
    pub fn is_unrestricted(&self, catalog: &RoleCatalog) -> bool {
        match self {
            RoleScope::All => true,
            RoleScope::Roles(roles) => catalog.is_complete(roles),
        }
    }

    /// Role half of the visibility rule: a user sees the event when the scope
    /// is unrestricted or when they hold at least one listed role.
    pub fn admits(&self, user_roles: &RoleSet, catalog: &RoleCatalog) -> bool {
        match self {
            RoleScope::All => true,
            RoleScope::Roles(roles) => {
                catalog.is_complete(roles) || !roles.is_disjoint(user_roles)
            }
        }
    }

    /// Collapses an explicit list of every known role into the sentinel.
    pub fn normalized(self, catalog: &RoleCatalog) -> Self {
        if self.is_unrestricted(catalog) {
            RoleScope::All
        } else {
            self
        }
    }

    /// Wire representation.
    pub fn to_wire(&self) -> String {
        match self {
            RoleScope::All => WIRE_ALL.to_string(),
            RoleScope::Roles(roles) => join_id_list(roles),
        }
    }
}

impl FromStr for RoleScope {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<WireScope> for RoleScope {
    fn from(raw: WireScope) -> Self {
        match raw {
            WireScope::Null(()) => RoleScope::All,
            WireScope::Number(id) => RoleScope::Roles([RoleId(id)].into_iter().collect()),
            WireScope::List(ids) if ids.is_empty() => RoleScope::All,
            WireScope::List(ids) => RoleScope::Roles(ids.into_iter().map(RoleId).collect()),
            WireScope::Text(text) => RoleScope::parse(&text),
            WireScope::Other(_) => {
                tracing::debug!("role scope has an unexpected shape, treating as all");
                RoleScope::All
            }
        }
    }
}

impl From<RoleScope> for String {
    fn from(scope: RoleScope) -> Self {
        scope.to_wire()
    }
}

/// Which formation groups an event is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireScope", into = "String")]
pub enum GroupScope {
    /// Not restricted to any group.
    #[default]
    All,
    /// Visible only to members of one of these groups.
    Groups(BTreeSet<GroupId>),
}

impl GroupScope {
    /// Decodes the wire form; malformed input degrades to [`GroupScope::All`].
    pub fn parse(raw: &str) -> Self {
        if is_unrestricted_wire(raw) {
            return GroupScope::All;
        }
        let groups: BTreeSet<GroupId> = parse_id_list(raw);
        if groups.is_empty() {
            tracing::debug!(raw, "group scope has no parseable group ids, treating as all");
            GroupScope::All
        } else {
            GroupScope::Groups(groups)
        }
    }

    pub fn single(group: GroupId) -> Self {
        GroupScope::Groups([group].into_iter().collect())
    }

    /// Group half of the visibility rule.
    pub fn admits(&self, user_groups: &BTreeSet<GroupId>) -> bool {
        match self {
            GroupScope::All => true,
            GroupScope::Groups(groups) => !groups.is_disjoint(user_groups),
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            GroupScope::All => WIRE_ALL.to_string(),
            GroupScope::Groups(groups) => join_id_list(groups),
        }
    }
}

impl FromStr for GroupScope {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for GroupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<WireScope> for GroupScope {
    fn from(raw: WireScope) -> Self {
        match raw {
            WireScope::Null(()) => GroupScope::All,
            WireScope::Number(id) => GroupScope::single(GroupId(id)),
            WireScope::List(ids) if ids.is_empty() => GroupScope::All,
            WireScope::List(ids) => GroupScope::Groups(ids.into_iter().map(GroupId).collect()),
            WireScope::Text(text) => GroupScope::parse(&text),
            WireScope::Other(_) => {
                tracing::debug!("group scope has an unexpected shape, treating as all");
                GroupScope::All
            }
        }
    }
}

impl From<GroupScope> for String {
    fn from(scope: GroupScope) -> Self {
        scope.to_wire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(ids: &[u32]) -> RoleSet {
        ids.iter().copied().map(RoleId).collect()
    }

    #[test]
    fn sentinels_and_empty_parse_as_all() {
        for raw in ["", "   ", "all", "ALL", "wszystkie", " Wszystkie "] {
            assert_eq!(RoleScope::parse(raw), RoleScope::All, "raw = {raw:?}");
            assert_eq!(GroupScope::parse(raw), GroupScope::All, "raw = {raw:?}");
        }
    }

    #[test]
    fn role_list_parses_with_whitespace() {
        assert_eq!(RoleScope::parse(" 1 , 2"), RoleScope::Roles(roles(&[1, 2])));
    }

    #[test]
    fn garbage_only_list_degrades_to_all() {
        assert_eq!(RoleScope::parse("abc, ,x"), RoleScope::All);
        assert_eq!(GroupScope::parse("grupa"), GroupScope::All);
    }

    #[test]
    fn normalized_collapses_complete_list() {
        let catalog = RoleCatalog::default();
        let every = RoleScope::Roles(catalog.all_ids());
        assert_eq!(every.normalized(&catalog), RoleScope::All);

        let partial = RoleScope::Roles(roles(&[1, 2]));
        assert_eq!(partial.clone().normalized(&catalog), partial);
    }

    #[test]
    fn deserializes_from_backend_shapes() {
        let text: RoleScope = serde_json::from_str("\"1,2\"").unwrap();
        assert_eq!(text, RoleScope::Roles(roles(&[1, 2])));

        let sentinel: RoleScope = serde_json::from_str("\"wszystkie\"").unwrap();
        assert_eq!(sentinel, RoleScope::All);

        let null: GroupScope = serde_json::from_str("null").unwrap();
        assert_eq!(null, GroupScope::All);

        let number: GroupScope = serde_json::from_str("3").unwrap();
        assert_eq!(number, GroupScope::single(GroupId(3)));
    }

    #[test]
    fn unexpected_shapes_degrade_to_all() {
        for raw in ["true", "-1", "1.5", r#"["1","2"]"#, r#"{"a":1}"#] {
            let roles: RoleScope = serde_json::from_str(raw).unwrap();
            assert_eq!(roles, RoleScope::All, "raw = {raw}");
            let groups: GroupScope = serde_json::from_str(raw).unwrap();
            assert_eq!(groups, GroupScope::All, "raw = {raw}");
        }
    }

    #[test]
    fn serializes_to_wire_strings() {
        let json = serde_json::to_string(&RoleScope::Roles(roles(&[4, 2]))).unwrap();
        assert_eq!(json, "\"2,4\"");
        let json = serde_json::to_string(&GroupScope::All).unwrap();
        assert_eq!(json, "\"wszystkie\"");
    }

    #[test]
    fn group_scope_requires_membership() {
        let scope = GroupScope::single(GroupId(5));
        let member: BTreeSet<GroupId> = [GroupId(5)].into_iter().collect();
        let outsider: BTreeSet<GroupId> = [GroupId(6)].into_iter().collect();
        assert!(scope.admits(&member));
        assert!(!scope.admits(&outsider));
        assert!(!scope.admits(&BTreeSet::new()));
        assert!(GroupScope::All.admits(&BTreeSet::new()));
    }
}
