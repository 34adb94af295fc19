// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role- and group-based event visibility.
//!
//! An event is shown to a viewer when both halves of the rule admit it:
//! the role scope (sentinel, complete role list, or a shared role) and the
//! group scope (unrestricted, or the viewer belongs to a listed group).
//! Everything here is pure; malformed scopes were already degraded to
//! "all" when they were decoded.

use std::collections::BTreeSet;

use crate::roles::RoleCatalog;
use crate::scope::{GroupScope, RoleScope};
use crate::types::{GroupId, RoleSet};

/// Anything carrying an audience scope (events, drafts, fixtures).
pub trait Scoped {
    fn role_scope(&self) -> &RoleScope;
    fn group_scope(&self) -> &GroupScope;
}

/// The identity an event list is filtered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub roles: RoleSet,
    pub groups: BTreeSet<GroupId>,
}

impl Viewer {
    pub fn new(roles: RoleSet) -> Self {
        Self {
            roles,
            groups: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.groups.insert(group);
        self
    }
}

/// Role-only visibility check.
pub fn is_visible_to_roles(
    scope: &RoleScope,
    user_roles: &RoleSet,
    catalog: &RoleCatalog,
) -> bool {
    scope.admits(user_roles, catalog)
}

/// Full visibility check: role rule and group rule.
pub fn is_visible<E: Scoped + ?Sized>(event: &E, viewer: &Viewer, catalog: &RoleCatalog) -> bool {
    event.role_scope().admits(&viewer.roles, catalog) && event.group_scope().admits(&viewer.groups)
}

/// Keeps the events the viewer may see, preserving order.
pub fn filter_visible<'a, E: Scoped>(
    events: &'a [E],
    viewer: &Viewer,
    catalog: &RoleCatalog,
) -> Vec<&'a E> {
    let visible: Vec<&E> = events
        .iter()
        .filter(|event| is_visible(*event, viewer, catalog))
        .collect();
    tracing::debug!(
        total = events.len(),
        visible = visible.len(),
        "filtered events for viewer"
    );
    visible
}

/// Human-readable audience of an event: `Everyone`, or the role labels
/// joined with `, `. Unknown ids render as `Role #<id>`.
pub fn describe_roles(scope: &RoleScope, catalog: &RoleCatalog) -> String {
    match scope {
        RoleScope::Roles(roles) if !catalog.is_complete(roles) => roles
            .iter()
            .map(|id| catalog.label(*id))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "Everyone".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoleId;
    use proptest::prelude::*;

    struct Fixture {
        roles: RoleScope,
        groups: GroupScope,
    }

    impl Scoped for Fixture {
        fn role_scope(&self) -> &RoleScope {
            &self.roles
        }

        fn group_scope(&self) -> &GroupScope {
            &self.groups
        }
    }

    fn fixture(roles: &str, groups: &str) -> Fixture {
        Fixture {
            roles: RoleScope::parse(roles),
            groups: GroupScope::parse(groups),
        }
    }

    fn role_set(ids: &[u32]) -> RoleSet {
        ids.iter().copied().map(RoleId).collect()
    }

    #[test]
    fn scenario_role_visibility() {
        let catalog = RoleCatalog::default();
        let event = RoleScope::parse("1,2");
        assert!(is_visible_to_roles(&event, &role_set(&[2]), &catalog));
        assert!(!is_visible_to_roles(&event, &role_set(&[3]), &catalog));

        let open = RoleScope::parse("");
        for roles in [role_set(&[]), role_set(&[3]), role_set(&[1, 6])] {
            assert!(is_visible_to_roles(&open, &roles, &catalog));
        }
    }

    #[test]
    fn group_scope_is_an_independent_filter() {
        let catalog = RoleCatalog::default();
        let event = fixture("4", "9");
        let animator = Viewer::new(role_set(&[4]));

        assert!(!is_visible(&event, &animator, &catalog));
        assert!(is_visible(&event, &animator.clone().with_group(GroupId(9)), &catalog));

        let wrong_role = Viewer::new(role_set(&[6])).with_group(GroupId(9));
        assert!(!is_visible(&event, &wrong_role, &catalog));
    }

    #[test]
    fn filter_keeps_order() {
        let catalog = RoleCatalog::default();
        let events = vec![
            fixture("wszystkie", ""),
            fixture("1", ""),
            fixture("6", ""),
            fixture("5,6", "wszystkie"),
        ];
        let candidate = Viewer::new(role_set(&[6]));
        let visible = filter_visible(&events, &candidate, &catalog);
        assert_eq!(visible.len(), 3);
        assert!(std::ptr::eq(visible[0], &events[0]));
        assert!(std::ptr::eq(visible[1], &events[2]));
        assert!(std::ptr::eq(visible[2], &events[3]));
    }

    #[test]
    fn describe_everyone_for_sentinel_and_complete_list() {
        let catalog = RoleCatalog::default();
        assert_eq!(describe_roles(&RoleScope::All, &catalog), "Everyone");
        assert_eq!(
            describe_roles(&RoleScope::parse("1,2,3,4,5,6,7"), &catalog),
            "Everyone"
        );
    }

    #[test]
    fn describe_joins_labels() {
        let catalog = RoleCatalog::default();
        assert_eq!(
            describe_roles(&RoleScope::parse("2, 1"), &catalog),
            "Administrator, Pastor"
        );
    }

    #[test]
    fn describe_falls_back_for_unknown_roles() {
        let catalog = RoleCatalog::default();
        assert_eq!(
            describe_roles(&RoleScope::parse("4,31"), &catalog),
            "Animator, Role #31"
        );
    }

    fn arb_roles() -> impl Strategy<Value = RoleSet> {
        prop::collection::btree_set(1u32..12, 0..8)
            .prop_map(|ids| ids.into_iter().map(RoleId).collect())
    }

    proptest! {
        #[test]
        fn complete_list_is_equivalent_to_sentinel(user in arb_roles()) {
            let catalog = RoleCatalog::default();
            let explicit = RoleScope::Roles(catalog.all_ids());
            prop_assert_eq!(
                is_visible_to_roles(&explicit, &user, &catalog),
                is_visible_to_roles(&RoleScope::All, &user, &catalog)
            );
        }

        #[test]
        fn visibility_is_monotonic(event in arb_roles(), a in arb_roles(), extra in arb_roles()) {
            let catalog = RoleCatalog::default();
            let scope = if event.is_empty() { RoleScope::All } else { RoleScope::Roles(event) };
            let b: RoleSet = a.union(&extra).copied().collect();
            if is_visible_to_roles(&scope, &a, &catalog) {
                prop_assert!(is_visible_to_roles(&scope, &b, &catalog));
            }
        }

        #[test]
        fn describe_never_panics(raw in "[0-9a-z, ]{0,24}") {
            let catalog = RoleCatalog::default();
            let label = describe_roles(&RoleScope::parse(&raw), &catalog);
            prop_assert!(!label.is_empty());
        }
    }
}
