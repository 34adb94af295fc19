// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bierzmo parish client.
//!
//! This crate holds the pieces that do no I/O: the workspace error type,
//! typed identifiers, the role catalog, decoded event scopes, the event
//! visibility filter and date normalization.

pub mod dates;
pub mod error;
pub mod roles;
pub mod scope;
pub mod types;
pub mod visibility;

// Re-export key items at crate root for ergonomic imports.
pub use error::BierzmoError;
pub use roles::{KnownRole, RoleCatalog, RoleInfo};
pub use scope::{GroupScope, RoleScope};
pub use types::{EventId, GroupId, RoleId, RoleSet, UserId};
pub use visibility::{Scoped, Viewer, describe_roles, filter_visible, is_visible};
