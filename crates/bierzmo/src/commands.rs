// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Each returns the lines to print so the
//! rendering can be tested without capturing stdout.

use std::sync::Arc;

use bierzmo_client::{ApiClient, Event, ExpiryNotifier, TracingNotifier, User};
use bierzmo_config::BierzmoConfig;
use bierzmo_core::dates::format_display;
use bierzmo_core::{
    BierzmoError, GroupId, GroupScope, RoleCatalog, RoleId, describe_roles, filter_visible,
};
use tracing::debug;

/// Shows the session-expired message on the terminal as well as in the log.
struct TerminalNotifier;

impl ExpiryNotifier for TerminalNotifier {
    fn session_expired(&self, message: &str, reason: &str) {
        TracingNotifier.session_expired(message, reason);
        eprintln!("bierzmo: {message}");
    }
}

pub fn connect(config: &BierzmoConfig) -> Result<ApiClient, BierzmoError> {
    ApiClient::from_config(config, Arc::new(TerminalNotifier))
}

pub fn check(config: &BierzmoConfig) -> String {
    format!(
        "configuration OK\nbackend: {}\nroles: {}",
        config.api.base_url,
        config.roles.catalog.len()
    )
}

pub fn roles(catalog: &RoleCatalog) -> String {
    catalog
        .entries()
        .map(|role| format!("{:>3}  {}", role.id.0, role.label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Logs in with the credentials from `[session]`.
pub async fn login(client: &ApiClient, config: &BierzmoConfig) -> Result<User, BierzmoError> {
    let (Some(identifier), Some(password)) = (
        config.session.identifier.as_deref(),
        config.session.password.as_deref(),
    ) else {
        return Err(BierzmoError::Config(
            "session.identifier and session.password must be set to log in".to_string(),
        ));
    };
    client.auth().login(identifier, password).await
}

/// How long the backend keeps the session cookie, as configured.
pub fn describe_session(config: &BierzmoConfig) -> String {
    let hours = config.session.cookie_max_age_hours;
    if hours % 24 == 0 {
        let days = hours / 24;
        format!("session valid for up to {days} day{}", if days == 1 { "" } else { "s" })
    } else {
        format!("session valid for up to {hours}h")
    }
}

pub fn describe_user(user: &User, catalog: &RoleCatalog) -> String {
    let roles = if user.roles.is_empty() {
        "-".to_string()
    } else {
        user.roles
            .iter()
            .map(|id| catalog.label(*id))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let group = user
        .group
        .map(|group| format!(", group {group}"))
        .unwrap_or_default();
    format!("logged in as {} ({roles}{group})", user.display_name())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EventFilter {
    pub role: Option<RoleId>,
    pub group: Option<GroupId>,
    pub all: bool,
}

/// Fetches events and renders the ones `user` may see (every event with
/// `all`).
pub async fn events(
    client: &ApiClient,
    user: &User,
    filter: &EventFilter,
) -> Result<Vec<String>, BierzmoError> {
    let api = client.events();
    let fetched = match (filter.role, filter.group) {
        (Some(role), _) => api.list_for_role(role).await?,
        (None, Some(group)) => api.list_for_group(group).await?,
        (None, None) => api.list().await?,
    };

    let shown: Vec<&Event> = if filter.all {
        fetched.iter().collect()
    } else {
        filter_visible(&fetched, &user.viewer(), client.catalog())
    };
    debug!(fetched = fetched.len(), shown = shown.len(), "events ready");

    Ok(shown
        .into_iter()
        .map(|event| render_event(event, client.catalog()))
        .collect())
}

fn render_event(event: &Event, catalog: &RoleCatalog) -> String {
    let when = event
        .starts_at
        .as_ref()
        .map(format_display)
        .unwrap_or_else(|| "----------------".to_string());
    let audience = describe_roles(&event.roles, catalog);
    match &event.groups {
        GroupScope::All => format!("#{:<4} {when}  {}  [{audience}]", event.id.0, event.title),
        groups => format!(
            "#{:<4} {when}  {}  [{audience}; groups {groups}]",
            event.id.0, event.title
        ),
    }
}

pub async fn groups(client: &ApiClient) -> Result<Vec<String>, BierzmoError> {
    Ok(client
        .groups()
        .list()
        .await?
        .into_iter()
        .map(|group| format!("{:>3}  {}", group.id.0, group.name))
        .collect())
}
