// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bierzmo parish client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use bierzmo_core::{RoleCatalog, RoleInfo};
use serde::{Deserialize, Serialize};

/// Top-level Bierzmo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BierzmoConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session cookie and login credentials.
    #[serde(default)]
    pub session: SessionConfig,

    /// Known role catalog used for event visibility and labels.
    #[serde(default)]
    pub roles: RolesConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Backend REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path of the session refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            refresh_path: default_refresh_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_refresh_path() -> String {
    "/auth/refresh-token".to_string()
}

/// Session cookie and credential configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the cookie the backend stores the session token in.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Lifetime the backend gives the session cookie, in hours.
    #[serde(default = "default_cookie_max_age_hours")]
    pub cookie_max_age_hours: u64,

    /// Login identifier (e-mail or username) used by the CLI.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Login password used by the CLI. Prefer `BIERZMO_SESSION_PASSWORD`.
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_max_age_hours", &self.cookie_max_age_hours)
            .field("identifier", &self.identifier)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_max_age_hours: default_cookie_max_age_hours(),
            identifier: None,
            password: None,
        }
    }
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_cookie_max_age_hours() -> u64 {
    24
}

/// Role catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RolesConfig {
    /// Every role the backend knows. An event addressed to all of them is
    /// treated as addressed to everyone.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<RoleInfo>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

impl RolesConfig {
    /// Builds the lookup structure used by the visibility filter.
    pub fn to_catalog(&self) -> RoleCatalog {
        RoleCatalog::new(self.catalog.iter().cloned())
    }
}

fn default_catalog() -> Vec<RoleInfo> {
    RoleCatalog::default().entries().collect()
}
