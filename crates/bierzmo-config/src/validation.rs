// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL shape, positive timeouts and a consistent role catalog.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::BierzmoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BierzmoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "app.log_level `{}` must be one of: {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        fail("api.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        || base_url.contains(char::is_whitespace)
    {
        fail(format!(
            "api.base_url `{base_url}` must be an absolute http(s) URL"
        ));
    }

    if config.api.timeout_secs == 0 {
        fail("api.timeout_secs must be greater than 0".to_string());
    }

    if !config.api.refresh_path.starts_with('/') {
        fail(format!(
            "api.refresh_path `{}` must start with `/`",
            config.api.refresh_path
        ));
    }

    if config.session.cookie_name.trim().is_empty() {
        fail("session.cookie_name must not be empty".to_string());
    }

    if config.session.cookie_max_age_hours == 0 {
        fail("session.cookie_max_age_hours must be greater than 0".to_string());
    }

    if config.roles.catalog.is_empty() {
        fail("roles.catalog must list at least one role".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, role) in config.roles.catalog.iter().enumerate() {
        if !seen_ids.insert(role.id) {
            fail(format!("duplicate role id {} in roles.catalog", role.id));
        }
        if role.label.trim().is_empty() {
            fail(format!("roles.catalog[{i}].label must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
