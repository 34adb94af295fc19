// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy, highest precedence first: `./bierzmo.toml`,
//! `~/.config/bierzmo/bierzmo.toml`, `/etc/bierzmo/bierzmo.toml`. Environment
//! variables with the `BIERZMO_` prefix override all of them.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed here

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BierzmoConfig;

/// Top-level config sections, used to map `BIERZMO_<SECTION>_<KEY>` env vars.
const SECTIONS: &[&str] = &["app", "api", "session", "roles"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bierzmo/bierzmo.toml` (system-wide)
/// 3. `~/.config/bierzmo/bierzmo.toml` (user XDG config)
/// 4. `./bierzmo.toml` (local directory)
/// 5. `BIERZMO_*` environment variables
pub fn load_config() -> Result<BierzmoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BierzmoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BierzmoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BierzmoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BierzmoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BierzmoConfig::default()))
        .merge(Toml::file("/etc/bierzmo/bierzmo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bierzmo/bierzmo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bierzmo.toml"))
        .merge(env_provider())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config key.
///
/// Only the first `_` after a known section name becomes a dot, so
/// `session_cookie_name` maps to `session.cookie_name`.
pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Figment hands `map` the key with its original case, so it is lowercased
/// before the section split.
fn env_provider() -> Env {
    Env::prefixed("BIERZMO_")
        .map(|key| env_key_to_path(&key.as_str().to_ascii_lowercase()).into())
}
