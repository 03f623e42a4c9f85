/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Hold the notifier configuration and load it from a TOML
    settings file for command-line use.

  Security / Safety Notes:
    The API key may be supplied through BUGSNAG_API_KEY so it
    does not need to live on disk. It is never logged.

  Dependencies:
    serde + toml for parsing, dirs for default locations.

  Operational Scope:
    Read by the client at send time; loaded once by the
    `bugsnag-notify` binary.

  Revision History:
    2026-10-16 COD  Authored notifier configuration layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults, documented in one place
    - Missing explicit files are errors, missing defaults not
============================================================*/

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{NotifierError, Result};
use crate::event::BaseData;

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "BUGSNAG_API_KEY";

pub const DEFAULT_RELEASE_STAGE: &str = "production";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Transport-facing configuration owned by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub api_key: String,
    pub use_ssl: bool,
    pub notify_release_stages: BTreeSet<String>,
    pub timeout: Duration,
}

impl NotifierConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            use_ssl: false,
            notify_release_stages: default_release_stages(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Whether events tagged with `release_stage` should be sent.
    /// Events without a stage are always sent.
    pub fn should_notify(&self, release_stage: Option<&str>) -> bool {
        match release_stage {
            Some(stage) => self.notify_release_stages.contains(stage),
            None => true,
        }
    }
}

fn default_release_stages() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_RELEASE_STAGE.to_string()])
}

/// On-disk settings (`notifier.toml`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NotifierSettings {
    pub api_key: Option<String>,
    pub use_ssl: bool,
    pub timeout_secs: u64,
    pub notify_release_stages: Vec<String>,
    pub base: BaseSettings,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            use_ssl: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            notify_release_stages: vec![DEFAULT_RELEASE_STAGE.to_string()],
            base: BaseSettings::default(),
        }
    }
}

/// `[base]` table: session data merged into every event.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BaseSettings {
    pub user_id: Option<String>,
    pub app_version: Option<String>,
    pub os_version: Option<String>,
    pub release_stage: Option<String>,
    pub context: Option<String>,
}

impl From<BaseSettings> for BaseData {
    fn from(base: BaseSettings) -> Self {
        BaseData {
            user_id: base.user_id,
            app_version: base.app_version,
            os_version: base.os_version,
            release_stage: base.release_stage,
            context: base.context,
        }
    }
}

impl NotifierSettings {
    /// Default settings location, `<config dir>/bugsnag/notifier.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bugsnag").join("notifier.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(explicit) => Self::load(explicit)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::load(&default)?,
                _ => Self::default(),
            },
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                settings.api_key = Some(key);
            }
        }
        Ok(settings)
    }

    /// Parse a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            NotifierError::Config(format!(
                "Failed to read settings {}: {err}",
                path.display()
            ))
        })?;
        Self::parse(&raw)
            .map_err(|err| NotifierError::Config(format!("{}: {err}", path.display())))
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Resolve into client configuration; the API key must be present.
    pub fn into_parts(self) -> Result<(NotifierConfig, BaseData)> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                NotifierError::Config(format!(
                    "No API key configured; set `api_key` or {API_KEY_ENV}"
                ))
            })?;
        let config = NotifierConfig {
            api_key,
            use_ssl: self.use_ssl,
            notify_release_stages: self.notify_release_stages.into_iter().collect(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        };
        Ok((config, self.base.into()))
    }
}
