//! Settings and document loading for the deckhand binary.
//!
//! Process settings layer defaults → TOML file → `DECKHAND_*` env vars
//! (figment). Button and device documents are read here and validated
//! by `deckhand-core`; a document that fails validation never replaces
//! previously loaded data — the caller keeps what it had.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use deckhand_core::{ButtonTree, CoreError, DeviceList};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but failed validation (`ConfigInvalid`).
    #[error(transparent)]
    Document(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Process-wide settings, mirroring the control surface's stored
/// preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run the TCP control server.
    pub tcp_listener: bool,

    /// Port the control server listens on.
    pub tcp_listen_port: u16,

    /// Default notification preference, used when a trigger carries no
    /// `notify` override.
    pub notifications: bool,

    /// Engage the lock gate at startup.
    pub start_locked: bool,

    /// Button document to load at startup.
    pub button_file: Option<PathBuf>,

    /// Device document to load at startup.
    pub device_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tcp_listener: true,
            tcp_listen_port: 5600,
            notifications: true,
            start_locked: false,
            button_file: None,
            device_file: None,
        }
    }
}

// ── Settings loading ────────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "deckhand", "deckhand").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("deckhand");
    p
}

/// Load settings from the canonical path + environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

/// Load settings from an explicit TOML path + environment. A missing
/// file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DECKHAND_"));

    Ok(figment.extract()?)
}

// ── Document loading ────────────────────────────────────────────────

/// Read and validate a button document.
pub fn load_button_tree(path: &Path) -> Result<ButtonTree, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(ButtonTree::from_json(&raw)?)
}

/// Read and validate a device document.
pub fn load_device_list(path: &Path) -> Result<DeviceList, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(DeviceList::from_json(&raw)?)
}
