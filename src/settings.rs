//! Persisted user configuration with change notification.
//!
//! Settings live in a single JSON document under the platform config
//! directory. Multiple contexts read the same store; writes are
//! last-write-wins with no locking, and readers learn about changes through
//! a watch channel instead of polling.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{TranslateError, TranslateResult};
use crate::types::ProviderKind;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Persisted key-value configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: String,
    pub target_language: String,
    pub provider: ProviderKind,
    pub show_marker: bool,
    /// Bearer token for the AI provider; blank means unconfigured
    pub api_key: String,
    /// AI endpoint override; blank resolves to the well-known base
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            target_language: "zh".to_string(),
            provider: ProviderKind::DefaultFree,
            show_marker: false,
            api_key: String::new(),
            api_base_url: String::new(),
        }
    }
}

/// Owner of the settings document.
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Platform config location, e.g.
    /// `~/.config/quick-translator/settings.json`.
    pub fn default_path() -> TranslateResult<PathBuf> {
        ProjectDirs::from("", "", "quick-translator")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
            .ok_or_else(|| TranslateError::Storage("no home directory available".to_string()))
    }

    /// Open the store, reading existing settings or starting from defaults
    /// when no file exists yet.
    pub fn open(path: impl Into<PathBuf>) -> TranslateResult<Self> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| TranslateError::Storage(format!("unreadable settings file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(TranslateError::Storage(e.to_string())),
        };
        let (tx, _) = watch::channel(settings);
        Ok(Self { path, tx })
    }

    /// Current settings snapshot.
    pub fn get(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Change-notification channel; each receiver observes the latest write.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Persist new settings and notify subscribers.
    pub fn set(&self, settings: Settings) -> TranslateResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| TranslateError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&settings)
            .map_err(|e| TranslateError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| TranslateError::Storage(e.to_string()))?;
        self.tx.send_replace(settings);
        Ok(())
    }

    /// Read-modify-write helper.
    pub fn update(&self, apply: impl FnOnce(&mut Settings)) -> TranslateResult<Settings> {
        let mut settings = self.get();
        apply(&mut settings);
        self.set(settings.clone())?;
        Ok(settings)
    }
}
