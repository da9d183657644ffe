//! Application settings persisted as JSON in the user's config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mailforge_core::document::DEFAULT_WIDTH;
use mailforge_core::{AutosaveConfig, Branding, ImportOptions, MIN_AUTOSAVE_INTERVAL};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "mailforge";
const SETTINGS_FILE: &str = "settings.json";
const DATABASE_FILE: &str = "mailforge.db";

/// Branding strings spliced into the header and footer slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandingSettings {
    pub header_html: String,
    pub footer_html: String,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Database file for drafts and templates. Defaults to the data directory.
    pub database_path: Option<PathBuf>,
    /// Layout width for imported documents without a declared width.
    pub default_width: u32,
    /// Seconds between periodic draft snapshots. Zero means the shortest
    /// period the autosaver allows.
    pub autosave_interval_secs: u64,
    /// Seconds of inactivity before a debounced draft save.
    pub autosave_debounce_secs: u64,
    /// Company branding, if configured.
    pub branding: Option<BrandingSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        let autosave = AutosaveConfig::default();
        Self {
            database_path: None,
            default_width: DEFAULT_WIDTH,
            autosave_interval_secs: autosave.interval.as_secs(),
            autosave_debounce_secs: autosave.debounce.as_secs(),
            branding: None,
        }
    }
}

impl Settings {
    /// Database path, falling back to `<data dir>/mailforge/mailforge.db`.
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join(DATABASE_FILE)
        })
    }

    pub const fn autosave(&self) -> AutosaveConfig {
        AutosaveConfig::new(
            Duration::from_secs(self.autosave_interval_secs),
            Duration::from_secs(self.autosave_debounce_secs),
        )
    }

    pub fn branding(&self) -> Option<Branding> {
        self.branding.as_ref().map(|b| Branding {
            header_html: b.header_html.clone(),
            footer_html: b.footer_html.clone(),
            header_text: b.header_text.clone(),
            footer_text: b.footer_text.clone(),
        })
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            default_width: self.default_width,
            ..ImportOptions::default()
        }
    }
}

/// Default location of the settings file.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}

/// Load settings from `path`, returning defaults if the file does not exist.
pub async fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read settings from {}", path.display()))?;

    let settings: Settings = serde_json::from_str(&contents)
        .with_context(|| format!("invalid settings file {}", path.display()))?;
    if settings.autosave_interval_secs == 0 {
        tracing::warn!(
            "autosaveIntervalSecs is 0 in {:?}; using {:?}",
            path,
            MIN_AUTOSAVE_INTERVAL
        );
    }
    Ok(settings)
}

/// Save settings to `path`, creating its directory if needed.
pub async fn save_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write settings to {}", path.display()))?;

    tracing::info!("Settings saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core() {
        let settings = Settings::default();
        assert_eq!(settings.autosave(), AutosaveConfig::default());
        assert_eq!(settings.import_options().default_width, 600);
        assert!(settings.branding().is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"defaultWidth": 700, "branding": {"headerHtml": "<b>ACME</b>"}}"#,
        )
        .unwrap();
        assert_eq!(settings.default_width, 700);
        assert_eq!(settings.autosave_interval_secs, 5);

        let branding = settings.branding().unwrap();
        assert_eq!(branding.header_html, "<b>ACME</b>");
        assert!(branding.footer_html.is_empty());
        assert_eq!(branding.header_text, None);
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let settings: Settings = serde_json::from_str(r#"{"autosaveIntervalSecs": 0}"#).unwrap();
        let autosave = settings.autosave();
        assert_eq!(autosave.interval, MIN_AUTOSAVE_INTERVAL);
        assert_eq!(autosave.debounce, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults_and_save_round_trips() {
        let dir = std::env::temp_dir().join(format!("mailforge-settings-{}", std::process::id()));
        let path = dir.join(SETTINGS_FILE);
        let _ = tokio::fs::remove_dir_all(&dir).await;

        assert_eq!(load_settings(&path).await.unwrap(), Settings::default());

        let settings = Settings {
            default_width: 720,
            database_path: Some(dir.join("custom.db")),
            ..Settings::default()
        };
        save_settings(&path, &settings).await.unwrap();
        assert_eq!(load_settings(&path).await.unwrap(), settings);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
