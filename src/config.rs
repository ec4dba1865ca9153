//! Configuration management for the EDL language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Runtime settings (the linting and intellisense toggles), loadable
//!   from a user settings file and from `workspace/didChangeConfiguration`

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line arguments for the EDL language server
#[derive(Debug, Parser)]
#[command(name = "edl-language-server")]
#[command(about = "Language server for EDL event/state-machine files")]
#[command(version)]
pub struct Args {
    /// Custom settings file instead of the default user config location
    #[arg(long, help = "Path to a settings TOML file")]
    pub settings_file: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings file to load and watch, if it exists
    pub settings_path: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let settings_path = args.settings_file.or_else(default_settings_path);

        Ok(Config {
            settings_path,
            log_level: args.log_level,
        })
    }
}

/// Default user settings location: `<config_dir>/edl-ls/config.toml`
fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("edl-ls").join("config.toml"))
}

/// Runtime settings consumed by the lint engine and completion handler.
///
/// Read fresh on each validation pass; nothing else is cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub linting_enabled: bool,
    pub intellisense_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            linting_enabled: true,
            intellisense_enabled: true,
        }
    }
}

/// Wire/file shape of the settings: both the TOML settings file and the
/// `edl` section of the LSP configuration payload use it.
#[derive(Debug, Default, Deserialize)]
struct SettingsDoc {
    linting: Option<Toggle>,
    intellisense: Option<Toggle>,
}

#[derive(Debug, Default, Deserialize)]
struct Toggle {
    enabled: Option<bool>,
}

impl Settings {
    /// Parse settings from TOML file content.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let doc: SettingsDoc = toml::from_str(content).context("Failed to parse settings TOML")?;
        let mut settings = Settings::default();
        settings.apply(doc);
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults if it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Merge an LSP `didChangeConfiguration` payload into these settings.
    ///
    /// Accepts either the full workspace shape (`{"edl": {...}}`) or the
    /// bare `edl` section; a malformed payload leaves the current settings
    /// untouched.
    pub fn update_from_json(&mut self, value: &serde_json::Value) {
        let section = match value.get("edl") {
            Some(edl) => serde_json::from_value::<SettingsDoc>(edl.clone()),
            None => serde_json::from_value::<SettingsDoc>(value.clone()),
        };

        match section {
            Ok(doc) => self.apply(doc),
            Err(e) => log::warn!("Ignoring malformed configuration payload: {}", e),
        }
    }

    fn apply(&mut self, doc: SettingsDoc) {
        if let Some(enabled) = doc.linting.and_then(|t| t.enabled) {
            self.linting_enabled = enabled;
        }
        if let Some(enabled) = doc.intellisense.and_then(|t| t.enabled) {
            self.intellisense_enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_enabled() {
        let settings = Settings::default();
        assert!(settings.linting_enabled);
        assert!(settings.intellisense_enabled);
    }

    #[test]
    fn test_toml_partial_override() {
        let settings = Settings::from_toml_str("[linting]\nenabled = false\n").unwrap();
        assert!(!settings.linting_enabled);
        assert!(settings.intellisense_enabled);
    }

    #[test]
    fn test_json_workspace_shape() {
        let mut settings = Settings::default();
        let payload = serde_json::json!({
            "edl": {
                "linting": { "enabled": false },
                "intellisense": { "enabled": false }
            }
        });
        settings.update_from_json(&payload);
        assert!(!settings.linting_enabled);
        assert!(!settings.intellisense_enabled);
    }

    #[test]
    fn test_json_bare_section_shape() {
        let mut settings = Settings::default();
        settings.update_from_json(&serde_json::json!({
            "intellisense": { "enabled": false }
        }));
        assert!(settings.linting_enabled);
        assert!(!settings.intellisense_enabled);
    }

    #[test]
    fn test_malformed_json_is_ignored() {
        let mut settings = Settings::default();
        settings.update_from_json(&serde_json::json!({ "edl": { "linting": "yes" } }));
        assert_eq!(settings, Settings::default());
    }
}
