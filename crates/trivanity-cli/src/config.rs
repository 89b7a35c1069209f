//! Settings file and command-line overrides

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use trivanity_core::{ChainKind, SearchSettings};

pub const DEFAULT_CONFIG_PATH: &str = "wallet_config.json";

/// Read settings from `path`, falling back to defaults for anything absent.
///
/// A missing file is not an error; a malformed one is.
pub fn load_settings(path: &Path) -> Result<SearchSettings> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(SearchSettings::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let settings: SearchSettings = serde_json::from_str(&text)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings.with_defaults())
}

pub fn save_settings(path: &Path, settings: &SearchSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Command-line values layered over the settings file
#[derive(Debug, Default)]
pub struct Overrides {
    /// When non-empty, exactly these chains are enabled
    pub chains: Vec<ChainKind>,
    /// Shared prefix for every enabled chain
    pub prefix: Option<String>,
    /// Shared suffix for every enabled chain
    pub suffix: Option<String>,
    pub case_sensitive: bool,
    pub no_save: bool,
}

impl Overrides {
    pub fn apply(&self, mut settings: SearchSettings) -> SearchSettings {
        if !self.chains.is_empty() {
            for (kind, entry) in settings.chains.iter_mut() {
                entry.enabled = self.chains.contains(kind);
            }
        }

        for entry in settings.chains.values_mut().filter(|c| c.enabled) {
            if let Some(prefix) = &self.prefix {
                entry.prefix = prefix.clone();
            }
            if let Some(suffix) = &self.suffix {
                entry.suffix = suffix.clone();
            }
        }

        if self.case_sensitive {
            settings.case_sensitive = true;
        }
        if self.no_save {
            settings.save_local = false;
        }
        settings
    }
}
