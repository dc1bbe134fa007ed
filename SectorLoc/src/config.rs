//! Per-mod settings read from `sectorloc.toml`
//!
//! The file is optional. Every key has a default, so an absent file, an
//! empty file and a file with only `[apply]` all load.
//!
//! ```toml
//! [encoding]
//! confidence_threshold = 0.9
//! fallbacks = ["GBK", "UTF-8", "windows-1252"]
//!
//! [apply]
//! backup_suffix = ".bak"
//! staging_prefix = ".sectorloc-staging-"
//!
//! [display]
//! open = "<font color=red>"
//! close = "</font>"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::encoding::EncodingPolicy;
use crate::highlight::DisplayMarkup;

/// File name looked up in the mod root.
pub const CONFIG_FILE_NAME: &str = "sectorloc.toml";

fn default_threshold() -> f32 {
    0.9
}

fn default_fallbacks() -> Vec<String> {
    vec!["GBK".to_string(), "UTF-8".to_string(), "windows-1252".to_string()]
}

fn default_backup_suffix() -> String {
    ".bak".to_string()
}

fn default_staging_prefix() -> String {
    ".sectorloc-staging-".to_string()
}

fn default_open() -> String {
    "<font color=red>".to_string()
}

fn default_close() -> String {
    "</font>".to_string()
}

/// The full settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub encoding: EncodingSettings,
    #[serde(default)]
    pub apply: ApplySettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Encoding detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingSettings {
    /// Guesses above this confidence are used without trying fallbacks.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f32,
    /// Encoding labels tried in order when the guess is not confident.
    #[serde(default = "default_fallbacks")]
    pub fallbacks: Vec<String>,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            fallbacks: default_fallbacks(),
        }
    }
}

/// Apply transaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplySettings {
    /// Appended to a target's file name to form its backup sibling.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    /// Prefix of the staging directory created inside the mod root.
    #[serde(default = "default_staging_prefix")]
    pub staging_prefix: String,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            backup_suffix: default_backup_suffix(),
            staging_prefix: default_staging_prefix(),
        }
    }
}

/// Preview markup wrapped around highlighted spans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_close")]
    pub close: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
        }
    }
}

impl Config {
    /// Load `sectorloc.toml` from a mod root, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] if the file exists but is not valid,
    /// or if an encoding label is unknown.
    pub fn load_for_mod(mod_root: &Path) -> Result<Self> {
        let path = mod_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, mod_root.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Load settings from an explicit path.
    ///
    /// # Errors
    /// Returns [`Error::FileIo`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;
        let config = Self::parse(&raw).map_err(|e| match e {
            Error::ConfigParse { message, .. } => Error::ConfigParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] on invalid TOML, out-of-range
    /// threshold or unknown encoding labels.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).map_err(|e| Error::ConfigParse {
            path: CONFIG_FILE_NAME.into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.encoding.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::ConfigParse {
                path: CONFIG_FILE_NAME.into(),
                message: format!("confidence_threshold {threshold} is outside 0.0..=1.0"),
            });
        }
        if self.apply.backup_suffix.is_empty() {
            return Err(Error::ConfigParse {
                path: CONFIG_FILE_NAME.into(),
                message: "backup_suffix must not be empty".to_string(),
            });
        }
        self.encoding_policy().map(|_| ()).map_err(|e| Error::ConfigParse {
            path: CONFIG_FILE_NAME.into(),
            message: e.to_string(),
        })
    }

    /// Build the decoding policy described by `[encoding]`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEncoding`] for a label `encoding_rs` does not know.
    pub fn encoding_policy(&self) -> Result<EncodingPolicy> {
        EncodingPolicy::from_labels(self.encoding.confidence_threshold, &self.encoding.fallbacks)
    }

    /// Markup used for display-form previews.
    #[must_use]
    pub fn display_markup(&self) -> DisplayMarkup {
        DisplayMarkup::new(&self.display.open, &self.display.close)
    }
}
