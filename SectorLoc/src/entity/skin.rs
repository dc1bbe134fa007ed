//! Ship skins: hull variants that override a few fields of a base hull
//!
//! A skin refers to its base hull by id and only stores what it changes.
//! Everything else is looked up on the base hull through [`SkinView`], one
//! hop deep.

use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::entity::record::EntityRecord;
use crate::error::{Error, Result};
use crate::formats::encoding::EncodingPolicy;
use crate::formats::meta::read_relaxed_json;

/// File extension of skin files
pub const SKIN_EXTENSION: &str = "skin";

/// One `.skin` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipSkin {
    pub skin_id: String,
    pub base_hull_id: String,
    pub hull_name: Option<String>,
    pub manufacturer: Option<String>,
    pub system_id: Option<String>,
    pub description_prefix: Option<String>,
    pub description_suffix: Option<String>,
    /// The skin names a ship system of its own, possibly none at all
    pub system_changed: bool,
    pub path: Option<PathBuf>,
}

impl ShipSkin {
    /// Read a skin file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or lacks
    /// `skinHullId` / `baseHullId`.
    pub fn load(path: &Path, policy: &EncodingPolicy) -> Result<Self> {
        let value = read_relaxed_json(path, policy)?;
        let mut skin = Self::from_value(&value, path)?;
        skin.path = Some(path.to_path_buf());
        Ok(skin)
    }

    /// Build from parsed skin JSON.
    ///
    /// # Errors
    /// Returns [`Error::Metadata`] if the ids are missing.
    pub fn from_value(value: &Value, path: &Path) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                message: "skin is not an object".to_string(),
            });
        };
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        let required = |key: &str| {
            text(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::Metadata {
                path: path.to_path_buf(),
                message: format!("missing '{key}'"),
            })
        };

        Ok(Self {
            skin_id: required("skinHullId")?,
            base_hull_id: required("baseHullId")?,
            hull_name: text("hullName"),
            manufacturer: text("manufacturer").or_else(|| text("tech")),
            system_id: text("systemId").filter(|v| !v.is_empty()),
            description_prefix: text("descriptionPrefix"),
            description_suffix: text("descriptionSuffix"),
            system_changed: map.contains_key("systemId"),
            path: None,
        })
    }

    /// Resolve against the base hull record, if it was loaded.
    #[must_use]
    pub fn view<'a>(&'a self, base: Option<&'a EntityRecord>) -> SkinView<'a> {
        SkinView { skin: self, base }
    }
}

/// A skin seen through its base hull
#[derive(Debug, Clone, Copy)]
pub struct SkinView<'a> {
    pub skin: &'a ShipSkin,
    pub base: Option<&'a EntityRecord>,
}

impl<'a> SkinView<'a> {
    fn base_text(&self, field: &str) -> Option<&'a str> {
        self.base.and_then(|b| b.text(field)).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn hull_name(&self) -> Option<&'a str> {
        self.skin.hull_name.as_deref().or_else(|| self.base_text("name"))
    }

    #[must_use]
    pub fn manufacturer(&self) -> Option<&'a str> {
        self.skin.manufacturer.as_deref().or_else(|| self.base_text("tech"))
    }

    /// The skin's own system, nothing if it removed the base one, or the
    /// base hull's system.
    #[must_use]
    pub fn ship_system(&self) -> Option<&'a str> {
        if let Some(id) = self.skin.system_id.as_deref() {
            return Some(id);
        }
        if self.skin.system_changed {
            return None;
        }
        self.base.and_then(EntityRecord::system_id)
    }

    /// Prefix, base long description and suffix, separated by blank lines.
    #[must_use]
    pub fn full_description(&self) -> String {
        [
            self.skin.description_prefix.as_deref(),
            self.base_text("desc_long"),
            self.skin.description_suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

/// Load every `.skin` file under `dir`.
///
/// Returns the skins that parsed and the failures for those that did not.
#[must_use]
pub fn load_skins(dir: &Path, policy: &EncodingPolicy) -> (Vec<ShipSkin>, Vec<(PathBuf, Error)>) {
    let mut skins = Vec::new();
    let mut failures = Vec::new();

    if !dir.is_dir() {
        return (skins, failures);
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.to_string_lossy().to_lowercase() == SKIN_EXTENSION)
        })
        .collect();
    paths.sort();

    for path in paths {
        match ShipSkin::load(&path, policy) {
            Ok(skin) => skins.push(skin),
            Err(e) => {
                tracing::warn!("Skipping skin {}: {}", path.display(), e);
                failures.push((path, e));
            }
        }
    }

    tracing::debug!("Loaded {} skins from {}", skins.len(), dir.display());
    (skins, failures)
}
