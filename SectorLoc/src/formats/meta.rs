//! `mod_info.json` and other relaxed-JSON game files
//!
//! The game reads its JSON leniently: `#` starts a line comment outside
//! strings and trailing commas are accepted. [`strip_comments`] turns such
//! text into strict JSON for `serde_json`.

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::formats::encoding::{EncodingPolicy, read_text};

/// Remove `#` comments and trailing commas outside string literals.
#[must_use]
pub fn strip_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '#' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '}' | ']' => {
                let content_len = out.trim_end().len();
                if out[..content_len].ends_with(',') {
                    out.remove(content_len - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse relaxed JSON text.
///
/// # Errors
/// Returns [`Error::Metadata`] naming `path` if the text is not valid JSON
/// after comments and trailing commas are removed.
pub fn parse_relaxed_json(raw: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(&strip_comments(raw)).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a relaxed-JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, decoded or parsed.
pub fn read_relaxed_json(path: &Path, policy: &EncodingPolicy) -> Result<Value> {
    let decoded = read_text(path, policy)?;
    parse_relaxed_json(&decoded.text, path)
}

/// Fields of `mod_info.json` the tool cares about
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModMetadata {
    pub id: String,
    pub name: String,
    pub game_version: String,
    pub version: Option<String>,
    pub author: String,
    pub description: String,
}

impl ModMetadata {
    /// Load from a `mod_info.json` path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn load<P: AsRef<Path>>(path: P, policy: &EncodingPolicy) -> Result<Self> {
        let path = path.as_ref();
        let value = read_relaxed_json(path, policy)?;
        Self::from_value(&value, path)
    }

    /// Pick the known fields out of parsed JSON.
    ///
    /// # Errors
    /// Returns [`Error::Metadata`] if `value` is not an object.
    pub fn from_value(value: &Value, path: &Path) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                message: "top level is not an object".to_string(),
            });
        };
        let text = |key: &str| map.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        Ok(Self {
            id: text("id"),
            name: text("name"),
            game_version: text("gameVersion"),
            version: map.get("version").and_then(version_string),
            author: text("author"),
            description: text("description"),
        })
    }

    /// Whether the file named the mod at all.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Render a `version` value: strings as-is, objects as their values
/// joined with `.` in key order.
#[must_use]
pub fn version_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(parts) => {
            let parts: Vec<String> = parts
                .values()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Some(parts.join("."))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MOD_INFO: &str = r##"{
    # the id never changes
    "id": "sector_tweaks",
    "name": "Sector Tweaks", # shown in the launcher
    "author": "someone",
    "version": { "major": 1, "minor": "2", "patch": 3, },
    "gameVersion": "0.97a-RC11",
    "description": "Adds #1 ships, \"quoted\" # still text",
}"##;

    #[test]
    fn test_strip_keeps_hash_inside_strings() {
        let stripped = strip_comments(MOD_INFO);
        assert!(!stripped.contains("never changes"));
        assert!(!stripped.contains("launcher"));
        assert!(stripped.contains(r#""Adds #1 ships, \"quoted\" # still text""#));
    }

    #[test]
    fn test_parse_mod_info() {
        let value = parse_relaxed_json(MOD_INFO, Path::new("mod_info.json")).unwrap();
        let meta = ModMetadata::from_value(&value, Path::new("mod_info.json")).unwrap();
        assert_eq!(meta.id, "sector_tweaks");
        assert_eq!(meta.name, "Sector Tweaks");
        assert_eq!(meta.version.as_deref(), Some("1.2.3"));
        assert_eq!(meta.game_version, "0.97a-RC11");
        assert_eq!(meta.description, "Adds #1 ships, \"quoted\" # still text");
        assert!(meta.is_valid());
    }

    #[test]
    fn test_string_version() {
        let value: Value = serde_json::from_str(r#"{"id":"x","version":"0.3.1"}"#).unwrap();
        let meta = ModMetadata::from_value(&value, Path::new("mod_info.json")).unwrap();
        assert_eq!(meta.version.as_deref(), Some("0.3.1"));
    }

    #[test]
    fn test_trailing_comma_in_array() {
        let value = parse_relaxed_json("[1, 2,\n]", Path::new("x.json")).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[test]
    fn test_not_an_object() {
        let err = ModMetadata::from_value(&serde_json::json!([1]), Path::new("mod_info.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
    }

    #[test]
    fn test_broken_json_names_file() {
        let err = parse_relaxed_json("{\"id\": }", Path::new("mod_info.json")).unwrap_err();
        assert!(err.to_string().contains("mod_info.json"));
    }
}
