//! Translating `mod_info.json`

use std::path::Path;

use serde_json::Value;

use super::stage_write;
use crate::error::{Error, Result};
use crate::formats::encoding::EncodingPolicy;
use crate::formats::meta::read_relaxed_json;
use crate::schema::MOD_META;
use crate::translation::TranslationDocument;

/// Write `mod_info.json` with the document's `MOD_META` name and
/// description.
///
/// Only keys that already exist are replaced, and only with non-empty
/// values. Other keys and their order are kept. When something changed the
/// file is rewritten as pretty JSON without its comments; otherwise the
/// source bytes are copied unchanged. Returns the number of keys replaced.
///
/// # Errors
/// Returns [`Error::Metadata`] if the source is not a JSON object, or an
/// IO error if the output cannot be written.
pub fn inject_metadata(
    source: &Path,
    output: &Path,
    doc: &TranslationDocument,
    policy: &EncodingPolicy,
) -> Result<usize> {
    let mut value = read_relaxed_json(source, policy)?;
    let Value::Object(map) = &mut value else {
        return Err(Error::Metadata {
            path: source.to_path_buf(),
            message: "top level is not an object".to_string(),
        });
    };

    let translated = doc.mod_meta();
    let mut replaced = 0;
    for spec in MOD_META.direct_fields {
        let Some(text) = translated.get(spec.name).filter(|t| !t.is_empty()) else {
            continue;
        };
        if let Some(slot) = map.get_mut(spec.column) {
            if slot.as_str() != Some(text.as_str()) {
                *slot = Value::String(text.clone());
                replaced += 1;
            }
        } else {
            tracing::debug!("{} has no '{}' key, not adding one", source.display(), spec.column);
        }
    }

    if replaced == 0 {
        let bytes = std::fs::read(source).map_err(|e| Error::file_io(source, e))?;
        stage_write(output, &bytes)?;
    } else {
        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');
        stage_write(output, json.as_bytes())?;
    }

    tracing::info!("Injected {}: {} keys replaced", source.display(), replaced);
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityType;
    use pretty_assertions::assert_eq;

    const MOD_INFO: &str = "{\n  # launcher entry\n  \"id\": \"tweaks\",\n  \"name\": \"Tweaks\",\n  \"version\": \"1.0\",\n  \"description\": \"Small fixes\",\n}\n";

    #[test]
    fn test_replaces_name_and_description_only() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("mod_info.json");
        let output = temp.path().join("out.json");
        std::fs::write(&source, MOD_INFO).unwrap();

        let mut doc = TranslationDocument::new();
        doc.set_field(EntityType::ModMeta, "", "id", "ignored");
        doc.set_field(EntityType::ModMeta, "", "name", "微调");
        doc.set_field(EntityType::ModMeta, "", "description", "");

        let replaced = inject_metadata(&source, &output, &doc, &EncodingPolicy::default()).unwrap();
        assert_eq!(replaced, 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\n  \"id\": \"tweaks\",\n  \"name\": \"微调\",\n  \"version\": \"1.0\",\n  \"description\": \"Small fixes\"\n}\n"
        );
    }

    #[test]
    fn test_untranslated_copies_bytes() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("mod_info.json");
        let output = temp.path().join("out.json");
        std::fs::write(&source, MOD_INFO).unwrap();

        let replaced =
            inject_metadata(&source, &output, &TranslationDocument::new(), &EncodingPolicy::default()).unwrap();
        assert_eq!(replaced, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), MOD_INFO);
    }

    #[test]
    fn test_missing_key_not_added() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("mod_info.json");
        let output = temp.path().join("out.json");
        std::fs::write(&source, "{\"id\": \"tweaks\"}").unwrap();

        let mut doc = TranslationDocument::new();
        doc.set_field(EntityType::ModMeta, "", "name", "微调");
        assert_eq!(inject_metadata(&source, &output, &doc, &EncodingPolicy::default()).unwrap(), 0);
    }
}
