//! The translation document and its JSON file form

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::formats::strip_comments;
use crate::schema::EntityType;

/// Semantic field name to translated text
pub type FieldMap = IndexMap<String, String>;

static EMPTY_FIELDS: LazyLock<FieldMap> = LazyLock::new(FieldMap::new);

/// Result of merging one document into another
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Entities that were not present before
    pub added: usize,
    /// Entities whose fields were replaced
    pub replaced: usize,
}

/// Pending translations for one mod
///
/// Every entity type except `MOD_META` maps ids to field maps. `MOD_META`
/// describes the mod itself and is a single flat field map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDocument {
    entities: IndexMap<EntityType, IndexMap<String, FieldMap>>,
    mod_meta: FieldMap,
}

impl TranslationDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields of an entity, empty when there is no translation.
    ///
    /// `id` is ignored for `MOD_META`.
    #[must_use]
    pub fn get(&self, entity_type: EntityType, id: &str) -> &FieldMap {
        if entity_type == EntityType::ModMeta {
            return &self.mod_meta;
        }
        self.entities
            .get(&entity_type)
            .and_then(|ids| ids.get(id))
            .unwrap_or(&*EMPTY_FIELDS)
    }

    /// One translated field, if present.
    #[must_use]
    pub fn field(&self, entity_type: EntityType, id: &str, field: &str) -> Option<&str> {
        self.get(entity_type, id).get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, entity_type: EntityType, id: &str) -> bool {
        if entity_type == EntityType::ModMeta {
            return !self.mod_meta.is_empty();
        }
        self.entities
            .get(&entity_type)
            .is_some_and(|ids| ids.contains_key(id))
    }

    /// Replace an entity's fields wholesale. Returns the previous fields.
    pub fn put(&mut self, entity_type: EntityType, id: impl Into<String>, fields: FieldMap) -> Option<FieldMap> {
        if entity_type == EntityType::ModMeta {
            let previous = std::mem::replace(&mut self.mod_meta, fields);
            return (!previous.is_empty()).then_some(previous);
        }
        self.entities
            .entry(entity_type)
            .or_default()
            .insert(id.into(), fields)
    }

    /// Set one field, creating the entity if needed.
    pub fn set_field(
        &mut self,
        entity_type: EntityType,
        id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        let fields = if entity_type == EntityType::ModMeta {
            &mut self.mod_meta
        } else {
            self.entities
                .entry(entity_type)
                .or_default()
                .entry(id.into())
                .or_default()
        };
        fields.insert(field.into(), value.into());
    }

    /// Drop an entity's translation. Returns its fields if it had any.
    pub fn remove(&mut self, entity_type: EntityType, id: &str) -> Option<FieldMap> {
        if entity_type == EntityType::ModMeta {
            let previous = std::mem::take(&mut self.mod_meta);
            return (!previous.is_empty()).then_some(previous);
        }
        let ids = self.entities.get_mut(&entity_type)?;
        let removed = ids.shift_remove(id);
        if ids.is_empty() {
            self.entities.shift_remove(&entity_type);
        }
        removed
    }

    /// Put every entity of `other` into this document, last write wins.
    pub fn merge(&mut self, other: &TranslationDocument) -> MergeReport {
        let mut report = MergeReport::default();
        for (entity_type, id, fields) in other.iter() {
            match self.put(entity_type, id, fields.clone()) {
                Some(_) => report.replaced += 1,
                None => report.added += 1,
            }
        }
        report
    }

    /// Translated entities of one type.
    pub fn entities(&self, entity_type: EntityType) -> impl Iterator<Item = (&str, &FieldMap)> {
        self.entities
            .get(&entity_type)
            .into_iter()
            .flat_map(|ids| ids.iter().map(|(id, fields)| (id.as_str(), fields)))
    }

    /// Every entity, `MOD_META` last with an empty id.
    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &str, &FieldMap)> {
        let tabled = self.entities.iter().flat_map(|(entity_type, ids)| {
            ids.iter()
                .map(move |(id, fields)| (*entity_type, id.as_str(), fields))
        });
        let meta = (!self.mod_meta.is_empty())
            .then_some((EntityType::ModMeta, "", &self.mod_meta));
        tabled.chain(meta)
    }

    #[must_use]
    pub fn mod_meta(&self) -> &FieldMap {
        &self.mod_meta
    }

    /// Number of translated entities of one type.
    #[must_use]
    pub fn entity_count(&self, entity_type: EntityType) -> usize {
        if entity_type == EntityType::ModMeta {
            return usize::from(!self.mod_meta.is_empty());
        }
        self.entities.get(&entity_type).map_or(0, IndexMap::len)
    }

    /// Number of translated entities across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        EntityType::ALL.into_iter().map(|t| self.entity_count(t)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==================== JSON form ====================

    /// The document as a JSON object keyed by type tag.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for entity_type in EntityType::ALL {
            if entity_type == EntityType::ModMeta {
                if !self.mod_meta.is_empty() {
                    root.insert(entity_type.tag().to_string(), fields_to_value(&self.mod_meta));
                }
                continue;
            }
            let Some(ids) = self.entities.get(&entity_type) else {
                continue;
            };
            let bucket: Map<String, Value> = ids
                .iter()
                .map(|(id, fields)| (id.clone(), fields_to_value(fields)))
                .collect();
            root.insert(entity_type.tag().to_string(), Value::Object(bucket));
        }
        Value::Object(root)
    }

    /// Pretty-printed JSON text.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Write the document to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| Error::file_io(path, e))?;
        tracing::info!("Saved {} translated entities to {}", self.len(), path.display());
        Ok(())
    }

    /// Parse a document from a JSON value.
    ///
    /// Unknown top-level keys are skipped with a warning.
    ///
    /// # Errors
    /// Returns [`Error::DocumentFormat`] naming the JSON path of the first
    /// value that has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = expect_object(value, "$")?;
        let mut document = Self::new();

        for (tag, bucket) in root {
            let Some(entity_type) = EntityType::from_tag(tag) else {
                tracing::warn!("Skipping unknown entity type '{}' in translation document", tag);
                continue;
            };
            let bucket_path = format!("$.{tag}");

            if entity_type == EntityType::ModMeta {
                document.mod_meta = fields_from_value(bucket, &bucket_path)?;
                continue;
            }

            let ids = expect_object(bucket, &bucket_path)?;
            let mut parsed = IndexMap::with_capacity(ids.len());
            for (id, fields) in ids {
                parsed.insert(id.clone(), fields_from_value(fields, &format!("{bucket_path}.{id}"))?);
            }
            if !parsed.is_empty() {
                document.entities.insert(entity_type, parsed);
            }
        }

        Ok(document)
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    /// Returns [`Error::DocumentFormat`] for invalid JSON (at path `$`) or
    /// a valid JSON value of the wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::DocumentFormat {
            path: "$".to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Read a document file. `#` comments and trailing commas are accepted.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;
        let document = Self::from_json(&strip_comments(&json))?;
        tracing::info!("Loaded {} translated entities from {}", document.len(), path.display());
        Ok(document)
    }
}

fn fields_to_value(fields: &FieldMap) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| Error::DocumentFormat {
        path: path.to_string(),
        message: format!("expected an object, found {}", kind_of(value)),
    })
}

fn fields_from_value(value: &Value, path: &str) -> Result<FieldMap> {
    expect_object(value, path)?
        .iter()
        .map(|(field, text)| match text {
            Value::String(s) => Ok((field.clone(), s.clone())),
            other => Err(Error::DocumentFormat {
                path: format!("{path}.{field}"),
                message: format!("expected a string, found {}", kind_of(other)),
            }),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn sample() -> TranslationDocument {
        let mut doc = TranslationDocument::new();
        doc.put(EntityType::Ship, "hound", fields(&[("name", "猎犬"), ("desc_long", "")]));
        doc.put(
            EntityType::Weapon,
            "flak",
            fields(&[("special_effect_1", "造成{{火焰}}伤害")]),
        );
        doc.put(EntityType::ModMeta, "", fields(&[("id", "tweaks"), ("name", "调整")]));
        doc
    }

    #[test]
    fn test_get_absent_is_empty() {
        let doc = sample();
        assert!(doc.get(EntityType::Faction, "pirates").is_empty());
        assert!(doc.get(EntityType::Ship, "wolf").is_empty());
        assert_eq!(doc.field(EntityType::Ship, "hound", "name"), Some("猎犬"));
    }

    #[test]
    fn test_mod_meta_ignores_id() {
        let doc = sample();
        assert_eq!(doc.get(EntityType::ModMeta, "anything")["name"], "调整");
        assert_eq!(doc.entity_count(EntityType::ModMeta), 1);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let mut doc = sample();
        let previous = doc.put(EntityType::Ship, "hound", fields(&[("role", "护卫舰")]));
        assert_eq!(previous.unwrap()["name"], "猎犬");
        assert_eq!(doc.get(EntityType::Ship, "hound"), &fields(&[("role", "护卫舰")]));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample();
        let json = doc.to_json().unwrap();
        assert_eq!(TranslationDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_missing_type_imports_as_empty() {
        let doc = TranslationDocument::from_json(r#"{"SHIP": {"hound": {"name": "Hound"}}}"#).unwrap();
        assert!(doc.get(EntityType::Faction, "any").is_empty());
        assert_eq!(doc.entity_count(EntityType::Faction), 0);
    }

    #[test]
    fn test_unknown_keys_skipped() {
        let doc = TranslationDocument::from_json(r#"{"CUSTOM": {"x": {"a": "b"}}, "SHIP": {}}"#).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_format_error_names_path() {
        let err = TranslationDocument::from_json(r#"{"SHIP": {"hound": {"name": 3}}}"#).unwrap_err();
        match err {
            Error::DocumentFormat { path, .. } => assert_eq!(path, "$.SHIP.hound.name"),
            other => panic!("unexpected error: {other}"),
        }

        let err = TranslationDocument::from_json(r#"{"WEAPON": []}"#).unwrap_err();
        assert!(matches!(err, Error::DocumentFormat { ref path, .. } if path == "$.WEAPON"));

        let err = TranslationDocument::from_json(r#"{"MOD_META": {"name": null}}"#).unwrap_err();
        assert!(matches!(err, Error::DocumentFormat { ref path, .. } if path == "$.MOD_META.name"));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = TranslationDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::DocumentFormat { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_load_accepts_comments_and_trailing_commas() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hand_edited.translate");
        std::fs::write(
            &path,
            "{\n  # reviewed\n  \"SHIP\": {\"hound\": {\"name\": \"Hound #1\",},},\n}\n",
        )
        .unwrap();
        let doc = TranslationDocument::load(&path).unwrap();
        assert_eq!(doc.field(EntityType::Ship, "hound", "name"), Some("Hound #1"));
    }

    #[test]
    fn test_merge_report() {
        let mut base = sample();
        let mut overlay = TranslationDocument::new();
        overlay.put(EntityType::Ship, "hound", fields(&[("name", "猎犬级")]));
        overlay.put(EntityType::Faction, "pirates", fields(&[("description", "海盗")]));

        let report = base.merge(&overlay);
        assert_eq!(report, MergeReport { added: 1, replaced: 1 });
        assert_eq!(base.field(EntityType::Ship, "hound", "name"), Some("猎犬级"));
        assert_eq!(base.field(EntityType::Ship, "hound", "desc_long"), None);
    }

    #[test]
    fn test_remove_drops_empty_bucket() {
        let mut doc = sample();
        assert!(doc.remove(EntityType::Weapon, "flak").is_some());
        assert_eq!(doc.entity_count(EntityType::Weapon), 0);
        let json = doc.to_json().unwrap();
        assert!(!json.contains("WEAPON"));
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("zh.translate");
        let doc = sample();
        doc.save(&path).unwrap();
        assert_eq!(TranslationDocument::load(&path).unwrap(), doc);
    }
}
