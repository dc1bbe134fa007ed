//! Building a starting document from the source text of a mod

use crate::entity::loader::ModData;
use crate::schema::EntityType;
use crate::translation::document::{FieldMap, TranslationDocument};

impl TranslationDocument {
    /// A document holding the untranslated text of every loaded entity.
    ///
    /// Highlighted fields are written in portable form. This is the file a
    /// translator starts from.
    #[must_use]
    pub fn extract(data: &ModData) -> Self {
        let mut document = Self::new();

        for (entity_type, table) in &data.tables {
            for record in table.iter() {
                let fields: FieldMap = record
                    .fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_portable()))
                    .collect();
                document.put(*entity_type, record.id.clone(), fields);
            }
        }

        if let Some(meta) = &data.metadata {
            let mut fields = FieldMap::new();
            fields.insert("id".to_string(), meta.id.clone());
            fields.insert("name".to_string(), meta.name.clone());
            fields.insert("description".to_string(), meta.description.clone());
            document.put(EntityType::ModMeta, "", fields);
        }

        tracing::info!(
            "Extracted {} entities from {}",
            document.len(),
            data.paths.root.display()
        );
        document
    }
}
