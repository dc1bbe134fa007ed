//! Index over the shared `descriptions.csv`
//!
//! Long-form text for every entity type sits in one table keyed by
//! `(id, type)`, with generic `text1`..`text4` columns whose meaning depends
//! on the type. The index projects each row through its type's description
//! fields once, at load time.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use indexmap::IndexMap;

use crate::entity::record::{FieldColumns, FieldValue};
use crate::error::Result;
use crate::formats::encoding::EncodingPolicy;
use crate::formats::table::{RowKind, Table};
use crate::schema::EntityType;

/// Column holding the row's entity type tag
pub const TYPE_COLUMN: &str = "type";
/// Column holding the row's entity id
pub const ID_COLUMN: &str = "id";

/// Description fields of one entity, by semantic name
pub type DescriptionBucket = IndexMap<String, FieldValue>;

/// Description buckets keyed by `(type, id)`
#[derive(Debug, Clone, Default)]
pub struct DescriptionIndex {
    entries: IndexMap<(EntityType, String), DescriptionBucket>,
}

impl DescriptionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and index a descriptions table.
    ///
    /// # Errors
    /// Returns an error if the table cannot be read or lacks `id` / `type`.
    pub fn read<P: AsRef<Path>>(path: P, policy: &EncodingPolicy) -> Result<Self> {
        let table = Table::read(path, policy)?;
        Self::build(&table)
    }

    /// Index a parsed descriptions table.
    ///
    /// # Errors
    /// Returns [`crate::Error::SchemaColumnMissing`] if the header lacks
    /// `id` or `type`.
    pub fn build(table: &Table) -> Result<Self> {
        let id_index = table.column_index(ID_COLUMN)?;
        let type_index = table.column_index(TYPE_COLUMN)?;

        let mut columns: HashMap<EntityType, Vec<FieldColumns>> = HashMap::new();
        let mut unknown: BTreeMap<String, usize> = BTreeMap::new();
        let mut index = Self::new();

        for row in &table.rows {
            if row.kind(id_index) != RowKind::Data {
                continue;
            }
            let tag = row.get(type_index).trim();
            let Some(entity_type) = EntityType::from_tag(tag) else {
                *unknown.entry(tag.to_string()).or_default() += 1;
                continue;
            };
            let schema = entity_type.schema();
            if schema.description_fields.is_empty() {
                *unknown.entry(tag.to_string()).or_default() += 1;
                continue;
            }

            if !columns.contains_key(&entity_type) {
                columns.insert(
                    entity_type,
                    FieldColumns::resolve_all(table, schema.description_fields)?,
                );
            }
            let fields = &columns[&entity_type];

            let bucket: DescriptionBucket = fields
                .iter()
                .map(|f| (f.spec.name.to_string(), f.read(row)))
                .collect();

            let id = row.id(id_index).to_string();
            if index.entries.insert((entity_type, id.clone()), bucket).is_some() {
                tracing::warn!(
                    "{}: duplicate description for {} '{}' at line {}, keeping the later row",
                    table.name,
                    entity_type,
                    id,
                    row.line
                );
            }
        }

        for (tag, count) in &unknown {
            tracing::warn!(
                "{}: skipped {} row(s) with untranslated type '{}'",
                table.name,
                count,
                tag
            );
        }

        tracing::debug!("{}: indexed {} descriptions", table.name, index.len());
        Ok(index)
    }

    /// The bucket for an entity, if the table has one.
    #[must_use]
    pub fn get(&self, entity_type: EntityType, id: &str) -> Option<&DescriptionBucket> {
        self.entries.get(&(entity_type, id.to_string()))
    }

    /// Buckets of one entity type in table order.
    pub fn entries(&self, entity_type: EntityType) -> impl Iterator<Item = (&str, &DescriptionBucket)> {
        self.entries
            .iter()
            .filter(move |((t, _), _)| *t == entity_type)
            .map(|((_, id), bucket)| (id.as_str(), bucket))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    const DESCRIPTIONS: &str = "\
id,type,text1,text2,text3,text4
#ships,,,,,
hound,SHIP,A fast frigate.,Fast.,Hound-class,
fastmissileracks,SHIP_SYSTEM,Reloads missiles.,Special,Reloads all missiles in 2 seconds.,2 seconds
pirates,FACTION,Scum of the sector.,,,
,SHIP,orphan text,,,
odd,CUSTOM,not ours,,,
hound,SHIP,A faster frigate.,Faster.,Hound-class,
";

    fn index() -> DescriptionIndex {
        let table = Table::parse("descriptions.csv", DESCRIPTIONS).unwrap();
        DescriptionIndex::build(&table).unwrap()
    }

    #[test]
    fn test_projects_rows_through_schema() {
        let index = index();
        let hound = index.get(EntityType::Ship, "hound").unwrap();
        let names: Vec<&str> = hound.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["desc_long", "desc_short", "desc_fleet"]);

        let faction = index.get(EntityType::Faction, "pirates").unwrap();
        assert_eq!(faction["description"].text(), "Scum of the sector.");
    }

    #[test]
    fn test_highlighted_description() {
        let index = index();
        let system = index.get(EntityType::ShipSystem, "fastmissileracks").unwrap();
        assert_eq!(
            system["desc_on_ship"].to_portable(),
            "Reloads all missiles in {{2 seconds}}."
        );
    }

    #[test]
    fn test_skips_comments_orphans_and_unknown_types() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert!(index.get(EntityType::Ship, "").is_none());
    }

    #[test]
    fn test_duplicate_keeps_later_row() {
        let index = index();
        let hound = index.get(EntityType::Ship, "hound").unwrap();
        assert_eq!(hound["desc_long"].text(), "A faster frigate.");
    }

    #[test]
    fn test_missing_generic_columns_read_empty() {
        let table = Table::parse("descriptions.csv", "id,type,text1\nhound,SHIP,Fast.\n").unwrap();
        let index = DescriptionIndex::build(&table).unwrap();
        let hound = index.get(EntityType::Ship, "hound").unwrap();
        assert_eq!(hound["desc_short"].text(), "");
    }

    #[test]
    fn test_requires_type_column() {
        let table = Table::parse("descriptions.csv", "id,text1\nhound,Fast.\n").unwrap();
        assert!(matches!(
            DescriptionIndex::build(&table),
            Err(Error::SchemaColumnMissing { .. })
        ));
    }
}
