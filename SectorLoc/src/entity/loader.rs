//! Loading entity records from a mod directory

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::entity::record::{EntityRecord, FieldColumns, FieldValue};
use crate::entity::skin::{ShipSkin, SkinView, load_skins};
use crate::error::Result;
use crate::formats::descriptions::DescriptionIndex;
use crate::formats::encoding::EncodingPolicy;
use crate::formats::meta::ModMetadata;
use crate::formats::table::Table;
use crate::schema::{
    self, DESCRIPTIONS_TABLE, EntitySchema, EntityType, MOD_INFO_FILE, SKINS_DIR,
};

/// File locations inside one mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPaths {
    pub root: PathBuf,
}

impl ModPaths {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The primary table of an entity type, if it has one.
    #[must_use]
    pub fn table(&self, schema: &EntitySchema) -> Option<PathBuf> {
        schema.table.map(|t| self.root.join(t))
    }

    #[must_use]
    pub fn descriptions(&self) -> PathBuf {
        self.root.join(DESCRIPTIONS_TABLE)
    }

    #[must_use]
    pub fn mod_info(&self) -> PathBuf {
        self.root.join(MOD_INFO_FILE)
    }

    #[must_use]
    pub fn skins_dir(&self) -> PathBuf {
        self.root.join(SKINS_DIR)
    }
}

/// Records of one entity type, keyed by id in first-seen order
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    /// Header of the source table (empty for description-only types)
    pub header: Vec<String>,
    pub records: IndexMap<String, EntityRecord>,
}

impl EntityTable {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }
}

/// Build records from a parsed table, merging description buckets.
///
/// Duplicate ids overwrite the earlier record and log a warning; the
/// record keeps the position of the first occurrence.
///
/// # Errors
/// Returns [`crate::Error::SchemaColumnMissing`] if the id column or a
/// required direct column is absent.
pub fn load_entities(
    table: &Table,
    schema: &'static EntitySchema,
    descriptions: Option<&DescriptionIndex>,
) -> Result<EntityTable> {
    let id_index = table.column_index(schema.id_column)?;
    let columns = FieldColumns::resolve_all(table, schema.direct_fields)?;
    let references: Vec<(&str, Option<usize>)> = schema
        .reference_columns
        .iter()
        .map(|&c| (c, table.find_column(c)))
        .collect();

    let mut records: IndexMap<String, EntityRecord> = IndexMap::new();
    for (id, row) in table.data_rows(id_index) {
        let mut record = EntityRecord::new(schema.entity_type, id);
        for column in &columns {
            record
                .fields
                .insert(column.spec.name.to_string(), column.read(row));
        }
        for &(name, index) in &references {
            let value = index.map_or("", |i| row.get(i).trim());
            record.references.insert(name.to_string(), value.to_string());
        }
        if let Some(bucket) = descriptions.and_then(|d| d.get(schema.entity_type, id)) {
            record.fields.extend(bucket.clone());
        }

        if records.insert(id.to_string(), record).is_some() {
            tracing::warn!(
                "{}: duplicate {} id '{}' at line {}, the later row wins",
                table.name,
                schema.entity_type,
                id,
                row.line
            );
        }
    }

    tracing::debug!("{}: loaded {} {} records", table.name, records.len(), schema.entity_type);
    Ok(EntityTable {
        header: table.header.clone(),
        records,
    })
}

/// Build records for a type that only exists in `descriptions.csv`.
#[must_use]
pub fn entities_from_descriptions(
    schema: &'static EntitySchema,
    descriptions: &DescriptionIndex,
) -> EntityTable {
    let records = descriptions
        .entries(schema.entity_type)
        .map(|(id, bucket)| {
            let mut record = EntityRecord::new(schema.entity_type, id);
            record.fields = bucket.clone();
            (id.to_string(), record)
        })
        .collect();
    EntityTable {
        header: Vec::new(),
        records,
    }
}

/// A file that exists but could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Everything read from one mod
#[derive(Debug, Clone)]
pub struct ModData {
    pub paths: ModPaths,
    pub metadata: Option<ModMetadata>,
    pub descriptions: DescriptionIndex,
    /// One table per entity type except `MOD_META`; absent files give
    /// empty tables
    pub tables: IndexMap<EntityType, EntityTable>,
    pub skins: Vec<ShipSkin>,
    /// Files that exist but failed to load
    pub failures: Vec<LoadFailure>,
}

impl ModData {
    /// Records of one type.
    pub fn records(&self, entity_type: EntityType) -> impl Iterator<Item = &EntityRecord> {
        self.tables
            .get(&entity_type)
            .into_iter()
            .flat_map(EntityTable::iter)
    }

    #[must_use]
    pub fn get(&self, entity_type: EntityType, id: &str) -> Option<&EntityRecord> {
        self.tables.get(&entity_type).and_then(|t| t.get(id))
    }

    /// A skin resolved against its base hull.
    #[must_use]
    pub fn skin_view<'a>(&'a self, skin: &'a ShipSkin) -> SkinView<'a> {
        skin.view(self.get(EntityType::Ship, &skin.base_hull_id))
    }

    /// Total number of loaded records.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.tables.values().map(EntityTable::len).sum()
    }

    /// Field value of one record, for lookups from the CLI.
    #[must_use]
    pub fn field(&self, entity_type: EntityType, id: &str, field: &str) -> Option<&FieldValue> {
        self.get(entity_type, id).and_then(|r| r.field(field))
    }
}

fn record_failure(failures: &mut Vec<LoadFailure>, path: &Path, error: &crate::Error) {
    tracing::warn!("Failed to load {}: {}", path.display(), error);
    failures.push(LoadFailure {
        path: path.to_path_buf(),
        message: error.to_string(),
    });
}

/// Load every table, description, skin and the metadata of a mod.
///
/// Missing files are normal (most mods only touch a few tables) and load
/// as empty data. Files that exist but fail to load are recorded in
/// [`ModData::failures`].
#[must_use]
pub fn load_mod(paths: &ModPaths, policy: &EncodingPolicy) -> ModData {
    tracing::info!("Loading mod data from {}", paths.root.display());
    let mut failures = Vec::new();

    let descriptions_path = paths.descriptions();
    let descriptions = if descriptions_path.is_file() {
        DescriptionIndex::read(&descriptions_path, policy).unwrap_or_else(|e| {
            record_failure(&mut failures, &descriptions_path, &e);
            DescriptionIndex::new()
        })
    } else {
        tracing::info!("No {} in {}", DESCRIPTIONS_TABLE, paths.root.display());
        DescriptionIndex::new()
    };

    let mut tables = IndexMap::new();
    for entity_type in EntityType::ALL {
        let schema = schema::schema_for(entity_type);
        let table = match paths.table(schema) {
            Some(path) if path.is_file() => Table::read(&path, policy)
                .and_then(|table| load_entities(&table, schema, Some(&descriptions)))
                .unwrap_or_else(|e| {
                    record_failure(&mut failures, &path, &e);
                    EntityTable::default()
                }),
            Some(_) => {
                tracing::info!("No {} in {}", schema.table_name(), paths.root.display());
                EntityTable::default()
            }
            None if entity_type == EntityType::ModMeta => continue,
            None => entities_from_descriptions(schema, &descriptions),
        };
        tables.insert(entity_type, table);
    }

    let mod_info = paths.mod_info();
    let metadata = if mod_info.is_file() {
        match ModMetadata::load(&mod_info, policy) {
            Ok(meta) => Some(meta),
            Err(e) => {
                record_failure(&mut failures, &mod_info, &e);
                None
            }
        }
    } else {
        None
    };

    let (skins, skin_failures) = load_skins(&paths.skins_dir(), policy);
    for (path, e) in &skin_failures {
        record_failure(&mut failures, path, e);
    }

    let data = ModData {
        paths: paths.clone(),
        metadata,
        descriptions,
        tables,
        skins,
        failures,
    };
    tracing::info!(
        "Loaded {} records, {} skins ({} failures)",
        data.entity_count(),
        data.skins.len(),
        data.failures.len()
    );
    data
}
