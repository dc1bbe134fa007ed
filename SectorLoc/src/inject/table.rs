//! Overlaying translations onto a fresh copy of a table

use std::path::Path;

use indexmap::IndexMap;

use super::bindings::Bindings;
use super::stage_write;
use crate::error::Result;
use crate::formats::descriptions::{ID_COLUMN, TYPE_COLUMN};
use crate::formats::encoding::EncodingPolicy;
use crate::formats::table::{RowKind, Table, TableWriter};
use crate::highlight::HighlightedText;
use crate::schema::{EntitySchema, EntityType, FieldCodec};
use crate::translation::{FieldMap, TranslationDocument};

/// How rows are matched to document entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey<'a> {
    pub id_column: &'a str,
    /// Column holding a type tag, for tables that mix entity types
    pub type_column: Option<&'a str>,
}

impl<'a> RowKey<'a> {
    #[must_use]
    pub fn id(id_column: &'a str) -> Self {
        Self {
            id_column,
            type_column: None,
        }
    }

    #[must_use]
    pub fn typed(type_column: &'a str, id_column: &'a str) -> Self {
        Self {
            id_column,
            type_column: Some(type_column),
        }
    }
}

/// What an injection pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectStats {
    /// Rows after the header
    pub rows: usize,
    /// Rows that were re-serialized
    pub changed_rows: usize,
    /// Cells whose value changed
    pub cells: usize,
}

/// Render `table` with translations applied.
///
/// `resolve` receives the row's type tag (when the key has a type column)
/// and id, and returns the bindings and translated fields for that row.
///
/// # Errors
/// Returns [`crate::Error::SchemaColumnMissing`] if a key column or a
/// required bound column is absent, or [`crate::Error::Csv`] if a changed
/// row cannot be serialized.
pub fn inject_into_table<'b, F>(table: &Table, key: RowKey<'_>, mut resolve: F) -> Result<(Vec<u8>, InjectStats)>
where
    F: FnMut(Option<&str>, &str) -> Option<(&'b Bindings, &'b FieldMap)>,
{
    let id_index = table.column_index(key.id_column)?;
    let type_index = key.type_column.map(|c| table.column_index(c)).transpose()?;

    let mut writer = TableWriter::new(table);
    let mut stats = InjectStats::default();

    for row in &table.rows {
        stats.rows += 1;
        if row.kind(id_index) != RowKind::Data {
            writer.push_raw(row);
            continue;
        }

        let tag = type_index.map(|i| row.get(i).trim());
        let Some((bindings, fields)) = resolve(tag, row.id(id_index)) else {
            writer.push_raw(row);
            continue;
        };

        let mut cells = row.fields.clone();
        let mut changed = 0;
        for binding in bindings.iter() {
            let Some(value) = fields.get(&binding.field).filter(|v| !v.is_empty()) else {
                continue;
            };
            let column = if binding.required {
                table.column_index(&binding.column)?
            } else if let Some(column) = table.find_column(&binding.column) {
                column
            } else {
                tracing::debug!(
                    "{}: no column '{}' for field '{}'",
                    table.name,
                    binding.column,
                    binding.field
                );
                continue;
            };

            match binding.codec {
                FieldCodec::Plain => changed += set_cell(&mut cells, column, value),
                FieldCodec::Highlighted {
                    highlights_column,
                    style,
                } => {
                    let hl = table.find_column(highlights_column);
                    let source = HighlightedText::from_game(
                        row.get(column),
                        hl.map_or("", |i| row.get(i)),
                        style,
                    );
                    if *value == source.to_portable() {
                        continue;
                    }
                    let mut game = HighlightedText::from_portable(value, style);
                    game.highlights.extend_from_slice(source.unwrapped_highlights());
                    changed += set_cell(&mut cells, column, &game.text);
                    if let Some(hl) = hl {
                        changed += set_cell(&mut cells, hl, &game.highlights_column());
                    }
                }
            }
        }

        if changed == 0 {
            writer.push_raw(row);
        } else {
            writer.push_fields(row, &cells)?;
            stats.changed_rows += 1;
            stats.cells += changed;
        }
    }

    Ok((writer.finish(), stats))
}

fn set_cell(cells: &mut Vec<String>, index: usize, value: &str) -> usize {
    if cells.len() <= index {
        cells.resize(index + 1, String::new());
    }
    if cells[index] == value {
        0
    } else {
        value.clone_into(&mut cells[index]);
        1
    }
}

/// Re-read `source`, apply translations and write the result to `output`.
///
/// The output is staged next to its destination and only appears once the
/// whole pass succeeded.
///
/// # Errors
/// Returns an error if the source cannot be read, a column is missing, or
/// the output cannot be written.
pub fn inject_table<'b, F>(
    source: &Path,
    output: &Path,
    policy: &EncodingPolicy,
    key: RowKey<'_>,
    resolve: F,
) -> Result<InjectStats>
where
    F: FnMut(Option<&str>, &str) -> Option<(&'b Bindings, &'b FieldMap)>,
{
    let table = Table::read(source, policy)?;
    let (bytes, stats) = inject_into_table(&table, key, resolve)?;
    stage_write(output, &bytes)?;
    tracing::info!(
        "Injected {}: {} of {} rows changed",
        table.name,
        stats.changed_rows,
        stats.rows
    );
    Ok(stats)
}

/// Inject an entity type's direct fields into its own table.
///
/// # Errors
/// Returns [`crate::Error::SchemaColumnMissing`] if a required direct
/// column is absent, even when nothing would be written to it.
pub fn inject_entity_table(
    source: &Path,
    output: &Path,
    schema: &EntitySchema,
    doc: &TranslationDocument,
    policy: &EncodingPolicy,
) -> Result<InjectStats> {
    let bindings = Bindings::direct(schema);
    let table = Table::read(source, policy)?;
    for binding in bindings.iter().filter(|b| b.required) {
        table.column_index(&binding.column)?;
    }

    let entity_type = schema.entity_type;
    let (bytes, stats) = inject_into_table(&table, RowKey::id(schema.id_column), |_, id| {
        let fields = doc.get(entity_type, id);
        (!fields.is_empty()).then_some((&bindings, fields))
    })?;
    stage_write(output, &bytes)?;

    tracing::info!(
        "Injected {} {}: {} of {} rows changed",
        entity_type,
        table.name,
        stats.changed_rows,
        stats.rows
    );
    Ok(stats)
}

/// Inject description fields of every entity type into `descriptions.csv`.
///
/// Rows are matched on `(type, id)`; rows of types without description
/// fields pass through unchanged.
///
/// # Errors
/// Returns an error if the table lacks `id` / `type` or cannot be written.
pub fn inject_descriptions(
    source: &Path,
    output: &Path,
    doc: &TranslationDocument,
    policy: &EncodingPolicy,
) -> Result<InjectStats> {
    let bindings: IndexMap<EntityType, Bindings> = EntityType::ALL
        .into_iter()
        .map(|t| (t, Bindings::descriptions(t.schema())))
        .filter(|(_, b)| !b.is_empty())
        .collect();

    inject_table(source, output, policy, RowKey::typed(TYPE_COLUMN, ID_COLUMN), |tag, id| {
        let entity_type = EntityType::from_tag(tag?)?;
        let row_bindings = bindings.get(&entity_type)?;
        let fields = doc.get(entity_type, id);
        (!fields.is_empty()).then_some((row_bindings, fields))
    })
}
