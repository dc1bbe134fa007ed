//! Comma-separated data tables
//!
//! Starsector tables are hand-edited spreadsheets: they carry `#` annotation
//! rows, blank spacer rows and rows without an id, and modders diff them
//! line by line. A [`Table`] therefore keeps the exact source text of every
//! record next to its parsed cells, so that [`TableWriter`] can emit
//! untouched rows byte-for-byte and only re-serialize the rows it changed.

mod reader;
mod writer;

pub use writer::TableWriter;

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Marker that turns a row into an annotation when it starts the first cell
pub const ANNOTATION_MARKER: char = '#';

/// A parsed table with its source text kept per record
#[derive(Debug, Clone)]
pub struct Table {
    /// File name used in error messages
    pub name: String,
    /// Where the table was read from, if it came from disk
    pub path: Option<PathBuf>,
    /// Source text before the header record (usually empty)
    pub prefix: String,
    /// Header cells
    pub header: Vec<String>,
    /// Exact source text of the header record
    pub header_raw: String,
    /// Records after the header, in file order
    pub rows: Vec<TableRow>,
    /// Whether the source started with a byte-order mark
    pub had_bom: bool,
}

/// One record after the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Parsed cells (may be shorter or longer than the header)
    pub fields: Vec<String>,
    /// Exact source text, including the line break and any blank lines
    /// that follow it
    pub raw: String,
    /// 1-based line number of the record start
    pub line: u64,
}

/// How a row takes part in entity loading and injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// First cell starts with `#`
    Annotation,
    /// No cell has content
    Blank,
    /// The id cell is empty
    MissingId,
    /// A row describing an entity
    Data,
}

impl TableRow {
    /// Cell at `index`, or `""` if the row is too short.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    /// Classify the row given the position of its id column.
    #[must_use]
    pub fn kind(&self, id_index: usize) -> RowKind {
        let first = self.get(0);
        if first.starts_with(ANNOTATION_MARKER) {
            RowKind::Annotation
        } else if self.fields.iter().all(|f| f.trim().is_empty()) {
            RowKind::Blank
        } else if self.get(id_index).trim().is_empty() {
            RowKind::MissingId
        } else {
            RowKind::Data
        }
    }

    /// The trimmed id cell.
    #[must_use]
    pub fn id(&self, id_index: usize) -> &str {
        self.get(id_index).trim()
    }
}

impl Table {
    /// Position of a header column, if present.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Position of a header column.
    ///
    /// # Errors
    /// Returns [`Error::SchemaColumnMissing`] if the header has no such column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.find_column(name).ok_or_else(|| Error::SchemaColumnMissing {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Rows that describe entities, with their ids.
    pub fn data_rows(&self, id_index: usize) -> impl Iterator<Item = (&str, &TableRow)> {
        self.rows
            .iter()
            .filter(move |row| row.kind(id_index) == RowKind::Data)
            .map(move |row| (row.id(id_index), row))
    }
}
