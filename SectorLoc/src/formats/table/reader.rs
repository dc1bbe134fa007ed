//! Table reading

use std::path::Path;

use csv::ReaderBuilder;

use super::{Table, TableRow};
use crate::error::{Error, Result};
use crate::formats::encoding::{EncodingPolicy, read_text};

impl Table {
    /// Read and parse a table file.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if the file cannot be decoded,
    /// [`Error::Csv`] on malformed records, or [`Error::EmptyTable`] if the
    /// file has no header.
    pub fn read<P: AsRef<Path>>(path: P, policy: &EncodingPolicy) -> Result<Self> {
        let path = path.as_ref();
        let decoded = read_text(path, policy)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mut table = Self::parse(&name, &decoded.text)?;
        table.path = Some(path.to_path_buf());
        table.had_bom = decoded.had_bom;

        tracing::debug!(
            "Read {} ({}): {} columns, {} rows",
            name,
            decoded.encoding.name(),
            table.header.len(),
            table.rows.len()
        );
        Ok(table)
    }

    /// Parse table text that has already been decoded.
    ///
    /// # Errors
    /// Returns [`Error::Csv`] on malformed records or [`Error::EmptyTable`]
    /// if there is no header record.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let start = record
                .position()
                .and_then(|p| usize::try_from(p.byte()).ok())
                .unwrap_or(text.len())
                .min(text.len());
            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            records.push((start, fields));
        }

        let Some((header_start, _)) = records.first() else {
            return Err(Error::EmptyTable {
                table: name.to_string(),
            });
        };
        let prefix = text[..*header_start].to_string();

        // Each record owns the text up to the next record's start, so
        // skipped blank lines stay attached to the record before them.
        let mut spans = Vec::with_capacity(records.len());
        for (i, (start, fields)) in records.iter().enumerate() {
            let end = records.get(i + 1).map_or(text.len(), |(next, _)| *next);
            let raw = &text[*start..end.max(*start)];
            let lead = raw.len() - raw.trim_start_matches(['\r', '\n']).len();
            let line = 1 + text[..start + lead].matches('\n').count() as u64;
            spans.push(TableRow {
                fields: fields.clone(),
                raw: raw.to_string(),
                line,
            });
        }

        let mut spans = spans.into_iter();
        let Some(header_row) = spans.next() else {
            return Err(Error::EmptyTable {
                table: name.to_string(),
            });
        };

        Ok(Self {
            name: name.to_string(),
            path: None,
            prefix,
            header: header_row.fields,
            header_raw: header_row.raw,
            rows: spans.collect(),
            had_bom: false,
        })
    }
}
