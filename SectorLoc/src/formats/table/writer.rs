//! Table writing

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{Table, TableRow};
use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Re-emits a [`Table`] row by row.
///
/// The prefix and header are written verbatim on construction. Rows pushed
/// with [`push_raw`](Self::push_raw) come out byte-for-byte; rows pushed with
/// [`push_fields`](Self::push_fields) are re-serialized with minimal quoting
/// and keep their original line breaks. Output is always UTF-8.
#[derive(Debug)]
pub struct TableWriter {
    out: String,
    had_bom: bool,
}

impl TableWriter {
    #[must_use]
    pub fn new(table: &Table) -> Self {
        let mut out = String::with_capacity(
            table.prefix.len()
                + table.header_raw.len()
                + table.rows.iter().map(|r| r.raw.len()).sum::<usize>(),
        );
        out.push_str(&table.prefix);
        out.push_str(&table.header_raw);
        Self {
            out,
            had_bom: table.had_bom,
        }
    }

    /// Emit a row exactly as it was read.
    pub fn push_raw(&mut self, row: &TableRow) {
        self.out.push_str(&row.raw);
    }

    /// Emit a row with new cell values in place of the original record.
    ///
    /// # Errors
    /// Returns [`Error::Csv`] if the record cannot be serialized.
    pub fn push_fields(&mut self, row: &TableRow, fields: &[String]) -> Result<()> {
        let (lead, tail) = line_breaks(&row.raw);
        self.out.push_str(lead);
        self.out.push_str(&serialize_record(fields)?);
        self.out.push_str(tail);
        Ok(())
    }

    /// The text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finish and return the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.out.len() + UTF8_BOM.len());
        if self.had_bom {
            bytes.extend_from_slice(UTF8_BOM);
        }
        bytes.extend_from_slice(self.out.as_bytes());
        bytes
    }
}

/// Serialize one record with minimal quoting and no line terminator.
///
/// # Errors
/// Returns [`Error::Csv`] if the csv writer rejects the record.
pub fn serialize_record(fields: &[String]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    let mut line = String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Split the leading and trailing line-break runs off a raw record.
fn line_breaks(raw: &str) -> (&str, &str) {
    let body = raw.trim_start_matches(['\r', '\n']);
    let lead = &raw[..raw.len() - body.len()];
    let trimmed = body.trim_end_matches(['\r', '\n']);
    let tail = &body[trimmed.len()..];
    (lead, tail)
}
