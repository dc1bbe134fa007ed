//! Writing translations back into game files
//!
//! Every entry point re-reads its source, builds the complete output in
//! memory and writes it through a temporary file in the output directory,
//! so a failed pass never leaves a partial output behind.

mod bindings;
mod metadata;
mod table;

pub use bindings::{Bindings, ColumnBinding};
pub use metadata::inject_metadata;
pub use table::{
    InjectStats, RowKey, inject_descriptions, inject_entity_table, inject_into_table, inject_table,
};

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `bytes` to `output` through a temporary sibling file.
pub(crate) fn stage_write(output: &Path, bytes: &[u8]) -> Result<()> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| Error::file_io(dir, e))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::file_io(dir, e))?;
    let staged_path = staged.path().to_path_buf();
    staged
        .write_all(bytes)
        .map_err(|e| Error::file_io(staged_path.clone(), e))?;
    staged.flush().map_err(|e| Error::file_io(staged_path, e))?;
    staged.persist(output).map_err(|e| Error::Persist {
        path: output.to_path_buf(),
        message: e.error.to_string(),
    })?;
    Ok(())
}
