//! Command execution implementations

use super::Commands;
use super::{apply, detect, export, merge, show};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Export { mod_dir, output } => export::execute(mod_dir, output.as_deref()),
            Commands::Apply {
                mod_dir,
                document,
                quiet,
            } => apply::execute(mod_dir, document, *quiet),
            Commands::Merge {
                base,
                overlay,
                output,
            } => merge::execute(base, overlay, output.as_deref()),
            Commands::Detect { file } => detect::execute(file),
            Commands::Show {
                mod_dir,
                entity_type,
                id,
            } => show::execute(mod_dir, entity_type, id.as_deref()),
        }
    }
}
