//! Subcommand definitions

use clap::Subcommand;
use std::path::PathBuf;

pub mod apply;
pub mod detect;
pub mod execute;
pub mod export;
pub mod merge;
pub mod show;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a mod's source text into a translation document
    Export {
        /// Mod directory (containing mod_info.json)
        mod_dir: PathBuf,

        /// Output document (defaults to <mod id>.translate in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a translation document into a mod, with backups and rollback
    Apply {
        /// Mod directory (containing mod_info.json)
        mod_dir: PathBuf,

        /// Translation document to apply
        document: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Merge an overlay document into a base document
    Merge {
        /// Base document
        base: PathBuf,

        /// Document whose entities replace the base's
        overlay: PathBuf,

        /// Output document (defaults to overwriting the base)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the text encoding of a file
    Detect {
        /// File to inspect
        file: PathBuf,
    },

    /// Print a mod's records with highlights rendered
    Show {
        /// Mod directory (containing mod_info.json)
        mod_dir: PathBuf,

        /// Entity type tag (SHIP, WEAPON, SHIP_SYSTEM, FACTION, RESOURCE, MOD_META)
        #[arg(short = 't', long = "type")]
        entity_type: String,

        /// Only show this id
        #[arg(short, long)]
        id: Option<String>,
    },
}
