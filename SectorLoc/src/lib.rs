//! # SectorLoc
//!
//! Localization extraction and injection for Starsector mods.
//!
//! ## Supported Files
//!
//! - **Entity tables** - `ship_data.csv`, `weapon_data.csv`, `ship_systems.csv`
//! - **Descriptions** - the shared `descriptions.csv` keyed by type and id
//! - **Metadata** - `mod_info.json` with `#` comments and trailing commas
//! - **Skins** - `.skin` JSON files resolved against their base hulls
//! - **Translation documents** - `.translate` JSON holding pending text
//!
//! ## Quick Start
//!
//! ### Exporting Source Text
//!
//! ```no_run
//! use sectorloc::entity::{ModPaths, load_mod};
//! use sectorloc::formats::EncodingPolicy;
//! use sectorloc::translation::TranslationDocument;
//!
//! let paths = ModPaths::new("mods/my_mod");
//! let data = load_mod(&paths, &EncodingPolicy::default());
//! let doc = TranslationDocument::extract(&data);
//! doc.save("my_mod.translate")?;
//! # Ok::<(), sectorloc::Error>(())
//! ```
//!
//! ### Applying a Translation
//!
//! ```no_run
//! use sectorloc::prelude::*;
//!
//! let paths = ModPaths::new("mods/my_mod");
//! let config = Config::load_for_mod(&paths.root)?;
//! let doc = TranslationDocument::load("my_mod.translate")?;
//! let plan = ApplyPlan::for_mod(&paths, &doc, &config)?;
//! ApplyTransaction::new().run(&plan)?;
//! # Ok::<(), sectorloc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `sectorloc` command-line binary

pub mod apply;
pub mod config;
pub mod entity;
pub mod error;
pub mod formats;
pub mod highlight;
pub mod inject;
pub mod schema;
pub mod translation;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::apply::{ApplyPlan, ApplyReport, ApplyTransaction, Injector, TransactionState};
    pub use crate::config::Config;
    pub use crate::entity::{EntityRecord, FieldValue, ModData, ModPaths, ShipSkin, load_mod};
    pub use crate::formats::{DescriptionIndex, EncodingPolicy, ModMetadata, Table};
    pub use crate::highlight::{DisplayMarkup, HighlightStyle, HighlightedText};
    pub use crate::schema::{EntitySchema, EntityType};
    pub use crate::translation::TranslationDocument;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
