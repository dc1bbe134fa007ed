//! Translation documents: the single persisted artifact holding pending
//! translations for one mod
//!
//! # File format
//!
//! A `.translate` file is UTF-8 JSON keyed by type tag, then id, then
//! semantic field name. `MOD_META` is flat:
//!
//! ```json
//! {
//!   "SHIP":     { "hound": { "name": "...", "desc_long": "..." } },
//!   "WEAPON":   { "flak":  { "special_effect_1": "Deals {{fire}} damage" } },
//!   "MOD_META": { "id": "...", "name": "...", "description": "..." }
//! }
//! ```

mod document;
mod extract;

pub use document::{FieldMap, MergeReport, TranslationDocument};

/// Conventional extension of translation document files
pub const DOCUMENT_EXTENSION: &str = "translate";
