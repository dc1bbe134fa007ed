//! Entity records, their loading, and ship skins

pub mod loader;
pub mod record;
pub mod skin;

pub use loader::{EntityTable, LoadFailure, ModData, ModPaths, entities_from_descriptions, load_entities, load_mod};
pub use record::{EntityRecord, FieldValue};
pub use skin::{ShipSkin, SkinView, load_skins};
