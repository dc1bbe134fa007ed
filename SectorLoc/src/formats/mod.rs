//! File format handlers for Starsector mod data
//!
//! - [`encoding`]: encoding detection and strict decoding
//! - [`table`]: CSV tables read and written with row identity preserved
//! - [`descriptions`]: the shared `descriptions.csv` index
//! - [`meta`]: `mod_info.json` and other relaxed-JSON files

pub mod descriptions;
pub mod encoding;
pub mod meta;
pub mod table;

pub use descriptions::DescriptionIndex;
pub use encoding::{DecodedText, Detection, EncodingPolicy, decode, detect, read_text};
pub use meta::{ModMetadata, parse_relaxed_json, strip_comments};
pub use table::{RowKind, Table, TableRow, TableWriter};
