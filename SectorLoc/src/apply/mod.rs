//! Transactional apply of a translation document to a mod directory
//!
//! An [`ApplyPlan`] lists target files and the [`Injector`] that rewrites
//! each one. An [`ApplyTransaction`] backs every target up, stages every
//! injector's output, and only then replaces the targets. Any failure
//! restores the originals from the backups.
//!
//! ```no_run
//! use sectorloc::apply::{ApplyPlan, ApplyTransaction};
//! use sectorloc::config::Config;
//! use sectorloc::entity::ModPaths;
//! use sectorloc::translation::TranslationDocument;
//!
//! let paths = ModPaths::new("mods/my_mod");
//! let config = Config::load_for_mod(&paths.root)?;
//! let doc = TranslationDocument::load("my_mod.translate")?;
//! let plan = ApplyPlan::for_mod(&paths, &doc, &config)?;
//! let report = ApplyTransaction::new().run(&plan)?;
//! println!("Replaced {} files", report.targets.len());
//! # Ok::<(), sectorloc::Error>(())
//! ```

pub mod injector;
mod plan;
mod transaction;
mod types;

pub use injector::{DescriptionsInjector, Injector, MetadataInjector, TableInjector};
pub use plan::{ApplyPlan, ApplyStep};
pub use transaction::ApplyTransaction;
pub use types::{ApplyProgress, ApplyProgressCallback, ApplyReport, TransactionState};
