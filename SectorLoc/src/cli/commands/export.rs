//! CLI command for exporting a mod's source text

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use console::style;

use crate::cli::progress::{DISK, LOOKING_GLASS, print_done, print_step};
use crate::config::Config;
use crate::entity::{ModData, ModPaths, load_mod};
use crate::schema::EntityType;
use crate::translation::{DOCUMENT_EXTENSION, TranslationDocument};

pub fn execute(mod_dir: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let started = Instant::now();
    let paths = ModPaths::new(mod_dir);
    let config = Config::load_for_mod(&paths.root)
        .with_context(|| format!("Failed to load configuration for {}", mod_dir.display()))?;
    let policy = config.encoding_policy()?;

    print_step(1, 2, LOOKING_GLASS, "Reading mod data...");
    let data = load_mod(&paths, &policy);
    for failure in &data.failures {
        println!(
            "  {} {}: {}",
            style("skipped").yellow(),
            failure.path.display(),
            failure.message
        );
    }

    let doc = TranslationDocument::extract(&data);
    let output = output.map_or_else(|| default_output(&data), Path::to_path_buf);

    print_step(2, 2, DISK, &format!("Writing {}...", output.display()));
    doc.save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    for entity_type in EntityType::ALL {
        let count = doc.entity_count(entity_type);
        if count > 0 {
            println!("  {:12} {:>6}", entity_type.tag(), count);
        }
    }

    print_done(started.elapsed());
    Ok(())
}

/// `<mod id>.translate`, or `translation.translate` without metadata.
fn default_output(data: &ModData) -> PathBuf {
    let stem = data
        .metadata
        .as_ref()
        .filter(|m| !m.id.is_empty())
        .map_or("translation", |m| m.id.as_str());
    PathBuf::from(format!("{stem}.{DOCUMENT_EXTENSION}"))
}
