//! CLI command for merging translation documents

use std::path::Path;

use anyhow::Context;

use crate::translation::TranslationDocument;

pub fn execute(base: &Path, overlay: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let mut doc = TranslationDocument::load(base)
        .with_context(|| format!("Failed to read {}", base.display()))?;
    let other = TranslationDocument::load(overlay)
        .with_context(|| format!("Failed to read {}", overlay.display()))?;

    let report = doc.merge(&other);
    let output = output.unwrap_or(base);
    doc.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Merged {}: {} added, {} replaced -> {}",
        overlay.display(),
        report.added,
        report.replaced,
        output.display()
    );
    Ok(())
}
