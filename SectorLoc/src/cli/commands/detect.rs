//! CLI command for encoding detection

use std::path::Path;

use anyhow::Context;

use crate::formats::detect;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let detection = detect(&bytes);

    println!("File: {}", file.display());
    println!("Encoding: {}", detection.encoding.name());
    println!("Confidence: {:.0}%", detection.confidence * 100.0);
    if detection.bom_length > 0 {
        println!("BOM: {} bytes", detection.bom_length);
    }
    Ok(())
}
