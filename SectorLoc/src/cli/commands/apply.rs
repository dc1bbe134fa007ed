//! CLI command for applying a translation document

use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use crate::apply::{ApplyPlan, ApplyTransaction};
use crate::cli::progress::{DOCUMENT, GEAR, print_done, print_step, simple_bar};
use crate::config::Config;
use crate::entity::ModPaths;
use crate::translation::TranslationDocument;

pub fn execute(mod_dir: &Path, document: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let paths = ModPaths::new(mod_dir);
    let config = Config::load_for_mod(&paths.root)
        .with_context(|| format!("Failed to load configuration for {}", mod_dir.display()))?;

    if !quiet {
        print_step(1, 2, DOCUMENT, "Reading translation document...");
    }
    let doc = TranslationDocument::load(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;

    let plan = ApplyPlan::for_mod(&paths, &doc, &config)?;
    if plan.is_empty() {
        println!("Nothing to translate in {}", mod_dir.display());
        return Ok(());
    }

    if !quiet {
        print_step(2, 2, GEAR, &format!("Applying to {} files...", plan.len()));
    }

    let mut transaction = ApplyTransaction::new();
    let result = if quiet {
        transaction.run(&plan)
    } else {
        // Backup, inject and promote each visit every file once
        let bar = simple_bar((plan.len() * 3) as u64, "Applying");
        let result = transaction.run_with_progress(&plan, &|progress| {
            bar.set_message(progress.phase.as_str());
            if !progress.phase.is_terminal() {
                bar.inc(1);
            }
        });
        bar.finish_and_clear();
        result
    };
    let report = result.with_context(|| format!("Apply to {} failed", mod_dir.display()))?;

    if !quiet {
        for (target, backup) in report.targets.iter().zip(&report.backups) {
            println!("  {} (backup: {})", target.display(), backup.display());
        }
        print_done(started.elapsed());
    }

    Ok(())
}
