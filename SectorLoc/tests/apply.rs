mod common;

use std::path::Path;

use pretty_assertions::assert_eq;
use sectorloc::prelude::*;

fn translated_document() -> TranslationDocument {
    let mut doc = TranslationDocument::new();
    doc.set_field(EntityType::Ship, "wasp", "name", "Guêpe");
    doc.set_field(EntityType::Ship, "wasp", "desc_long", "Une petite coque rapide.");
    doc.set_field(EntityType::Weapon, "flak", "name", "Canon antiaérien");
    doc.set_field(EntityType::ShipSystem, "burn", "name", "Propulsion");
    doc.set_field(EntityType::ModMeta, "", "name", "Mod de test");
    doc
}

fn plan_for<'a>(root: &Path, doc: &'a TranslationDocument) -> ApplyPlan<'a> {
    let config = Config::load_for_mod(root).unwrap();
    ApplyPlan::for_mod(&ModPaths::new(root), doc, &config).unwrap()
}

fn staging_dirs(root: &Path) -> usize {
    std::fs::read_dir(root)
        .unwrap()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(".sectorloc-staging-"))
        .count()
}

#[test]
fn test_apply_replaces_targets_and_keeps_backups() {
    let temp = common::write_mod();
    let root = temp.path();
    let before = common::snapshot(root);
    let doc = translated_document();

    let plan = plan_for(root, &doc);
    let mut transaction = ApplyTransaction::new();
    let report = transaction.run(&plan).unwrap();

    assert_eq!(transaction.state(), TransactionState::Done);
    assert_eq!(report.targets.len(), 5);
    for (relative, backup) in common::FILES.iter().zip(&report.backups) {
        assert_eq!(backup, &root.join(format!("{relative}.bak")));
        assert_eq!(&std::fs::read(backup).unwrap(), &before[relative]);
    }

    let after = common::snapshot(root);
    for relative in common::FILES {
        assert_ne!(after[relative], before[relative], "{relative} was not translated");
    }
    assert_eq!(staging_dirs(root), 0);

    let data = load_mod(&ModPaths::new(root), &EncodingPolicy::default());
    assert_eq!(data.get(EntityType::Ship, "wasp").unwrap().text("name"), Some("Guêpe"));
    assert_eq!(
        data.get(EntityType::Ship, "wasp").unwrap().text("desc_long"),
        Some("Une petite coque rapide.")
    );
    assert_eq!(data.metadata.unwrap().name, "Mod de test");
}

#[test]
fn test_failing_third_step_restores_all_five_files() {
    // No `name` column: the ship system injector fails
    let temp = common::write_mod_with_systems("id,cooldown\nburn,5\n");
    let root = temp.path();
    let before = common::snapshot(root);
    let doc = translated_document();

    let plan = plan_for(root, &doc);
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.steps[2].injector.name(), "ship_systems.csv");

    let mut transaction = ApplyTransaction::new();
    let err = transaction.run(&plan).unwrap_err();
    match &err {
        Error::ApplyRolledBack { step, source } => {
            assert_eq!(step, "ship_systems.csv");
            assert!(matches!(**source, Error::SchemaColumnMissing { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(common::snapshot(root), before);
    assert_eq!(transaction.state(), TransactionState::RolledBack);
    assert!(!transaction.history().contains(&TransactionState::Promoting));
    assert_eq!(staging_dirs(root), 0);
}

#[test]
fn test_configured_backup_suffix() {
    let temp = common::write_mod();
    let root = temp.path();
    std::fs::write(
        root.join("sectorloc.toml"),
        "[apply]\nbackup_suffix = \".orig\"\n",
    )
    .unwrap();
    let doc = TranslationDocument::new();

    let report = ApplyTransaction::new().run(&plan_for(root, &doc)).unwrap();
    assert!(report.backups.iter().all(|b| b.to_string_lossy().ends_with(".orig")));
    assert!(root.join("mod_info.json.orig").is_file());
}

#[test]
fn test_apply_skips_absent_tables() {
    let temp = common::write_mod();
    let root = temp.path();
    std::fs::remove_file(root.join(common::FILES[2])).unwrap();
    let doc = translated_document();

    let plan = plan_for(root, &doc);
    assert_eq!(plan.len(), 4);
    let report = ApplyTransaction::new().run(&plan).unwrap();
    assert!(!root.join(common::FILES[2]).exists());
    assert_eq!(report.targets.len(), 4);
}
