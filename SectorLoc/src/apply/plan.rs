//! Apply plans: which files are rewritten and how

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::injector::{DescriptionsInjector, Injector, MetadataInjector, TableInjector};
use crate::config::{ApplySettings, Config};
use crate::entity::loader::ModPaths;
use crate::error::Result;
use crate::schema;
use crate::translation::TranslationDocument;

/// One target file and the injector that rewrites it
pub struct ApplyStep<'a> {
    pub target: PathBuf,
    pub injector: Box<dyn Injector + 'a>,
}

impl ApplyStep<'_> {
    /// The target's file name, for messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.target
            .file_name()
            .map_or_else(|| self.target.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// An ordered list of apply steps sharing one mod root
pub struct ApplyPlan<'a> {
    /// Directory that receives the staging directory
    pub root: PathBuf,
    pub steps: Vec<ApplyStep<'a>>,
    pub settings: ApplySettings,
}

impl<'a> ApplyPlan<'a> {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            steps: Vec::new(),
            settings: ApplySettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ApplySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a step.
    pub fn push(&mut self, target: impl Into<PathBuf>, injector: impl Injector + 'a) {
        self.steps.push(ApplyStep {
            target: target.into(),
            injector: Box::new(injector),
        });
    }

    /// Every existing target of a mod: descriptions, weapon, ship system
    /// and hull tables, then `mod_info.json`.
    ///
    /// # Errors
    /// Returns an error if the configured encodings are invalid.
    pub fn for_mod(paths: &ModPaths, doc: &'a TranslationDocument, config: &Config) -> Result<Self> {
        let policy = config.encoding_policy()?;
        let mut plan = Self::new(&paths.root).with_settings(config.apply.clone());

        let mut add = |target: PathBuf, injector: Box<dyn Injector + 'a>| {
            if target.is_file() {
                plan.steps.push(ApplyStep { target, injector });
            } else {
                tracing::info!("Skipping {}: not present", target.display());
            }
        };

        add(
            paths.descriptions(),
            Box::new(DescriptionsInjector::new(doc, policy.clone())),
        );
        for table_schema in [&schema::WEAPON, &schema::SHIP_SYSTEM, &schema::SHIP] {
            if let Some(target) = paths.table(table_schema) {
                add(target, Box::new(TableInjector::new(table_schema, doc, policy.clone())));
            }
        }
        add(paths.mod_info(), Box::new(MetadataInjector::new(doc, policy)));

        tracing::info!("Planned {} apply steps for {}", plan.steps.len(), paths.root.display());
        Ok(plan)
    }

    /// Backup sibling of a target: the file name plus the backup suffix.
    #[must_use]
    pub fn backup_path(&self, target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
        name.push(&self.settings.backup_suffix);
        target.with_file_name(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
