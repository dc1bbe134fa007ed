//! The backup, inject, promote-or-rollback transaction

use std::path::{Path, PathBuf};

use super::plan::ApplyPlan;
use super::types::{ApplyProgress, ApplyProgressCallback, ApplyReport, TransactionState};
use crate::error::{Error, Result};

/// Runs an [`ApplyPlan`] with all-or-nothing semantics across its targets.
///
/// 1. Every target is copied to its backup sibling.
/// 2. Every injector writes into a staging directory inside the plan root.
/// 3. Every staged output is copied over its target.
///
/// A failure in step 2 or 3 copies every backup back over its target.
/// Backups are kept after success.
#[derive(Debug, Default)]
pub struct ApplyTransaction {
    state: TransactionState,
    history: Vec<TransactionState>,
}

impl ApplyTransaction {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TransactionState::Idle,
            history: vec![TransactionState::Idle],
        }
    }

    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// States passed through during the last run, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[TransactionState] {
        &self.history
    }

    fn transition(&mut self, next: TransactionState) {
        tracing::debug!("Apply: {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
        self.history.push(next);
    }

    /// Run a plan.
    ///
    /// # Errors
    /// Returns [`Error::ApplyRolledBack`] if any step failed and every
    /// target was restored, or [`Error::RollbackIncomplete`] if some
    /// targets could not be restored from their backups.
    pub fn run(&mut self, plan: &ApplyPlan<'_>) -> Result<ApplyReport> {
        self.run_with_progress(plan, &|_| {})
    }

    /// Run a plan with a progress callback.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn run_with_progress(
        &mut self,
        plan: &ApplyPlan<'_>,
        progress: ApplyProgressCallback,
    ) -> Result<ApplyReport> {
        self.state = TransactionState::Idle;
        self.history = vec![TransactionState::Idle];
        let total = plan.len();
        tracing::info!(
            "Applying translations to {} files in {}",
            total,
            plan.root.display()
        );

        // Backups
        self.transition(TransactionState::BackingUp);
        let mut backups: Vec<PathBuf> = Vec::with_capacity(total);
        for (i, step) in plan.steps.iter().enumerate() {
            progress(&ApplyProgress::with_file(
                TransactionState::BackingUp,
                i + 1,
                total,
                step.file_name(),
            ));
            let backup = plan.backup_path(&step.target);
            if let Err(e) = std::fs::copy(&step.target, &backup) {
                let cause = Error::file_io(&step.target, e);
                let failed = format!("backup of {}", step.file_name());
                return Err(self.rollback(plan, &backups, &failed, cause, progress));
            }
            backups.push(backup);
        }

        // Staged injection
        self.transition(TransactionState::Injecting);
        let staging = match tempfile::Builder::new()
            .prefix(&plan.settings.staging_prefix)
            .tempdir_in(&plan.root)
        {
            Ok(dir) => dir,
            Err(e) => {
                let cause = Error::file_io(&plan.root, e);
                return Err(self.rollback(plan, &backups, "staging directory", cause, progress));
            }
        };

        let mut staged: Vec<PathBuf> = Vec::with_capacity(total);
        for (i, step) in plan.steps.iter().enumerate() {
            progress(&ApplyProgress::with_file(
                TransactionState::Injecting,
                i + 1,
                total,
                step.injector.name(),
            ));
            let output = staging.path().join(format!("{i:02}-{}", step.file_name()));
            if let Err(cause) = step.injector.inject(&step.target, &output) {
                return Err(self.rollback(plan, &backups, step.injector.name(), cause, progress));
            }
            staged.push(output);
        }

        // Promotion
        self.transition(TransactionState::Promoting);
        for (i, (step, output)) in plan.steps.iter().zip(&staged).enumerate() {
            progress(&ApplyProgress::with_file(
                TransactionState::Promoting,
                i + 1,
                total,
                step.file_name(),
            ));
            if let Err(e) = std::fs::copy(output, &step.target) {
                let cause = Error::file_io(&step.target, e);
                let failed = format!("promotion of {}", step.file_name());
                return Err(self.rollback(plan, &backups, &failed, cause, progress));
            }
        }

        if let Err(e) = staging.close() {
            tracing::warn!("Could not remove staging directory: {}", e);
        }

        self.transition(TransactionState::Done);
        progress(&ApplyProgress::new(TransactionState::Done, total, total));
        tracing::info!("Applied translations to {} files", total);

        Ok(ApplyReport {
            targets: plan.steps.iter().map(|s| s.target.clone()).collect(),
            backups,
            history: self.history.clone(),
        })
    }

    /// Copy every backup taken so far back over its target.
    fn rollback(
        &mut self,
        plan: &ApplyPlan<'_>,
        backups: &[PathBuf],
        step: &str,
        cause: Error,
        progress: ApplyProgressCallback,
    ) -> Error {
        tracing::error!("Apply failed at {}: {}; restoring originals", step, cause);
        self.transition(TransactionState::RollingBack);

        let total = backups.len();
        let mut unrestored = Vec::new();
        for (i, (apply_step, backup)) in plan.steps.iter().zip(backups).enumerate() {
            progress(&ApplyProgress::with_file(
                TransactionState::RollingBack,
                i + 1,
                total,
                apply_step.file_name(),
            ));
            if let Err(e) = restore(backup, &apply_step.target) {
                tracing::error!(
                    "Could not restore {} from {}: {}",
                    apply_step.target.display(),
                    backup.display(),
                    e
                );
                unrestored.push(apply_step.target.clone());
            }
        }

        if !unrestored.is_empty() {
            return Error::RollbackIncomplete {
                unrestored,
                backups: backups.to_vec(),
            };
        }

        self.transition(TransactionState::RolledBack);
        tracing::info!("Restored {} files after failure at {}", total, step);
        Error::ApplyRolledBack {
            step: step.to_string(),
            source: Box::new(cause),
        }
    }
}

fn restore(backup: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::copy(backup, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::injector::Injector;
    use std::sync::Mutex;

    /// Writes the source with a suffix appended, or fails.
    struct Suffix {
        name: &'static str,
        fail: bool,
    }

    impl Injector for Suffix {
        fn name(&self) -> &str {
            self.name
        }

        fn inject(&self, source: &Path, output: &Path) -> Result<()> {
            if self.fail {
                return Err(Error::Metadata {
                    path: source.to_path_buf(),
                    message: "refused".to_string(),
                });
            }
            let mut bytes = std::fs::read(source)?;
            bytes.extend_from_slice(b"+translated");
            std::fs::write(output, bytes)?;
            Ok(())
        }
    }

    /// Leaves a directory where its staged output should be.
    struct DirectoryOutput;

    impl Injector for DirectoryOutput {
        fn name(&self) -> &str {
            "directory output"
        }

        fn inject(&self, _source: &Path, output: &Path) -> Result<()> {
            std::fs::create_dir(output)?;
            Ok(())
        }
    }

    /// Replaces its target with a directory, then fails.
    struct ClobberTarget;

    impl Injector for ClobberTarget {
        fn name(&self) -> &str {
            "clobber"
        }

        fn inject(&self, source: &Path, _output: &Path) -> Result<()> {
            std::fs::remove_file(source)?;
            std::fs::create_dir(source)?;
            Err(Error::Metadata {
                path: source.to_path_buf(),
                message: "refused".to_string(),
            })
        }
    }

    fn setup(count: usize) -> (tempfile::TempDir, Vec<PathBuf>) {
        let temp = tempfile::TempDir::new().unwrap();
        let targets = (0..count)
            .map(|i| {
                let path = temp.path().join(format!("file{i}.csv"));
                std::fs::write(&path, format!("original {i}")).unwrap();
                path
            })
            .collect();
        (temp, targets)
    }

    #[test]
    fn test_success_promotes_and_keeps_backups() {
        let (temp, targets) = setup(2);
        let mut plan = ApplyPlan::new(temp.path());
        for target in &targets {
            plan.push(target, Suffix { name: "ok", fail: false });
        }

        let seen = Mutex::new(Vec::new());
        let mut transaction = ApplyTransaction::new();
        let report = transaction
            .run_with_progress(&plan, &|p| seen.lock().unwrap().push(p.phase))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&targets[0]).unwrap(), "original 0+translated");
        assert_eq!(std::fs::read_to_string(&report.backups[1]).unwrap(), "original 1");
        assert_eq!(transaction.state(), TransactionState::Done);
        assert_eq!(
            transaction.history(),
            &[
                TransactionState::Idle,
                TransactionState::BackingUp,
                TransactionState::Injecting,
                TransactionState::Promoting,
                TransactionState::Done,
            ]
        );
        assert_eq!(seen.lock().unwrap().last(), Some(&TransactionState::Done));

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".sectorloc-staging-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failure_rolls_back() {
        let (temp, targets) = setup(2);
        let mut plan = ApplyPlan::new(temp.path());
        plan.push(&targets[0], Suffix { name: "first", fail: false });
        plan.push(&targets[1], Suffix { name: "second", fail: true });

        let mut transaction = ApplyTransaction::new();
        let err = transaction.run(&plan).unwrap_err();
        match err {
            Error::ApplyRolledBack { step, .. } => assert_eq!(step, "second"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transaction.state(), TransactionState::RolledBack);
        assert!(transaction.state().is_terminal());
        assert_eq!(std::fs::read_to_string(&targets[0]).unwrap(), "original 0");
    }

    #[test]
    fn test_missing_target_fails_during_backup() {
        let (temp, targets) = setup(1);
        let mut plan = ApplyPlan::new(temp.path());
        plan.push(&targets[0], Suffix { name: "ok", fail: false });
        plan.push(temp.path().join("absent.csv"), Suffix { name: "ok", fail: false });

        let mut transaction = ApplyTransaction::new();
        assert!(matches!(
            transaction.run(&plan),
            Err(Error::ApplyRolledBack { .. })
        ));
        assert!(!transaction.history().contains(&TransactionState::Injecting));
        assert_eq!(std::fs::read_to_string(&targets[0]).unwrap(), "original 0");
    }

    #[test]
    fn test_promotion_failure_restores_every_target() {
        let (temp, targets) = setup(3);
        let mut plan = ApplyPlan::new(temp.path());
        plan.push(&targets[0], Suffix { name: "first", fail: false });
        plan.push(&targets[1], Suffix { name: "second", fail: false });
        plan.push(&targets[2], DirectoryOutput);

        let mut transaction = ApplyTransaction::new();
        let err = transaction.run(&plan).unwrap_err();
        match err {
            Error::ApplyRolledBack { step, .. } => assert_eq!(step, "promotion of file2.csv"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(transaction.history().contains(&TransactionState::Promoting));
        assert_eq!(transaction.state(), TransactionState::RolledBack);
        for (i, target) in targets.iter().enumerate() {
            assert_eq!(std::fs::read_to_string(target).unwrap(), format!("original {i}"));
        }
    }

    #[test]
    fn test_unrestorable_target_leaves_rolling_back() {
        let (temp, targets) = setup(2);
        let mut plan = ApplyPlan::new(temp.path());
        plan.push(&targets[0], Suffix { name: "first", fail: false });
        plan.push(&targets[1], ClobberTarget);

        let mut transaction = ApplyTransaction::new();
        let err = transaction.run(&plan).unwrap_err();
        match err {
            Error::RollbackIncomplete { unrestored, backups } => {
                assert_eq!(unrestored, vec![targets[1].clone()]);
                assert_eq!(backups.len(), 2);
                assert_eq!(std::fs::read_to_string(&backups[1]).unwrap(), "original 1");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(transaction.state(), TransactionState::RollingBack);
        assert!(!transaction.state().is_terminal());
        assert_eq!(std::fs::read_to_string(&targets[0]).unwrap(), "original 0");
    }
}
