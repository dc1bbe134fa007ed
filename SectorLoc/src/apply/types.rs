//! Types for apply progress tracking

use std::path::PathBuf;

/// Progress callback type for apply transactions
pub type ApplyProgressCallback<'a> = &'a (dyn Fn(&ApplyProgress) + Sync + Send);

/// Progress information during an apply transaction
#[derive(Debug, Clone)]
pub struct ApplyProgress {
    /// Current transaction state
    pub phase: TransactionState,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl ApplyProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: TransactionState, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(phase: TransactionState, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// State of an apply transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionState {
    #[default]
    Idle,
    /// Copying every target to its backup sibling
    BackingUp,
    /// Running injectors into the staging directory
    Injecting,
    /// Copying staged outputs over their targets
    Promoting,
    /// Every target was replaced
    Done,
    /// Copying backups over their targets after a failure
    RollingBack,
    /// Every target holds its pre-apply content again
    RolledBack,
}

impl TransactionState {
    /// Get a human-readable description of this state
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::BackingUp => "Backing up",
            Self::Injecting => "Injecting translations",
            Self::Promoting => "Replacing originals",
            Self::Done => "Done",
            Self::RollingBack => "Restoring originals",
            Self::RolledBack => "Rolled back",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::RolledBack)
    }
}

/// Result of a successful apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files that were replaced, in plan order
    pub targets: Vec<PathBuf>,
    /// Backup siblings holding the pre-apply content
    pub backups: Vec<PathBuf>,
    /// States the transaction passed through
    pub history: Vec<TransactionState>,
}
