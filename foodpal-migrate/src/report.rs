use std::path::PathBuf;

use serde::Serialize;

use crate::db::PendingAlteration;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub table: String,
    pub column: String,
    pub outcome: ColumnOutcome,
}

/// What a successful run did, one entry per target column, in target order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub store: PathBuf,
    pub columns: Vec<ColumnReport>,
}

impl MigrationReport {
    pub fn added(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.outcome == ColumnOutcome::Added)
            .count()
    }

    pub fn is_noop(&self) -> bool {
        self.added() == 0
    }
}


/// Result of one invocation. Failures are values here, never errors:
/// the process always exits normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    StoreMissing { store: PathBuf },
    Migrated(MigrationReport),
    Pending { store: PathBuf, alterations: Vec<PendingAlteration> },
    Initialized { store: PathBuf, created: bool },
    Failed { code: String, message: String },
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}
