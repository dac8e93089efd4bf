//! Per-repository status derived from `git status` output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::branch_set::MainBranchSet;

/// Position of one side of a tracking relationship relative to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// No tracking relationship was detected, or the relation could not be
    /// determined from the available output.
    Unknown,
    /// Both sides point at the same commit.
    UpToDate,
    /// This side has commits the other does not.
    Ahead,
}

/// Status of a single inspected repository.
///
/// Constructed fresh on every inspection; read-only afterwards. The three
/// optional fields are populated if and only if the corresponding
/// [`InspectOptions`](crate::application::use_cases::inspect_status::InspectOptions)
/// flag was set, so that no unnecessary git invocations happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    /// Repository root directory.
    pub location: PathBuf,

    /// Name of the currently checked-out branch.
    pub branch: String,

    /// True iff the working tree has no pending changes.
    pub all_committed: bool,

    /// Local branch relative to its remote-tracking branch, derived from
    /// status text alone.
    pub local_vs_origin: SyncState,

    /// Whether a tracking relationship was detected.
    pub has_origin: bool,

    /// Remote relative to local. Requires a dry-run fetch, so it is only
    /// present when the origin check was requested; `Unknown` when the
    /// check ran but the repository has no tracking branch.
    pub origin_vs_local: Option<SyncState>,

    /// Untracked files (honoring ignore rules), present only when requested.
    pub untracked_files: Option<Vec<String>>,

    /// Configured URL of the default remote. `None` both when the lookup was
    /// not requested and when no remote is configured; every consumer treats
    /// the two identically as "no remote available".
    pub remote_url: Option<String>,
}

impl RepoStatus {
    /// Create a status with no enrichment fields populated.
    pub fn new(location: PathBuf, branch: impl Into<String>) -> Self {
        Self {
            location,
            branch: branch.into(),
            all_committed: false,
            local_vs_origin: SyncState::Unknown,
            has_origin: false,
            origin_vs_local: None,
            untracked_files: None,
            remote_url: None,
        }
    }

    /// Whether the current branch is in the accepted main-branch set.
    pub fn is_on_main(&self, main_branches: &MainBranchSet) -> bool {
        main_branches.contains(&self.branch)
    }

    /// Push candidate: fully committed and ahead of the tracking branch.
    pub fn needs_push(&self) -> bool {
        self.all_committed && self.local_vs_origin == SyncState::Ahead
    }

    /// Pull candidate: fully committed and the remote has new commits.
    /// Always false unless the origin check was run.
    pub fn needs_pull(&self) -> bool {
        self.all_committed && self.origin_vs_local == Some(SyncState::Ahead)
    }

    /// Whether the untracked-file listing was requested and is non-empty.
    pub fn has_new_files(&self) -> bool {
        self.untracked_files
            .as_ref()
            .is_some_and(|files| !files.is_empty())
    }
}
