//! Report Aggregator: partition an inspection into actionable categories.

use std::path::PathBuf;

use serde::Serialize;

use crate::application::use_cases::inspect_status::FleetInspection;
use crate::domain::entities::repo_status::SyncState;
use crate::domain::value_objects::branch_set::MainBranchSet;

/// The five partitions surfaced to the user. Paths within each partition are
/// sorted; a partition is simply empty when nothing falls into it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    /// Paths where inspection failed.
    pub not_repositories: Vec<PathBuf>,

    /// Local branch ahead of its tracking branch (push candidates).
    pub ahead_of_origin: Vec<PathBuf>,

    /// Tracking branch ahead of local (pull candidates). Only populated
    /// when the inspection ran the origin check.
    pub behind_origin: Vec<PathBuf>,

    /// Repositories not on an accepted main branch.
    pub off_main_branch: Vec<PathBuf>,

    /// Repositories on a main branch with uncommitted changes.
    pub uncommitted_on_main: Vec<PathBuf>,
}

impl StatusReport {
    /// Build the report from an inspection.
    pub fn from_inspection(inspection: &FleetInspection, main_branches: &MainBranchSet) -> Self {
        let mut report = Self {
            not_repositories: inspection.not_repositories.clone(),
            ..Default::default()
        };
        report.not_repositories.sort();

        for (path, status) in &inspection.statuses {
            if status.local_vs_origin == SyncState::Ahead {
                report.ahead_of_origin.push(path.clone());
            }
            if status.origin_vs_local == Some(SyncState::Ahead) {
                report.behind_origin.push(path.clone());
            }
            if !status.is_on_main(main_branches) {
                report.off_main_branch.push(path.clone());
            } else if !status.all_committed {
                report.uncommitted_on_main.push(path.clone());
            }
        }

        report
    }

    /// True when every partition is empty.
    pub fn is_all_clear(&self) -> bool {
        self.not_repositories.is_empty()
            && self.ahead_of_origin.is_empty()
            && self.behind_origin.is_empty()
            && self.off_main_branch.is_empty()
            && self.uncommitted_on_main.is_empty()
    }
}
