//! Batch commit engine.
//!
//! Selection starts from every repository with pending changes, partitioned
//! by main-branch membership. Untracked files are treated as a signal of
//! something unintentional: unless explicitly allowed, repositories holding
//! them are pulled out of the batch (optionally after a per-repository
//! interactive review). One global confirmation gates execution; individual
//! commit failures never stop the rest of the batch.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::application::prompt::{Prompt, ReviewDecision};
use crate::application::use_cases::inspect_status::FleetInspection;
use crate::domain::value_objects::branch_set::MainBranchSet;
use crate::infrastructure::git::GitClient;

/// Batch commit policy.
#[derive(Debug, Clone)]
pub struct CommitBatchConfig {
    /// Commit message applied to every selected repository.
    pub message: String,

    /// Include repositories that are not on a main branch.
    pub include_other_branches: bool,

    /// Commit repositories even when they contain new (untracked) files.
    pub commit_new_files: bool,

    /// Review each repository with new files interactively instead of
    /// excluding it outright. Only meaningful when `commit_new_files` is
    /// false.
    pub review_new_files: bool,

    /// Branch names that count as "main".
    pub main_branches: MainBranchSet,
}

/// Errors that abort a commit batch before or during selection.
#[derive(Debug, Error)]
pub enum CommitBatchError {
    /// The user declined the confirmation or quit during review.
    #[error("commit batch aborted by user")]
    Aborted,

    /// The interactive prompt failed.
    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// The selection, before new-file review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPlan {
    /// Repositories to commit, main-branch entries first, each group
    /// sorted.
    pub included: Vec<PathBuf>,

    /// Dirty repositories excluded for being on another branch.
    pub excluded_other_branches: Vec<PathBuf>,

    /// Repositories holding new files, candidates for exclusion or review.
    pub with_new_files: Vec<PathBuf>,
}

impl CommitPlan {
    /// Compute the selection from an inspection. Pure; no prompting.
    pub fn build(inspection: &FleetInspection, config: &CommitBatchConfig) -> Self {
        let mut on_main = Vec::new();
        let mut off_main = Vec::new();

        for (path, status) in &inspection.statuses {
            if status.all_committed {
                continue;
            }
            if status.is_on_main(&config.main_branches) {
                on_main.push(path.clone());
            } else {
                off_main.push(path.clone());
            }
        }

        let mut included = on_main;
        let mut excluded_other_branches = Vec::new();
        if config.include_other_branches {
            included.extend(off_main);
        } else {
            excluded_other_branches = off_main;
        }

        let with_new_files = if config.commit_new_files {
            Vec::new()
        } else {
            inspection
                .statuses
                .values()
                .filter(|s| s.has_new_files())
                .map(|s| s.location.clone())
                .collect()
        };

        Self {
            included,
            excluded_other_branches,
            with_new_files,
        }
    }
}

/// Result of executing a commit batch.
#[derive(Debug, Default)]
pub struct CommitBatchOutcome {
    /// Repositories committed successfully.
    pub committed: Vec<PathBuf>,

    /// Repositories whose stage or commit invocation failed.
    pub failed: Vec<PathBuf>,
}

/// Commit use case.
pub struct CommitBatchUseCase<'a> {
    git: &'a dyn GitClient,
    prompt: &'a mut dyn Prompt,
    config: CommitBatchConfig,
}

impl<'a> CommitBatchUseCase<'a> {
    /// Create the use case over a git client and an interactive prompt.
    pub fn new(
        git: &'a dyn GitClient,
        prompt: &'a mut dyn Prompt,
        config: CommitBatchConfig,
    ) -> Self {
        Self {
            git,
            prompt,
            config,
        }
    }

    /// Run selection, review, confirmation, and execution.
    ///
    /// The inspection should have been run with `check_untracked` whenever
    /// `commit_new_files` is false, otherwise no repository is treated as
    /// holding new files.
    pub async fn execute(
        &mut self,
        inspection: &FleetInspection,
    ) -> Result<CommitBatchOutcome, CommitBatchError> {
        let mut plan = CommitPlan::build(inspection, &self.config);

        // Per-repository review can rescue a repository from the new-file
        // exclusion; "quit" aborts the whole run before any mutation.
        if !self.config.commit_new_files && self.config.review_new_files {
            let mut still_excluded = Vec::new();
            for path in &plan.with_new_files {
                let files = inspection
                    .statuses
                    .get(path)
                    .and_then(|s| s.untracked_files.clone())
                    .unwrap_or_default();
                match self.prompt.review_new_files(path, &files)? {
                    ReviewDecision::Include => {}
                    ReviewDecision::Skip => still_excluded.push(path.clone()),
                    ReviewDecision::Abort => return Err(CommitBatchError::Aborted),
                }
            }
            plan.with_new_files = still_excluded;
        }

        if !self.config.commit_new_files {
            plan.included.retain(|p| !plan.with_new_files.contains(p));
        }

        self.print_plan(&plan);

        if plan.included.is_empty() {
            println!("{} all projects fully committed", "✓".green().bold());
            return Ok(CommitBatchOutcome::default());
        }

        if !self.prompt.confirm("Proceed with commit")? {
            return Err(CommitBatchError::Aborted);
        }

        let mut outcome = CommitBatchOutcome::default();
        for path in &plan.included {
            let result = async {
                self.git.stage_all(path).await?;
                self.git.commit(path, &self.config.message).await
            }
            .await;

            match result {
                Ok(()) => {
                    println!("{} committed {}", "✓".green(), path.display());
                    outcome.committed.push(path.clone());
                }
                Err(e) => {
                    println!("{} commit failed for {}: {}", "⚠".yellow(), path.display(), e);
                    outcome.failed.push(path.clone());
                }
            }
        }

        if !outcome.failed.is_empty() {
            println!("\n{} Commit failed for:", "⚠".yellow().bold());
            for path in &outcome.failed {
                println!("  {}", path.display().to_string().red());
            }
        }

        Ok(outcome)
    }

    fn print_plan(&self, plan: &CommitPlan) {
        let scope = if self.config.include_other_branches {
            "ALL BRANCHES"
        } else {
            "MAIN BRANCHES"
        };

        println!("\n{} INCLUDED folders to commit on {}:", "::".blue().bold(), scope);
        for path in &plan.included {
            println!("  {}", path.display());
        }

        if !self.config.include_other_branches && !plan.excluded_other_branches.is_empty() {
            println!("\n{} EXCLUDED folders (on other branches):", "::".blue().bold());
            for path in &plan.excluded_other_branches {
                println!("  {}", path.display());
            }
        }

        if !self.config.commit_new_files && !plan.with_new_files.is_empty() {
            println!("\n{} EXCLUDED folders (contain new files):", "::".blue().bold());
            for path in &plan.with_new_files {
                println!("  {}", path.display());
            }
        }
    }
}
