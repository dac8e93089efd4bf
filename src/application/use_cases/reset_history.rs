//! History reset: replace every repository's history with a single commit.
//!
//! Destructive and deliberately blunt. Each repository's `.git` directory is
//! deleted outright, a fresh repository is initialized over the working tree,
//! everything is committed once, and the previously configured remote URL is
//! registered again. Remote URLs are read during inspection, before anything
//! is deleted. One confirmation covers the whole run; afterwards each
//! repository proceeds independently and failures are collected.

use std::path::{Path, PathBuf};

use colored::Colorize;
use thiserror::Error;

use crate::application::prompt::Prompt;
use crate::application::use_cases::inspect_status::FleetInspection;
use crate::common::error::FleetError;
use crate::infrastructure::filesystem::permissions::make_writable_recursive;
use crate::infrastructure::git::{GitClient, GitCommandError, DEFAULT_REMOTE};

const RESET_COMMIT_MESSAGE: &str = "Initial commit";

/// Failure of a single repository's reset; collected, never fatal.
#[derive(Debug, Error)]
enum ResetStepError {
    #[error(transparent)]
    Filesystem(#[from] FleetError),

    #[error(transparent)]
    Git(#[from] GitCommandError),
}

/// Errors that abort a reset run before it mutates anything.
#[derive(Debug, Error)]
pub enum ResetHistoryError {
    /// The user declined the confirmation.
    #[error("history reset aborted by user")]
    Aborted,

    /// The interactive prompt failed.
    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Result of a reset run.
#[derive(Debug, Default)]
pub struct ResetHistoryOutcome {
    /// Repositories whose history was replaced.
    pub reset: Vec<PathBuf>,

    /// Repositories where a step failed. These may be left mid-reset and
    /// need manual attention.
    pub failed: Vec<PathBuf>,
}

/// Reset use case.
pub struct ResetHistoryUseCase<'a> {
    git: &'a dyn GitClient,
    prompt: &'a mut dyn Prompt,
}

impl<'a> ResetHistoryUseCase<'a> {
    /// Create the use case over a git client and an interactive prompt.
    pub fn new(git: &'a dyn GitClient, prompt: &'a mut dyn Prompt) -> Self {
        Self { git, prompt }
    }

    /// Confirm once, then reset every inspected repository.
    ///
    /// The inspection must have been run with the remote-URL lookup enabled,
    /// otherwise no remote is re-registered afterwards.
    pub async fn execute(
        &mut self,
        inspection: &FleetInspection,
    ) -> Result<ResetHistoryOutcome, ResetHistoryError> {
        let locations = inspection.locations();
        if locations.is_empty() {
            println!("{} no repositories to reset", "✓".green().bold());
            return Ok(ResetHistoryOutcome::default());
        }

        println!(
            "\n{} Repositories whose ENTIRE HISTORY will be deleted:",
            "⚠".yellow().bold()
        );
        for path in &locations {
            println!("  {}", path.display().to_string().red());
        }

        if !self
            .prompt
            .confirm("Delete all history and start each repository over")?
        {
            return Err(ResetHistoryError::Aborted);
        }

        let mut outcome = ResetHistoryOutcome::default();
        for path in &locations {
            let remote_url = inspection
                .statuses
                .get(path)
                .and_then(|s| s.remote_url.as_deref());

            match self.reset_one(path, remote_url).await {
                Ok(()) => {
                    println!("{} reset {}", "✓".green(), path.display());
                    outcome.reset.push(path.clone());
                }
                Err(e) => {
                    println!("{} reset failed for {}: {}", "⚠".yellow(), path.display(), e);
                    outcome.failed.push(path.clone());
                }
            }
        }

        if !outcome.failed.is_empty() {
            println!(
                "\n{} Reset failed (repositories may be mid-reset):",
                "⚠".yellow().bold()
            );
            for path in &outcome.failed {
                println!("  {}", path.display().to_string().red());
            }
        }

        Ok(outcome)
    }

    async fn reset_one(
        &self,
        path: &Path,
        remote_url: Option<&str>,
    ) -> Result<(), ResetStepError> {
        // Object files under .git are read-only; make the tree writable
        // before deleting it.
        make_writable_recursive(path)?;
        let git_dir = path.join(".git");
        std::fs::remove_dir_all(&git_dir).map_err(|e| {
            FleetError::filesystem_error_with_source(
                format!("Failed to delete {}", git_dir.display()),
                Some(git_dir.clone()),
                e,
            )
        })?;

        self.git.init_repository(path).await?;
        self.git.stage_all(path).await?;
        self.git.commit(path, RESET_COMMIT_MESSAGE).await?;

        if let Some(url) = remote_url {
            self.git.add_remote(path, DEFAULT_REMOTE, url).await?;
        }

        Ok(())
    }
}
