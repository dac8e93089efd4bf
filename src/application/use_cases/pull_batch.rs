//! Batch pull engine.
//!
//! A repository qualifies when it is fully committed and its remote holds
//! commits the local branch does not. Detecting the latter requires the
//! dry-run fetch, so callers must run the inspection with the origin check
//! enabled or the selection is always empty.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::application::prompt::Prompt;
use crate::application::use_cases::inspect_status::FleetInspection;
use crate::infrastructure::git::GitClient;

/// Errors that abort a pull batch.
#[derive(Debug, Error)]
pub enum PullBatchError {
    /// The user declined the confirmation.
    #[error("pull batch aborted by user")]
    Aborted,

    /// The interactive prompt failed.
    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Result of executing a pull batch.
#[derive(Debug, Default)]
pub struct PullBatchOutcome {
    /// Repositories pulled successfully.
    pub pulled: Vec<PathBuf>,

    /// Repositories whose pull failed.
    pub failed: Vec<PathBuf>,
}

/// Pull use case.
pub struct PullBatchUseCase<'a> {
    git: &'a dyn GitClient,
    prompt: &'a mut dyn Prompt,
}

impl<'a> PullBatchUseCase<'a> {
    /// Create the use case over a git client and an interactive prompt.
    pub fn new(git: &'a dyn GitClient, prompt: &'a mut dyn Prompt) -> Self {
        Self { git, prompt }
    }

    /// Select, confirm, and pull.
    pub async fn execute(
        &mut self,
        inspection: &FleetInspection,
    ) -> Result<PullBatchOutcome, PullBatchError> {
        let selected: Vec<_> = inspection
            .statuses
            .values()
            .filter(|s| s.needs_pull())
            .collect();

        if selected.is_empty() {
            println!("{} nothing to pull", "✓".green().bold());
            return Ok(PullBatchOutcome::default());
        }

        println!("\n{} Folders to pull:", "::".blue().bold());
        for status in &selected {
            println!("  {} ({})", status.location.display(), status.branch);
        }

        if !self.prompt.confirm("Proceed with pull")? {
            return Err(PullBatchError::Aborted);
        }

        let mut outcome = PullBatchOutcome::default();
        for status in selected {
            let path = &status.location;
            match self.git.pull(path, &status.branch).await {
                Ok(()) => {
                    println!("{} pulled {}", "✓".green(), path.display());
                    outcome.pulled.push(path.clone());
                }
                Err(e) => {
                    println!("{} pull failed for {}: {}", "⚠".yellow(), path.display(), e);
                    outcome.failed.push(path.clone());
                }
            }
        }

        if !outcome.failed.is_empty() {
            println!("\n{} Pull failed for:", "⚠".yellow().bold());
            for path in &outcome.failed {
                println!("  {}", path.display().to_string().red());
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::prompt::test_support::ScriptedPrompt;
    use crate::domain::entities::repo_status::{RepoStatus, SyncState};
    use crate::infrastructure::git::{GitCommandError, MockGitClient};
    use pretty_assertions::assert_eq;

    fn sample_inspection() -> FleetInspection {
        let mut inspection = FleetInspection::default();

        let mut behind = RepoStatus::new(PathBuf::from("/repos/behind"), "main");
        behind.all_committed = true;
        behind.has_origin = true;
        behind.origin_vs_local = Some(SyncState::Ahead);

        let mut current = RepoStatus::new(PathBuf::from("/repos/current"), "main");
        current.all_committed = true;
        current.has_origin = true;
        current.origin_vs_local = Some(SyncState::UpToDate);

        // Behind but dirty: pulling would risk a merge over uncommitted work.
        let mut dirty = RepoStatus::new(PathBuf::from("/repos/dirty"), "main");
        dirty.all_committed = false;
        dirty.has_origin = true;
        dirty.origin_vs_local = Some(SyncState::Ahead);

        for status in [behind, current, dirty] {
            inspection.statuses.insert(status.location.clone(), status);
        }
        inspection
    }

    #[tokio::test]
    async fn test_pulls_only_committed_behind_repositories() {
        let mut git = MockGitClient::new();
        git.expect_pull()
            .withf(|p, branch| p == PathBuf::from("/repos/behind") && branch == "main")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut prompt = ScriptedPrompt::accepting();

        let mut use_case = PullBatchUseCase::new(&git, &mut prompt);
        let outcome = use_case.execute(&sample_inspection()).await.unwrap();

        assert_eq!(outcome.pulled, vec![PathBuf::from("/repos/behind")]);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_selection_empty_without_origin_check() {
        // No origin check ran, so origin_vs_local is None everywhere and
        // nothing qualifies.
        let mut inspection = FleetInspection::default();
        let mut status = RepoStatus::new(PathBuf::from("/repos/a"), "main");
        status.all_committed = true;
        status.has_origin = true;
        inspection.statuses.insert(status.location.clone(), status);

        let mut git = MockGitClient::new();
        git.expect_pull().never();
        let mut prompt = ScriptedPrompt::accepting();

        let mut use_case = PullBatchUseCase::new(&git, &mut prompt);
        let outcome = use_case.execute(&inspection).await.unwrap();
        assert!(outcome.pulled.is_empty());
    }

    #[tokio::test]
    async fn test_declined_confirmation_aborts_without_pulling() {
        let mut git = MockGitClient::new();
        git.expect_pull().never();
        let mut prompt = ScriptedPrompt::declining();

        let mut use_case = PullBatchUseCase::new(&git, &mut prompt);
        let result = use_case.execute(&sample_inspection()).await;

        assert!(matches!(result, Err(PullBatchError::Aborted)));
    }

    #[tokio::test]
    async fn test_failures_are_collected() {
        let mut git = MockGitClient::new();
        git.expect_pull().returning(|_, _| {
            Err(GitCommandError::Failed {
                command: "git pull origin main".to_string(),
                exit_code: Some(1),
                stderr: "merge conflict".to_string(),
            })
        });
        let mut prompt = ScriptedPrompt::accepting();

        let mut use_case = PullBatchUseCase::new(&git, &mut prompt);
        let outcome = use_case.execute(&sample_inspection()).await.unwrap();

        assert!(outcome.pulled.is_empty());
        assert_eq!(outcome.failed, vec![PathBuf::from("/repos/behind")]);
    }
}
