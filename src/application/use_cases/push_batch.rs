//! Batch push engine.
//!
//! Candidates are repositories that are fully committed and ahead of their
//! tracking branch. Forcing widens the selection to every fully committed
//! repository with a tracking branch, for remotes whose history diverged.
//! One confirmation gates the batch; per-repository failures are collected
//! and reported, never fatal.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::application::prompt::Prompt;
use crate::application::use_cases::inspect_status::FleetInspection;
use crate::infrastructure::git::{GitClient, PushCredentials};

/// Batch push policy.
#[derive(Debug, Clone, Default)]
pub struct PushBatchConfig {
    /// Force-push, and include every committed repository with a tracking
    /// branch instead of only those ahead of it.
    pub force: bool,

    /// Credentials injected into pushes whose remote URL matches. Pushes to
    /// non-matching remotes go through the ordinary transport. Applying
    /// credentials requires the inspection to have read remote URLs.
    pub credentials: Option<PushCredentials>,
}

/// Errors that abort a push batch.
#[derive(Debug, Error)]
pub enum PushBatchError {
    /// The user declined the confirmation.
    #[error("push batch aborted by user")]
    Aborted,

    /// The interactive prompt failed.
    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Result of executing a push batch.
#[derive(Debug, Default)]
pub struct PushBatchOutcome {
    /// Repositories pushed successfully.
    pub pushed: Vec<PathBuf>,

    /// Repositories whose push failed.
    pub failed: Vec<PathBuf>,
}

/// Push use case.
pub struct PushBatchUseCase<'a> {
    git: &'a dyn GitClient,
    prompt: &'a mut dyn Prompt,
    config: PushBatchConfig,
}

impl<'a> PushBatchUseCase<'a> {
    /// Create the use case over a git client and an interactive prompt.
    pub fn new(
        git: &'a dyn GitClient,
        prompt: &'a mut dyn Prompt,
        config: PushBatchConfig,
    ) -> Self {
        Self {
            git,
            prompt,
            config,
        }
    }

    /// Select, confirm, and push.
    pub async fn execute(
        &mut self,
        inspection: &FleetInspection,
    ) -> Result<PushBatchOutcome, PushBatchError> {
        let selected: Vec<_> = inspection
            .statuses
            .values()
            .filter(|s| {
                if self.config.force {
                    s.all_committed && s.has_origin
                } else {
                    s.needs_push()
                }
            })
            .collect();

        if selected.is_empty() {
            println!("{} nothing to push", "✓".green().bold());
            return Ok(PushBatchOutcome::default());
        }

        println!("\n{} Folders to push:", "::".blue().bold());
        for status in &selected {
            println!("  {} ({})", status.location.display(), status.branch);
        }

        let question = if self.config.force {
            "Proceed with FORCE push"
        } else {
            "Proceed with push"
        };
        if !self.prompt.confirm(question)? {
            return Err(PushBatchError::Aborted);
        }

        let mut outcome = PushBatchOutcome::default();
        for status in selected {
            let path = &status.location;
            let credentials = self.config.credentials.as_ref().filter(|c| {
                status
                    .remote_url
                    .as_deref()
                    .is_some_and(|url| c.matches(url))
            });

            let result = match credentials {
                Some(creds) => {
                    self.git
                        .push_authenticated(path, &status.branch, self.config.force, creds)
                        .await
                }
                None => self.git.push(path, &status.branch, self.config.force).await,
            };

            match result {
                Ok(()) => {
                    println!("{} pushed {}", "✓".green(), path.display());
                    outcome.pushed.push(path.clone());
                }
                Err(e) => {
                    println!("{} push failed for {}: {}", "⚠".yellow(), path.display(), e);
                    outcome.failed.push(path.clone());
                }
            }
        }

        if !outcome.failed.is_empty() {
            println!("\n{} Push failed for:", "⚠".yellow().bold());
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

    /// D ahead and committed, E up to date, F ahead but dirty. Only D is a
    /// push candidate.
    fn sample_inspection() -> FleetInspection {
        let mut inspection = FleetInspection::default();

        let mut d = RepoStatus::new(PathBuf::from("/repos/d"), "main");
        d.all_committed = true;
        d.has_origin = true;
        d.local_vs_origin = SyncState::Ahead;

        let mut e = RepoStatus::new(PathBuf::from("/repos/e"), "main");
        e.all_committed = true;
        e.has_origin = true;
        e.local_vs_origin = SyncState::UpToDate;

        let mut f = RepoStatus::new(PathBuf::from("/repos/f"), "main");
        f.all_committed = false;
        f.has_origin = true;
        f.local_vs_origin = SyncState::Ahead;

        for status in [d, e, f] {
            inspection.statuses.insert(status.location.clone(), status);
        }
        inspection
    }

    #[tokio::test]
    async fn test_pushes_only_committed_ahead_repositories() {
        let mut git = MockGitClient::new();
        git.expect_push()
            .withf(|p, branch, force| {
                p == PathBuf::from("/repos/d") && branch == "main" && !force
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut prompt = ScriptedPrompt::accepting();

        let mut use_case =
            PushBatchUseCase::new(&git, &mut prompt, PushBatchConfig::default());
        let outcome = use_case.execute(&sample_inspection()).await.unwrap();

        assert_eq!(outcome.pushed, vec![PathBuf::from("/repos/d")]);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_force_widens_selection_to_all_committed() {
        let mut git = MockGitClient::new();
        git.expect_push()
            .withf(|_, _, force| *force)
            .times(2)
            .returning(|_, _, _| Ok(()));
        let mut prompt = ScriptedPrompt::accepting();

        let config = PushBatchConfig {
            force: true,
            credentials: None,
        };
        let mut use_case = PushBatchUseCase::new(&git, &mut prompt, config);
        let outcome = use_case.execute(&sample_inspection()).await.unwrap();

        // D and E (committed with a tracking branch); never F (dirty).
        assert_eq!(
            outcome.pushed,
            vec![PathBuf::from("/repos/d"), PathBuf::from("/repos/e")]
        );
    }

    #[tokio::test]
    async fn test_declined_confirmation_aborts_without_pushing() {
        let mut git = MockGitClient::new();
        git.expect_push().never();
        let mut prompt = ScriptedPrompt::declining();

        let mut use_case =
            PushBatchUseCase::new(&git, &mut prompt, PushBatchConfig::default());
        let result = use_case.execute(&sample_inspection()).await;

        assert!(matches!(result, Err(PushBatchError::Aborted)));
    }

    #[tokio::test]
    async fn test_credentials_route_matching_remotes() {
        let mut inspection = sample_inspection();
        if let Some(d) = inspection.statuses.get_mut(&PathBuf::from("/repos/d")) {
            d.remote_url = Some("https://github.com/someuser/d.git".to_string());
        }

        let mut git = MockGitClient::new();
        git.expect_push_authenticated()
            .withf(|p, branch, _, creds| {
                p == PathBuf::from("/repos/d") && branch == "main" && creds.username() == "someuser"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        git.expect_push().never();
        let mut prompt = ScriptedPrompt::accepting();

        let config = PushBatchConfig {
            force: false,
            credentials: Some(PushCredentials::new(
                "https://github.com/someuser/",
                "someuser",
                "s3cret",
            )),
        };
        let mut use_case = PushBatchUseCase::new(&git, &mut prompt, config);
        let outcome = use_case.execute(&inspection).await.unwrap();

        assert_eq!(outcome.pushed, vec![PathBuf::from("/repos/d")]);
    }

    #[tokio::test]
    async fn test_non_matching_remote_uses_plain_transport() {
        let mut inspection = sample_inspection();
        if let Some(d) = inspection.statuses.get_mut(&PathBuf::from("/repos/d")) {
            d.remote_url = Some("git@gitlab.com:someuser/d.git".to_string());
        }

        let mut git = MockGitClient::new();
        git.expect_push_authenticated().never();
        git.expect_push().times(1).returning(|_, _, _| Ok(()));
        let mut prompt = ScriptedPrompt::accepting();

        let config = PushBatchConfig {
            force: false,
            credentials: Some(PushCredentials::new(
                "https://github.com/someuser/",
                "someuser",
                "s3cret",
            )),
        };
        let mut use_case = PushBatchUseCase::new(&git, &mut prompt, config);
        use_case.execute(&inspection).await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_collected() {
        let mut git = MockGitClient::new();
        git.expect_push().returning(|_, _, _| {
            Err(GitCommandError::Failed {
                command: "git push origin main".to_string(),
                exit_code: Some(1),
                stderr: "rejected".to_string(),
            })
        });
        let mut prompt = ScriptedPrompt::accepting();

        let mut use_case =
            PushBatchUseCase::new(&git, &mut prompt, PushBatchConfig::default());
        let outcome = use_case.execute(&sample_inspection()).await.unwrap();

        assert!(outcome.pushed.is_empty());
        assert_eq!(outcome.failed, vec![PathBuf::from("/repos/d")]);
    }
}
