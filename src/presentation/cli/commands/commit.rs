use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::commit_batch::{
    CommitBatchConfig, CommitBatchUseCase,
};
use crate::application::use_cases::inspect_status::{InspectOptions, StatusInspector};
use crate::infrastructure::git::GitProcessClient;
use crate::presentation::cli::prompt::TerminalPrompt;

/// Handler for the commit command.
pub struct CommitCommand {
    paths: Vec<PathBuf>,
    config: CommitBatchConfig,
}

impl CommitCommand {
    /// Create the handler from the resolved fleet and commit policy.
    pub fn new(paths: Vec<PathBuf>, config: CommitBatchConfig) -> Self {
        Self { paths, config }
    }

    /// Inspect the fleet, then run the confirmed commit batch.
    pub async fn execute(&self) -> Result<()> {
        let git = GitProcessClient::new();
        git.check_availability().await?;

        // The untracked listing drives the new-file exclusion, so it is only
        // needed when that exclusion is active.
        let options = InspectOptions {
            check_untracked: !self.config.commit_new_files,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git).inspect(&self.paths, options).await?;

        let mut prompt = TerminalPrompt;
        let mut use_case = CommitBatchUseCase::new(&git, &mut prompt, self.config.clone());
        let outcome = use_case.execute(&inspection).await?;

        if !outcome.committed.is_empty() {
            println!(
                "{} committed {} repositories",
                "✓".green().bold(),
                outcome.committed.len()
            );
        }
        if !outcome.failed.is_empty() {
            return Err(anyhow::anyhow!(
                "Commit failed for {} repositories",
                outcome.failed.len()
            ));
        }

        Ok(())
    }
}
