use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::inspect_status::{InspectOptions, StatusInspector};
use crate::application::use_cases::push_batch::{PushBatchConfig, PushBatchUseCase};
use crate::infrastructure::git::{GitProcessClient, PushCredentials};
use crate::presentation::cli::prompt::TerminalPrompt;

/// Handler for the push command.
pub struct PushCommand {
    paths: Vec<PathBuf>,
    force: bool,
    credentials: Option<PushCredentials>,
}

impl PushCommand {
    /// Create the handler from the resolved fleet and push options.
    pub fn new(paths: Vec<PathBuf>, force: bool, credentials: Option<PushCredentials>) -> Self {
        Self {
            paths,
            force,
            credentials,
        }
    }

    /// Inspect the fleet, then run the confirmed push batch.
    pub async fn execute(&self) -> Result<()> {
        let git = GitProcessClient::new();
        git.check_availability().await?;

        // Remote URLs are only needed to decide which pushes the credentials
        // apply to.
        let options = InspectOptions {
            remote_url: self.credentials.is_some(),
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git).inspect(&self.paths, options).await?;

        let config = PushBatchConfig {
            force: self.force,
            credentials: self.credentials.clone(),
        };
        let mut prompt = TerminalPrompt;
        let mut use_case = PushBatchUseCase::new(&git, &mut prompt, config);
        let outcome = use_case.execute(&inspection).await?;

        if !outcome.pushed.is_empty() {
            println!(
                "{} pushed {} repositories",
                "✓".green().bold(),
                outcome.pushed.len()
            );
        }
        if !outcome.failed.is_empty() {
            return Err(anyhow::anyhow!(
                "Push failed for {} repositories",
                outcome.failed.len()
            ));
        }

        Ok(())
    }
}
