use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::inspect_status::{InspectOptions, StatusInspector};
use crate::application::use_cases::reset_history::ResetHistoryUseCase;
use crate::infrastructure::git::GitProcessClient;
use crate::presentation::cli::prompt::TerminalPrompt;

/// Handler for the reset command.
pub struct ResetCommand {
    paths: Vec<PathBuf>,
}

impl ResetCommand {
    /// Create the handler from the resolved fleet.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Inspect the fleet, capture remote URLs, then run the confirmed reset.
    pub async fn execute(&self) -> Result<()> {
        let git = GitProcessClient::new();
        git.check_availability().await?;

        // Remote URLs must be read now; the reset deletes the configuration
        // they live in.
        let options = InspectOptions {
            remote_url: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git).inspect(&self.paths, options).await?;

        let mut prompt = TerminalPrompt;
        let mut use_case = ResetHistoryUseCase::new(&git, &mut prompt);
        let outcome = use_case.execute(&inspection).await?;

        if !outcome.reset.is_empty() {
            println!(
                "{} reset {} repositories",
                "✓".green().bold(),
                outcome.reset.len()
            );
        }
        if !outcome.failed.is_empty() {
            return Err(anyhow::anyhow!(
                "Reset failed for {} repositories",
                outcome.failed.len()
            ));
        }

        Ok(())
    }
}
