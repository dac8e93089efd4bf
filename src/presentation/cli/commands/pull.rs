use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::inspect_status::{InspectOptions, StatusInspector};
use crate::application::use_cases::pull_batch::PullBatchUseCase;
use crate::infrastructure::git::GitProcessClient;
use crate::presentation::cli::prompt::TerminalPrompt;

/// Handler for the pull command.
pub struct PullCommand {
    paths: Vec<PathBuf>,
}

impl PullCommand {
    /// Create the handler from the resolved fleet.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Inspect the fleet with the origin check, then run the confirmed pull
    /// batch.
    pub async fn execute(&self) -> Result<()> {
        let git = GitProcessClient::new();
        git.check_availability().await?;

        // Pull candidates are found by the dry-run fetch, so the origin
        // check is mandatory here.
        let options = InspectOptions {
            check_origin: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git).inspect(&self.paths, options).await?;

        let mut prompt = TerminalPrompt;
        let mut use_case = PullBatchUseCase::new(&git, &mut prompt);
        let outcome = use_case.execute(&inspection).await?;

        if !outcome.pulled.is_empty() {
            println!(
                "{} pulled {} repositories",
                "✓".green().bold(),
                outcome.pulled.len()
            );
        }
        if !outcome.failed.is_empty() {
            return Err(anyhow::anyhow!(
                "Pull failed for {} repositories",
                outcome.failed.len()
            ));
        }

        Ok(())
    }
}
