use anyhow::Result;
use colored::Colorize;

use crate::infrastructure::remote::github::GithubRepoLister;

/// Handler for the list-remote command.
pub struct ListRemoteCommand {
    username: String,
    per_page: u32,
}

impl ListRemoteCommand {
    /// Create the handler for one account.
    pub fn new(username: String, per_page: u32) -> Self {
        Self { username, per_page }
    }

    /// Fetch and print the account's repository names.
    pub async fn execute(&self) -> Result<()> {
        let lister = GithubRepoLister::new();
        let names = lister
            .list_repository_names(&self.username, self.per_page)
            .await?;

        println!(
            "{} Repositories for {}:",
            "::".blue().bold(),
            self.username.bold()
        );
        for name in &names {
            println!("  {}", name);
        }
        println!("{} {} repositories", "✓".green().bold(), names.len());
        Ok(())
    }
}
