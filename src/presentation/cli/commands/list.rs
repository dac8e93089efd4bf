use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

/// Handler for the list command.
pub struct ListCommand {
    paths: Vec<PathBuf>,
}

impl ListCommand {
    /// Create the handler from the resolved fleet.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Print every candidate directory.
    pub fn execute(&self) -> Result<()> {
        println!("{} Candidate repository directories:", "::".blue().bold());
        for path in &self.paths {
            println!("  {}", path.display());
        }
        println!("{} {} directories", "✓".green().bold(), self.paths.len());
        Ok(())
    }
}
