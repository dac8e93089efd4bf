use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::inspect_status::{
    FleetInspection, InspectOptions, StatusInspector,
};
use crate::application::use_cases::report_status::StatusReport;
use crate::domain::entities::repo_status::RepoStatus;
use crate::domain::value_objects::branch_set::MainBranchSet;
use crate::infrastructure::git::GitProcessClient;
use crate::presentation::cli::OutputFormat;

/// Handler for the status command.
pub struct StatusCommand {
    paths: Vec<PathBuf>,
    options: InspectOptions,
    main_branches: MainBranchSet,
    output: OutputFormat,
}

impl StatusCommand {
    /// Create the handler from the resolved fleet and reporting options.
    pub fn new(
        paths: Vec<PathBuf>,
        options: InspectOptions,
        main_branches: MainBranchSet,
        output: OutputFormat,
    ) -> Self {
        Self {
            paths,
            options,
            main_branches,
            output,
        }
    }

    /// Inspect the fleet and print or serialize the categorized report.
    pub async fn execute(&self) -> Result<()> {
        let git = GitProcessClient::new();
        git.check_availability().await?;

        let inspection = StatusInspector::new(&git)
            .inspect(&self.paths, self.options)
            .await?;
        let report = StatusReport::from_inspection(&inspection, &self.main_branches);

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => self.print_report(&report, &inspection),
        }

        Ok(())
    }

    fn print_report(&self, report: &StatusReport, inspection: &FleetInspection) {
        if report.is_all_clear() {
            println!(
                "{} all {} repositories clean and current",
                "✓".green().bold(),
                inspection.statuses.len()
            );
            return;
        }

        self.print_partition("Not git repositories", &report.not_repositories);
        self.print_partition("Ahead of origin (push candidates)", &report.ahead_of_origin);
        self.print_partition("Behind origin (pull candidates)", &report.behind_origin);
        self.print_partition("On another branch", &report.off_main_branch);
        self.print_partition("Uncommitted changes", &report.uncommitted_on_main);

        if self.options.check_untracked {
            let with_new_files: Vec<_> = inspection
                .statuses
                .values()
                .filter(|s| s.has_new_files())
                .collect();
            if !with_new_files.is_empty() {
                println!("\n{} New files:", "::".blue().bold());
                for status in with_new_files {
                    println!("  {}", status.location.display());
                    for file in status.untracked_files.as_deref().unwrap_or_default() {
                        println!("    {}", file.yellow());
                    }
                }
            }
        }

        if self.options.remote_url {
            let (github, other, none) = remote_groups(inspection);
            self.print_remote_group("GitHub remotes", &github);
            self.print_remote_group("Other remotes", &other);
            if !none.is_empty() {
                println!("\n{} No remote configured:", "::".blue().bold());
                for status in none {
                    println!("  {}", status.location.display());
                }
            }
        }
    }

    fn print_remote_group(&self, title: &str, group: &[&RepoStatus]) {
        if group.is_empty() {
            return;
        }
        println!("\n{} {}:", "::".blue().bold(), title);
        for status in group {
            if let Some(url) = &status.remote_url {
                println!("  {}: {}", status.location.display(), url);
            }
        }
    }

    fn print_partition(&self, title: &str, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        println!("\n{} {}:", "::".blue().bold(), title);
        for path in paths {
            println!("  {}", path.display());
        }
    }
}

/// Group inspected repositories by remote presence and host: GitHub remotes,
/// remotes elsewhere, and repositories with no remote at all.
fn remote_groups(
    inspection: &FleetInspection,
) -> (Vec<&RepoStatus>, Vec<&RepoStatus>, Vec<&RepoStatus>) {
    let mut github = Vec::new();
    let mut other = Vec::new();
    let mut none = Vec::new();

    for status in inspection.statuses.values() {
        match status.remote_url.as_deref() {
            Some(url) if url.contains("github.com") => github.push(status),
            Some(_) => other.push(status),
            None => none.push(status),
        }
    }

    (github, other, none)
}
