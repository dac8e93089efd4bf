//! Command line surface.
//!
//! Argument parsing and dispatch live here; each subcommand's behavior lives
//! in [`commands`]. Directory selection flags are global so every subcommand
//! shares the same fleet definition.

pub mod commands;
pub mod prompt;

use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::domain::value_objects::branch_set::MainBranchSet;
use crate::infrastructure::filesystem::dir_resolver::{read_path_list, resolve_repository_paths};
use crate::infrastructure::git::PushCredentials;

/// Output format options for the status command.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// gitfleet - keep a personal fleet of git repositories in sync
#[derive(Parser)]
#[command(name = "gitfleet")]
#[command(about = "Inspect, commit, push, and pull across many git repositories")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Root directory whose immediate subdirectories are candidate
    /// repositories (repeatable)
    #[arg(short = 'r', long = "root", global = true)]
    pub root: Vec<String>,

    /// Single candidate repository directory (repeatable)
    #[arg(short = 'd', long = "dir", global = true)]
    pub dir: Vec<String>,

    /// File with one root directory per line
    #[arg(long, global = true)]
    pub roots_file: Option<PathBuf>,

    /// File with one repository directory per line; lines starting with #
    /// are skipped
    #[arg(long, global = true)]
    pub dirs_file: Option<PathBuf>,

    /// Branch name treated as a main branch (repeatable; defaults to main
    /// and master)
    #[arg(long = "main-branch", global = true)]
    pub main_branch: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the resolved candidate repository directories
    List,

    /// Show a categorized status report across the fleet
    Status {
        /// Probe whether each remote has new commits (network round-trip)
        #[arg(long)]
        check_origin: bool,

        /// List untracked files per repository
        #[arg(short, long)]
        untracked: bool,

        /// Show each repository's remote URL
        #[arg(long)]
        remote: bool,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Stage and commit pending changes across the fleet
    Commit {
        /// Commit message applied to every repository
        message: String,

        /// Also commit repositories that are not on a main branch
        #[arg(short = 'a', long)]
        all_branches: bool,

        /// Commit repositories even when they contain new files
        #[arg(long)]
        commit_new_files: bool,

        /// Review repositories with new files one at a time
        #[arg(long)]
        review_new_files: bool,
    },

    /// Push repositories that are ahead of their remote
    Push {
        /// Force-push every committed repository with a remote
        #[arg(short, long)]
        force: bool,

        /// Remote URL prefix that authenticated pushes apply to
        /// (e.g. https://github.com/someuser/)
        #[arg(long, requires = "auth_user", requires = "auth_token")]
        auth_host: Option<String>,

        /// Username for authenticated pushes
        #[arg(long, requires = "auth_host")]
        auth_user: Option<String>,

        /// Token for authenticated pushes; prefer the environment variable
        /// over the flag so the secret stays out of shell history. Ignored
        /// unless --auth-host is given.
        #[arg(long, env = "GITFLEET_AUTH_TOKEN", hide_env_values = true)]
        auth_token: Option<String>,
    },

    /// Pull repositories whose remote has new commits
    Pull,

    /// Delete every repository's history and start over with one commit
    Reset,

    /// List a user's repositories on GitHub
    ListRemote {
        /// Account whose repositories to list
        username: String,

        /// Maximum number of repositories to fetch
        #[arg(long, default_value_t = 1000)]
        per_page: u32,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    /// Parse the process arguments into an application.
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Dispatch the parsed command; prints the error and exits non-zero on
    /// failure.
    pub async fn run(self) -> Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List => {
                let command = commands::list::ListCommand::new(self.resolve_paths()?);
                command.execute()
            }
            Commands::Status {
                check_origin,
                untracked,
                remote,
                output,
            } => {
                let options = crate::application::use_cases::inspect_status::InspectOptions {
                    check_untracked: *untracked,
                    check_origin: *check_origin,
                    remote_url: *remote,
                };
                let command = commands::status::StatusCommand::new(
                    self.resolve_paths()?,
                    options,
                    self.main_branches(),
                    output.clone(),
                );
                command.execute().await
            }
            Commands::Commit {
                message,
                all_branches,
                commit_new_files,
                review_new_files,
            } => {
                let config = crate::application::use_cases::commit_batch::CommitBatchConfig {
                    message: message.clone(),
                    include_other_branches: *all_branches,
                    commit_new_files: *commit_new_files,
                    review_new_files: *review_new_files,
                    main_branches: self.main_branches(),
                };
                let command =
                    commands::commit::CommitCommand::new(self.resolve_paths()?, config);
                command.execute().await
            }
            Commands::Push {
                force,
                auth_host,
                auth_user,
                auth_token,
            } => {
                let credentials = match (auth_host, auth_user, auth_token) {
                    (Some(host), Some(user), Some(token)) => {
                        Some(PushCredentials::new(host, user, token))
                    }
                    _ => None,
                };
                let command =
                    commands::push::PushCommand::new(self.resolve_paths()?, *force, credentials);
                command.execute().await
            }
            Commands::Pull => {
                let command = commands::pull::PullCommand::new(self.resolve_paths()?);
                command.execute().await
            }
            Commands::Reset => {
                let command = commands::reset::ResetCommand::new(self.resolve_paths()?);
                command.execute().await
            }
            Commands::ListRemote { username, per_page } => {
                let command = commands::list_remote::ListRemoteCommand::new(
                    username.clone(),
                    *per_page,
                );
                command.execute().await
            }
        }
    }

    /// Merge the directory flags and list files into the candidate set.
    fn resolve_paths(&self) -> Result<Vec<PathBuf>> {
        let mut roots = self.cli.root.clone();
        if let Some(file) = &self.cli.roots_file {
            roots.extend(read_path_list(file)?);
        }

        let mut singles = self.cli.dir.clone();
        if let Some(file) = &self.cli.dirs_file {
            singles.extend(read_path_list(file)?);
        }

        if roots.is_empty() && singles.is_empty() {
            return Err(anyhow::anyhow!(
                "No directories selected. Use --root/--dir or --roots-file/--dirs-file."
            ));
        }

        let paths = resolve_repository_paths(&roots, &singles)?;
        if self.cli.verbose {
            tracing::info!(count = paths.len(), "resolved candidate directories");
        }
        Ok(paths)
    }

    fn main_branches(&self) -> MainBranchSet {
        MainBranchSet::new(self.cli.main_branch.clone())
    }
}
