//! Git invocation layer.
//!
//! Every operation shells out to the external `git` executable with an
//! explicit working directory per call; the process-wide current directory is
//! never touched. [`GitClient`] is the seam the use cases depend on;
//! [`GitProcessClient`] is the real implementation.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Name of the default remote every operation targets.
pub const DEFAULT_REMOTE: &str = "origin";

/// Bounded wait for a push that goes through the credential-injecting
/// transport. Ordinary invocations have no timeout.
const AUTH_PUSH_TIMEOUT_SECS: u64 = 30;

/// Errors from spawning or running a git command.
#[derive(Debug, Error)]
pub enum GitCommandError {
    /// The git executable could not be spawned at all.
    #[error("Failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    /// git ran but exited unsuccessfully.
    #[error("Command `{command}` failed with exit code {exit_code:?}: {stderr}")]
    Failed {
        /// The command line, without environment (credentials never appear here).
        command: String,
        /// Exit code, when the process was not killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// An authenticated push exceeded its bounded wait.
    #[error("Command `{command}` timed out after {timeout_secs} seconds")]
    Timeout {
        /// The command line.
        command: String,
        /// The wait that was exceeded.
        timeout_secs: u64,
    },
}

/// Credentials applied to pushes whose remote URL matches a host prefix.
///
/// The secret travels only through the child process environment, read back
/// by an inline credential helper; it never appears in argv, in logs, or in
/// error output.
#[derive(Clone)]
pub struct PushCredentials {
    host_prefix: String,
    username: String,
    secret: String,
}

impl PushCredentials {
    /// Create credentials for remotes whose URL starts with `host_prefix`
    /// (e.g. `https://github.com/someuser/`).
    pub fn new(
        host_prefix: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            host_prefix: host_prefix.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Whether these credentials apply to the given remote URL.
    pub fn matches(&self, remote_url: &str) -> bool {
        remote_url.starts_with(&self.host_prefix)
    }

    /// The username sent to the remote.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for PushCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentials")
            .field("host_prefix", &self.host_prefix)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Git operations the use cases depend on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Raw `git status` output for the repository, unaltered.
    async fn status_text(&self, repo: &Path) -> Result<String, GitCommandError>;

    /// Untracked files, honoring ignore rules.
    async fn untracked_files(&self, repo: &Path) -> Result<Vec<String>, GitCommandError>;

    /// Dry-run fetch; returns stdout and stderr merged. Non-empty output
    /// means the remote has commits the local branch does not.
    async fn fetch_dry_run(&self, repo: &Path) -> Result<String, GitCommandError>;

    /// Configured URL of the default remote, or `None` when no remote is
    /// configured (absence is a normal state, never an error).
    async fn remote_url(&self, repo: &Path) -> Result<Option<String>, GitCommandError>;

    /// Stage every change in the working tree.
    async fn stage_all(&self, repo: &Path) -> Result<(), GitCommandError>;

    /// Commit staged changes with the given message.
    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitCommandError>;

    /// Push the branch to the default remote.
    async fn push(&self, repo: &Path, branch: &str, force: bool) -> Result<(), GitCommandError>;

    /// Push with injected credentials and a bounded wait.
    async fn push_authenticated(
        &self,
        repo: &Path,
        branch: &str,
        force: bool,
        credentials: &PushCredentials,
    ) -> Result<(), GitCommandError>;

    /// Pull the branch from the default remote.
    async fn pull(&self, repo: &Path, branch: &str) -> Result<(), GitCommandError>;

    /// Initialize a fresh repository in an existing directory.
    async fn init_repository(&self, repo: &Path) -> Result<(), GitCommandError>;

    /// Register a remote under the given name.
    async fn add_remote(&self, repo: &Path, name: &str, url: &str)
        -> Result<(), GitCommandError>;
}

/// [`GitClient`] backed by the external `git` executable.
pub struct GitProcessClient {
    git_executable: String,
    auth_push_timeout: Duration,
}

impl Default for GitProcessClient {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            auth_push_timeout: Duration::from_secs(AUTH_PUSH_TIMEOUT_SECS),
        }
    }
}

impl GitProcessClient {
    /// Create a client using `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with a custom executable path.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
            ..Self::default()
        }
    }

    /// Check that the git executable is available.
    pub async fn check_availability(&self) -> Result<(), GitCommandError> {
        let output = Command::new(&self.git_executable)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(GitCommandError::Failed {
                command: format!("{} --version", self.git_executable),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.git_executable, args.join(" "))
    }

    /// Execute a git command in the given directory.
    ///
    /// LC_ALL is pinned to C because the status inspector depends on git's
    /// English phrasings.
    async fn execute(
        &self,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<std::process::Output, GitCommandError> {
        tracing::debug!(command = %self.command_line(args), dir = %working_dir.display(), "running git");

        let output = Command::new(&self.git_executable)
            .args(args)
            .current_dir(working_dir)
            .env("LC_ALL", "C")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }

    /// Execute a git command and require success; returns trimmed stdout.
    async fn execute_checked(
        &self,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<String, GitCommandError> {
        let output = self.execute(args, working_dir).await?;

        if !output.status.success() {
            return Err(GitCommandError::Failed {
                command: self.command_line(args),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitClient for GitProcessClient {
    async fn status_text(&self, repo: &Path) -> Result<String, GitCommandError> {
        let output = self.execute(&["status"], repo).await?;

        if !output.status.success() {
            return Err(GitCommandError::Failed {
                command: self.command_line(&["status"]),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // No trimming: the parser addresses lines by position.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn untracked_files(&self, repo: &Path) -> Result<Vec<String>, GitCommandError> {
        let stdout = self
            .execute_checked(&["ls-files", "--others", "--exclude-standard"], repo)
            .await?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect())
    }

    async fn fetch_dry_run(&self, repo: &Path) -> Result<String, GitCommandError> {
        let output = self.execute(&["fetch", "--dry-run"], repo).await?;

        if !output.status.success() {
            return Err(GitCommandError::Failed {
                command: self.command_line(&["fetch", "--dry-run"]),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // git reports fetch activity on stderr; merge both streams like the
        // caller would see in a terminal.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }

    async fn remote_url(&self, repo: &Path) -> Result<Option<String>, GitCommandError> {
        let key = format!("remote.{DEFAULT_REMOTE}.url");
        let args = ["config", "--get", key.as_str()];
        let output = self.execute(&args, repo).await?;

        // `git config --get` exits non-zero when the key is unset; that is
        // the normal "no remote" state.
        if !output.status.success() {
            return Ok(None);
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if url.is_empty() { None } else { Some(url) })
    }

    async fn stage_all(&self, repo: &Path) -> Result<(), GitCommandError> {
        self.execute_checked(&["add", "."], repo).await?;
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitCommandError> {
        self.execute_checked(&["commit", "-m", message], repo).await?;
        Ok(())
    }

    async fn push(&self, repo: &Path, branch: &str, force: bool) -> Result<(), GitCommandError> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.push(DEFAULT_REMOTE);
        args.push(branch);
        self.execute_checked(&args, repo).await?;
        Ok(())
    }

    async fn push_authenticated(
        &self,
        repo: &Path,
        branch: &str,
        force: bool,
        credentials: &PushCredentials,
    ) -> Result<(), GitCommandError> {
        // Inline helper that reads the credentials back out of the child
        // environment, so the secret never appears on a command line.
        let helper = "!f() { echo \"username=${GITFLEET_CRED_USER}\"; echo \"password=${GITFLEET_CRED_PASS}\"; }; f";
        let helper_arg = format!("credential.helper={helper}");

        let mut args = vec!["-c", "credential.helper=", "-c", &helper_arg, "push"];
        if force {
            args.push("--force");
        }
        args.push(DEFAULT_REMOTE);
        args.push(branch);

        let command = self.command_line(&["push", DEFAULT_REMOTE, branch]);
        tracing::debug!(command = %command, dir = %repo.display(), "running authenticated git push");

        // kill_on_drop: when the timeout drops this future the child must
        // die with it, not keep pushing in the background.
        let future = Command::new(&self.git_executable)
            .args(&args)
            .current_dir(repo)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GITFLEET_CRED_USER", credentials.username())
            .env("GITFLEET_CRED_PASS", credentials.secret())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.auth_push_timeout, future)
            .await
            .map_err(|_| GitCommandError::Timeout {
                command: command.clone(),
                timeout_secs: self.auth_push_timeout.as_secs(),
            })??;

        if !output.status.success() {
            return Err(GitCommandError::Failed {
                command,
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }

    async fn pull(&self, repo: &Path, branch: &str) -> Result<(), GitCommandError> {
        self.execute_checked(&["pull", DEFAULT_REMOTE, branch], repo)
            .await?;
        Ok(())
    }

    async fn init_repository(&self, repo: &Path) -> Result<(), GitCommandError> {
        self.execute_checked(&["init"], repo).await?;
        Ok(())
    }

    async fn add_remote(
        &self,
        repo: &Path,
        name: &str,
        url: &str,
    ) -> Result<(), GitCommandError> {
        self.execute_checked(&["remote", "add", name, url], repo)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_prefix_matching() {
        let creds = PushCredentials::new("https://github.com/someuser/", "someuser", "s3cret");
        assert!(creds.matches("https://github.com/someuser/project.git"));
        assert!(!creds.matches("https://github.com/other/project.git"));
        assert!(!creds.matches("git@github.com:someuser/project.git"));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = PushCredentials::new("https://github.com/u/", "u", "s3cret");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timed_out_authenticated_push_kills_the_child() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in git that outlives the timeout; if it survived the drop it
        // would leave a marker file behind.
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("finished");
        let script = dir.path().join("slow-git");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nsleep 1\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let client = GitProcessClient {
            git_executable: script.display().to_string(),
            auth_push_timeout: Duration::from_millis(100),
        };
        let creds = PushCredentials::new("https://github.com/u/", "u", "s3cret");
        let result = client
            .push_authenticated(dir.path(), "main", false, &creds)
            .await;
        assert!(matches!(result, Err(GitCommandError::Timeout { .. })));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }

    #[test]
    fn test_command_error_display_has_no_environment() {
        let err = GitCommandError::Failed {
            command: "git push origin main".to_string(),
            exit_code: Some(128),
            stderr: "authentication failed".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("git push origin main"));
        assert!(rendered.contains("128"));
    }
}
