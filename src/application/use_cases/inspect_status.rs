//! Status Inspector: derive a [`RepoStatus`] per repository from `git
//! status` output.
//!
//! The parser is deliberately strict about the branch line. git has used two
//! phrasings for a clean tree over its history and both are recognized; a
//! branch line that does not start with `On branch ` means the output format
//! has changed, and silently misclassifying branches would be worse than
//! stopping, so that case aborts the whole run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::entities::repo_status::{RepoStatus, SyncState};
use crate::infrastructure::git::GitClient;

const BRANCH_PREFIX: &str = "On branch ";

// git said "working directory clean" before 2.9.1 and "working tree clean"
// after; repositories inspected by older installations still produce the
// former.
const CLEAN_TREE: &str = "nothing to commit, working tree clean";
const CLEAN_DIRECTORY: &str = "nothing to commit, working directory clean";

fn up_to_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Both the current "up to date" and the pre-2.15 "up-to-date" spelling.
    RE.get_or_init(|| {
        Regex::new(r"^Your branch is up[ -]to[ -]date with '[^']+'\.$").expect("static regex")
    })
}

fn ahead_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Your branch is ahead of '[^']+' by \d+ commits?\.$").expect("static regex")
    })
}

/// Fatal inspection failure.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The first status line did not carry the expected branch prefix. The
    /// whole run stops: continuing would silently misreport branch names.
    #[error("unrecognized git status output for '{path}': first line was {line:?}")]
    UnexpectedStatusFormat {
        /// Repository whose output failed to parse.
        path: PathBuf,
        /// The offending first line.
        line: String,
    },
}

/// Which optional enrichments to perform. Each one costs extra git
/// invocations per repository, so all default to off.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    /// List untracked files (`git ls-files --others --exclude-standard`).
    pub check_untracked: bool,

    /// Probe whether the remote is ahead of local (`git fetch --dry-run`,
    /// a network round-trip).
    pub check_origin: bool,

    /// Read the configured URL of the default remote.
    pub remote_url: bool,
}

/// Result of inspecting a list of candidate paths.
#[derive(Debug, Default)]
pub struct FleetInspection {
    /// Status per successfully inspected repository, in sorted path order.
    pub statuses: BTreeMap<PathBuf, RepoStatus>,

    /// Paths where inspection failed: the status invocation errored (not a
    /// repository) or a requested enrichment listing could not be read.
    /// Recorded, skipped, never fatal.
    pub not_repositories: Vec<PathBuf>,
}

impl FleetInspection {
    /// Locations of all inspected repositories, sorted.
    pub fn locations(&self) -> Vec<PathBuf> {
        self.statuses.keys().cloned().collect()
    }
}

/// Runs `git status` (plus requested enrichments) across a path list.
pub struct StatusInspector<'a> {
    git: &'a dyn GitClient,
}

impl<'a> StatusInspector<'a> {
    /// Create an inspector over the given git client.
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    /// Inspect every path, one at a time in sorted order.
    pub async fn inspect(
        &self,
        paths: &[PathBuf],
        options: InspectOptions,
    ) -> Result<FleetInspection, InspectError> {
        let mut sorted: Vec<&PathBuf> = paths.iter().collect();
        sorted.sort();

        let mut inspection = FleetInspection::default();

        for path in sorted {
            let text = match self.git.status_text(path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "not a repository");
                    inspection.not_repositories.push(path.clone());
                    continue;
                }
            };

            let mut status = parse_status_text(path, &text)?;

            if options.check_untracked {
                // An unknown untracked listing must not pass for an empty
                // one: the commit batch would stage those files. Treat the
                // repository as uninspectable instead.
                match self.git.untracked_files(path).await {
                    Ok(files) => status.untracked_files = Some(files),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "untracked listing failed");
                        inspection.not_repositories.push(path.clone());
                        continue;
                    }
                }
            }

            if options.check_origin {
                let origin_vs_local = if status.has_origin {
                    match self.git.fetch_dry_run(path).await {
                        Ok(output) if output.is_empty() => SyncState::UpToDate,
                        Ok(_) => SyncState::Ahead,
                        Err(_) => SyncState::Unknown,
                    }
                } else {
                    SyncState::Unknown
                };
                status.origin_vs_local = Some(origin_vs_local);
            }

            if options.remote_url {
                // Absent configuration is a normal state, never an error.
                status.remote_url = self.git.remote_url(path).await.unwrap_or(None);
            }

            inspection.statuses.insert(path.clone(), status);
        }

        Ok(inspection)
    }
}

/// Parse the positional fields out of raw `git status` output.
fn parse_status_text(path: &Path, text: &str) -> Result<RepoStatus, InspectError> {
    let first_line = text.lines().next().unwrap_or("");
    let branch = first_line.strip_prefix(BRANCH_PREFIX).ok_or_else(|| {
        InspectError::UnexpectedStatusFormat {
            path: path.to_path_buf(),
            line: first_line.to_string(),
        }
    })?;

    let mut status = RepoStatus::new(path.to_path_buf(), branch);

    let last_line = text.lines().last().unwrap_or("");
    status.all_committed = last_line == CLEAN_TREE || last_line == CLEAN_DIRECTORY;

    let tracking_line = text.lines().nth(1).unwrap_or("");
    if up_to_date_re().is_match(tracking_line) {
        status.has_origin = true;
        status.local_vs_origin = SyncState::UpToDate;
    } else if ahead_re().is_match(tracking_line) {
        status.has_origin = true;
        status.local_vs_origin = SyncState::Ahead;
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::{GitCommandError, MockGitClient};
    use pretty_assertions::assert_eq;

    const CLEAN_STATUS: &str = "On branch main\n\
        Your branch is up to date with 'origin/main'.\n\
        \n\
        nothing to commit, working tree clean\n";

    const AHEAD_STATUS: &str = "On branch master\n\
        Your branch is ahead of 'origin/master' by 2 commits.\n\
        \x20\x20(use \"git push\" to publish your local commits)\n\
        \n\
        nothing to commit, working tree clean\n";

    const DIRTY_STATUS: &str = "On branch feature/x\n\
        Changes not staged for commit:\n\
        \x20\x20(use \"git add <file>...\" to update what will be committed)\n\
        \n\
        \tmodified:   src/lib.rs\n\
        \n\
        no changes added to commit (use \"git add\" and/or \"git commit -a\")\n";

    fn mock_with_status(path: &Path, text: &'static str) -> MockGitClient {
        let expected = path.to_path_buf();
        let mut git = MockGitClient::new();
        git.expect_status_text()
            .withf(move |p| p == expected)
            .returning(move |_| Ok(text.to_string()));
        git
    }

    #[tokio::test]
    async fn test_clean_up_to_date_repository() {
        let path = PathBuf::from("/repos/a");
        let git = mock_with_status(&path, CLEAN_STATUS);

        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], InspectOptions::default())
            .await
            .unwrap();

        let status = &inspection.statuses[&path];
        assert_eq!(status.branch, "main");
        assert!(status.all_committed);
        assert!(status.has_origin);
        assert_eq!(status.local_vs_origin, SyncState::UpToDate);
        assert!(status.origin_vs_local.is_none());
        assert!(status.untracked_files.is_none());
        assert!(status.remote_url.is_none());
    }

    #[tokio::test]
    async fn test_historical_up_to_date_spelling() {
        let path = PathBuf::from("/repos/a");
        let git = mock_with_status(
            &path,
            "On branch master\n\
             Your branch is up-to-date with 'origin/master'.\n\
             \n\
             nothing to commit, working directory clean\n",
        );

        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], InspectOptions::default())
            .await
            .unwrap();

        let status = &inspection.statuses[&path];
        assert!(status.all_committed);
        assert_eq!(status.local_vs_origin, SyncState::UpToDate);
    }

    #[tokio::test]
    async fn test_ahead_of_tracking_branch() {
        let path = PathBuf::from("/repos/a");
        let git = mock_with_status(&path, AHEAD_STATUS);

        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], InspectOptions::default())
            .await
            .unwrap();

        let status = &inspection.statuses[&path];
        assert_eq!(status.branch, "master");
        assert!(status.has_origin);
        assert_eq!(status.local_vs_origin, SyncState::Ahead);
    }

    #[tokio::test]
    async fn test_dirty_repository_without_tracking() {
        let path = PathBuf::from("/repos/a");
        let git = mock_with_status(&path, DIRTY_STATUS);

        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], InspectOptions::default())
            .await
            .unwrap();

        let status = &inspection.statuses[&path];
        assert_eq!(status.branch, "feature/x");
        assert!(!status.all_committed);
        assert!(!status.has_origin);
        assert_eq!(status.local_vs_origin, SyncState::Unknown);
    }

    #[tokio::test]
    async fn test_unexpected_first_line_is_fatal() {
        let path = PathBuf::from("/repos/a");
        let git = mock_with_status(&path, "HEAD detached at 1a2b3c4\n\nnothing to commit, working tree clean\n");

        let result = StatusInspector::new(&git)
            .inspect(&[path], InspectOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(InspectError::UnexpectedStatusFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_status_goes_to_not_repositories() {
        let good = PathBuf::from("/repos/good");
        let bad = PathBuf::from("/repos/bad");

        let mut git = MockGitClient::new();
        let good_clone = good.clone();
        git.expect_status_text().returning(move |p| {
            if p == good_clone {
                Ok(CLEAN_STATUS.to_string())
            } else {
                Err(GitCommandError::Failed {
                    command: "git status".to_string(),
                    exit_code: Some(128),
                    stderr: "fatal: not a git repository".to_string(),
                })
            }
        });

        let inspection = StatusInspector::new(&git)
            .inspect(&[bad.clone(), good.clone()], InspectOptions::default())
            .await
            .unwrap();

        assert_eq!(inspection.not_repositories, vec![bad]);
        assert!(inspection.statuses.contains_key(&good));
    }

    #[tokio::test]
    async fn test_untracked_enrichment_only_when_requested() {
        let path = PathBuf::from("/repos/a");
        let mut git = mock_with_status(&path, CLEAN_STATUS);
        git.expect_untracked_files()
            .returning(|_| Ok(vec!["notes.txt".to_string()]));

        let options = InspectOptions {
            check_untracked: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(
            inspection.statuses[&path].untracked_files,
            Some(vec!["notes.txt".to_string()])
        );
    }

    #[tokio::test]
    async fn test_failed_untracked_listing_excludes_the_repository() {
        // A broken listing must not read as "no new files"; the repository
        // is set aside rather than silently cleared for committing.
        let path = PathBuf::from("/repos/a");
        let mut git = mock_with_status(&path, DIRTY_STATUS);
        git.expect_untracked_files().returning(|_| {
            Err(GitCommandError::Failed {
                command: "git ls-files --others --exclude-standard".to_string(),
                exit_code: Some(128),
                stderr: "fatal: index file corrupt".to_string(),
            })
        });

        let options = InspectOptions {
            check_untracked: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(inspection.not_repositories, vec![path.clone()]);
        assert!(!inspection.statuses.contains_key(&path));
    }

    #[tokio::test]
    async fn test_origin_check_uses_dry_run_fetch() {
        let path = PathBuf::from("/repos/a");
        let mut git = mock_with_status(&path, CLEAN_STATUS);
        git.expect_fetch_dry_run()
            .returning(|_| Ok("From github.com:u/a\n   1a2b3c4..5d6e7f8  main -> origin/main\n".to_string()));

        let options = InspectOptions {
            check_origin: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(
            inspection.statuses[&path].origin_vs_local,
            Some(SyncState::Ahead)
        );
    }

    #[tokio::test]
    async fn test_origin_check_empty_fetch_means_up_to_date() {
        let path = PathBuf::from("/repos/a");
        let mut git = mock_with_status(&path, CLEAN_STATUS);
        git.expect_fetch_dry_run().returning(|_| Ok(String::new()));

        let options = InspectOptions {
            check_origin: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(
            inspection.statuses[&path].origin_vs_local,
            Some(SyncState::UpToDate)
        );
    }

    #[tokio::test]
    async fn test_origin_check_without_tracking_branch() {
        let path = PathBuf::from("/repos/a");
        // No fetch expectation: a repository without a tracking branch must
        // not be probed.
        let mut git = mock_with_status(&path, DIRTY_STATUS);
        git.expect_fetch_dry_run().never();

        let options = InspectOptions {
            check_origin: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(
            inspection.statuses[&path].origin_vs_local,
            Some(SyncState::Unknown)
        );
    }

    #[tokio::test]
    async fn test_missing_remote_config_is_not_an_error() {
        let path = PathBuf::from("/repos/a");
        let mut git = mock_with_status(&path, CLEAN_STATUS);
        git.expect_remote_url().returning(|_| Ok(None));

        let options = InspectOptions {
            remote_url: true,
            ..Default::default()
        };
        let inspection = StatusInspector::new(&git)
            .inspect(&[path.clone()], options)
            .await
            .unwrap();

        assert_eq!(inspection.statuses[&path].remote_url, None);
    }

    #[test]
    fn test_parse_branch_names_with_slashes() {
        let status = parse_status_text(
            Path::new("/repos/a"),
            "On branch feature/x\n\nnothing to commit, working tree clean\n",
        )
        .unwrap();
        assert_eq!(status.branch, "feature/x");
    }

    #[test]
    fn test_clean_phrasing_must_be_exact() {
        let status = parse_status_text(
            Path::new("/repos/a"),
            "On branch main\n\nnothing to commit (working tree clean)\n",
        )
        .unwrap();
        assert!(!status.all_committed);
    }

    #[test]
    fn test_ahead_regex_single_commit() {
        assert!(ahead_re().is_match("Your branch is ahead of 'origin/main' by 1 commit."));
        assert!(ahead_re().is_match("Your branch is ahead of 'origin/main' by 12 commits."));
        assert!(!ahead_re().is_match("Your branch is behind 'origin/main' by 1 commit."));
    }
}
