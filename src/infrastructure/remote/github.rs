//! Read-only listing of a user's hosted repositories.

use serde::Deserialize;

use crate::common::error::FleetError;
use crate::common::result::FleetResult;

const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct RepoEntry {
    full_name: String,
}

/// Client for the hosting service's repository listing endpoint.
pub struct GithubRepoLister {
    client: reqwest::Client,
    api_base: String,
}

impl Default for GithubRepoLister {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubRepoLister {
    /// Create a lister against the public GitHub API.
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a lister against a custom API base URL.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// List the names of `username`'s repositories, without the
    /// `username/` prefix. Read-only; paginated only through `per_page`.
    pub async fn list_repository_names(
        &self,
        username: &str,
        per_page: u32,
    ) -> FleetResult<Vec<String>> {
        let url = format!(
            "{}/users/{}/repos?per_page={}",
            self.api_base, username, per_page
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "gitfleet")
            .send()
            .await
            .map_err(|e| {
                FleetError::network_error_with_source(
                    "Failed to query repository listing",
                    Some(url.clone()),
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(FleetError::network_error(
                format!("Repository listing returned HTTP {}", response.status()),
                Some(url),
            ));
        }

        let entries: Vec<RepoEntry> = response.json().await.map_err(|e| {
            FleetError::network_error_with_source(
                "Failed to parse repository listing",
                Some(url),
                e,
            )
        })?;

        Ok(extract_repo_names(&entries, username))
    }
}

/// Strip the `username/` owner prefix from each full name. Entries owned by
/// someone else (e.g. forks listed under an organization) are kept whole.
fn extract_repo_names(entries: &[RepoEntry], username: &str) -> Vec<String> {
    let prefix = format!("{username}/");
    entries
        .iter()
        .map(|e| {
            e.full_name
                .strip_prefix(&prefix)
                .unwrap_or(&e.full_name)
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_repo_names_strips_owner_prefix() {
        let entries = vec![
            RepoEntry {
                full_name: "someuser/dotfiles".to_string(),
            },
            RepoEntry {
                full_name: "someuser/notes".to_string(),
            },
            RepoEntry {
                full_name: "other/shared".to_string(),
            },
        ];
        let names = extract_repo_names(&entries, "someuser");
        assert_eq!(names, vec!["dotfiles", "notes", "other/shared"]);
    }

    #[test]
    fn test_listing_payload_shape() {
        let payload = r#"[{"full_name":"someuser/dotfiles","fork":false}]"#;
        let entries: Vec<RepoEntry> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].full_name, "someuser/dotfiles");
    }
}
