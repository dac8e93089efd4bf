//! Configurable set of branch names treated as "main".
//!
//! Historically this tool hardcoded `master`; git's default later became
//! `main`, so the accepted set is explicit configuration with both names as
//! the default.

/// Set of branch names considered the primary/production line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainBranchSet {
    names: Vec<String>,
}

impl MainBranchSet {
    /// Create a set from explicit branch names. An empty list falls back to
    /// the default set.
    pub fn new(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::default()
        } else {
            Self { names }
        }
    }

    /// Whether `branch` counts as a main branch.
    pub fn contains(&self, branch: &str) -> bool {
        self.names.iter().any(|n| n == branch)
    }

    /// The accepted names, in configuration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for MainBranchSet {
    fn default() -> Self {
        Self {
            names: vec!["main".to_string(), "master".to_string()],
        }
    }
}
