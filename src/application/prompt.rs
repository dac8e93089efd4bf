//! Interactive confirmation seam.
//!
//! Use cases never talk to the terminal directly and never exit the process
//! from inside a loop: a "quit" answer surfaces as
//! [`ReviewDecision::Abort`] and unwinds through normal control flow.

use std::io;
use std::path::Path;

/// Outcome of reviewing one repository with new files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Commit the repository despite its new files.
    Include,
    /// Leave the repository out of this batch.
    Skip,
    /// Abort the entire run before any mutation.
    Abort,
}

/// Interactive gates consumed by the batch use cases.
pub trait Prompt {
    /// Ask a yes/no question; `false` declines.
    fn confirm(&mut self, message: &str) -> io::Result<bool>;

    /// Review one repository whose untracked files would otherwise exclude
    /// it from a commit batch.
    fn review_new_files(&mut self, location: &Path, files: &[String])
        -> io::Result<ReviewDecision>;
}
