//! Domain entities.

pub mod repo_status;
