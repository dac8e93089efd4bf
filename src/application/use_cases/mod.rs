//! Application use cases.

pub mod commit_batch;
pub mod inspect_status;
pub mod pull_batch;
pub mod push_batch;
pub mod report_status;
pub mod reset_history;
