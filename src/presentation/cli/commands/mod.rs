//! Subcommand handlers.

pub mod commit;
pub mod list;
pub mod list_remote;
pub mod pull;
pub mod push;
pub mod reset;
pub mod status;
