//! # gitfleet - Git Fleet Manager
//!
//! `gitfleet` is a command-line tool for keeping a personal fleet of local git
//! repositories in sync. It resolves a set of directories into candidate
//! repositories, inspects each one's `git status`, classifies how it diverges
//! from its remote, and can batch-commit, push, or pull across the whole
//! fleet behind interactive confirmation gates.
//!
//! ## Quick Start
//!
//! ```bash
//! # Report the state of every repository under ~/projects
//! gitfleet --root ~/projects status --check-origin
//!
//! # Commit every dirty repository on a main branch with one message
//! gitfleet --root ~/projects commit "update notes"
//!
//! # Push everything that is ahead of its remote
//! gitfleet --root ~/projects push
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Repository status entities and value objects
//! - [`application`]: Use cases (inspect, report, commit, push, pull, reset)
//! - [`infrastructure`]: Git process invocation, filesystem and network I/O
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: Shared error handling
//!
//! All git interaction shells out to the external `git` executable with an
//! explicit working directory per invocation; gitfleet implements no git
//! protocol or object model of its own.
//!
//! ## Error Handling
//!
//! Per-repository failures (a directory that is not a repository, a push
//! that is rejected) are collected and reported at the end of each phase and
//! never abort a batch. The single fatal condition is
//! [`application::use_cases::inspect_status::InspectError::UnexpectedStatusFormat`]:
//! if `git status` output no longer matches the known phrasings, continuing
//! would silently misreport branch names, so the whole run stops.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::FleetError;
pub use crate::common::result::FleetResult as Result;
