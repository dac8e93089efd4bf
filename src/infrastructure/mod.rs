//! External dependencies and I/O: git processes, filesystem, network.

pub mod filesystem;
pub mod git;
pub mod remote;
