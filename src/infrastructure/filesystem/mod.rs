//! Filesystem operations: directory-list resolution and permission handling.

pub mod dir_resolver;
pub mod permissions;
