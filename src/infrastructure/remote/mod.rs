//! Network access to remote hosting services.

pub mod github;
