//! Shared error handling and result types.

pub mod error;
pub mod result;
