//! Domain value objects.

pub mod branch_set;
