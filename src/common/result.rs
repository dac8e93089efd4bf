//! Result alias used across the crate.

use crate::common::error::FleetError;

/// Crate-wide result type.
pub type FleetResult<T> = std::result::Result<T, FleetError>;
