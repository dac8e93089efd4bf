//! Core domain model: repository status entities and value objects.

pub mod entities;
pub mod value_objects;
