//! Use cases and the interactive-prompt seam.

pub mod prompt;
pub mod use_cases;
