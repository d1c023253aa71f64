//! Core types for StudyHelper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod difficulty;
pub mod email;
pub mod id;
pub mod sort;

pub use difficulty::{Difficulty, DifficultyError};
pub use email::{Email, EmailError};
pub use id::*;
pub use sort::QuestionSort;
