//! Domain models for StudyHelper.
//!
//! Each entity comes with three companion types:
//!
//! - a *draft*, the caller-supplied payload for creating it
//! - a *patch*, the optional fields an update may override
//! - for questions and comments, a *with-author* join view
//!
//! All types serialize with camelCase field names.

pub mod account;
pub mod comment;
pub mod question;

pub use account::{Account, AccountDraft, AccountPatch, DEFAULT_RANK};
pub use comment::{Comment, CommentDraft, CommentPatch, CommentWithAuthor};
pub use question::{Question, QuestionDraft, QuestionPatch, QuestionWithAuthor};
