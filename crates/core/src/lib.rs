//! StudyHelper Core - Shared domain types.
//!
//! This crate provides the types shared by every StudyHelper component:
//! - `server` - JSON API and in-memory data store
//! - `cli` - Command-line client for the API
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP clients.
//! This keeps it lightweight and lets the CLI share wire types with the server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for entity IDs, emails, difficulty tags and
//!   question orderings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
