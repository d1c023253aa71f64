//! In-memory data store.
//!
//! # Layout
//!
//! All entity state lives in one [`StoreData`] value behind a single
//! `RwLock`. Each entity kind has its own insertion-ordered [`Table`]:
//!
//! - `accounts` - registered students
//! - `questions` - homework-help posts
//! - `comments` - replies to questions
//!
//! Every repository operation takes the lock exactly once, so a single create
//! or update is atomic with respect to other operations, and a failed write
//! leaves the store untouched. Nothing spans operations: concurrent updates of
//! the same record are last-write-wins.
//!
//! # Access
//!
//! [`MemoryStore`] is cheap to clone and is created once at startup, then
//! handed to handlers through the application state. Reads and writes go
//! through the per-entity repositories:
//!
//! ```rust,ignore
//! let store = MemoryStore::new();
//! let account = store.accounts().create(draft)?;
//! let feed = store.questions().list_sorted(QuestionSort::Newest)?;
//! ```
//!
//! State is lost when the process exits.

pub mod accounts;
pub mod comments;
pub mod questions;
pub mod seed;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use study_helper_core::{AccountId, CommentId, QuestionId};

use crate::models::{Account, Comment, Question};
use crate::validation::ValidationErrors;

pub use accounts::AccountRepository;
pub use comments::CommentRepository;
pub use questions::QuestionRepository;

/// Default number of accounts returned by the leaderboard.
pub const TOP_HELPERS_LIMIT: usize = 10;

/// Errors that can occur during store operations.
///
/// Lookups that find nothing return `Ok(None)`, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The payload is malformed or references a missing entity.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A writer panicked while holding the lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Handle to the process-wide in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account operations.
    #[must_use]
    pub const fn accounts(&self) -> AccountRepository<'_> {
        AccountRepository::new(self)
    }

    /// Question operations.
    #[must_use]
    pub const fn questions(&self) -> QuestionRepository<'_> {
        QuestionRepository::new(self)
    }

    /// Comment operations.
    #[must_use]
    pub const fn comments(&self) -> CommentRepository<'_> {
        CommentRepository::new(self)
    }

    /// Returns `false` once a writer has panicked while holding the lock.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        !self.inner.is_poisoned()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

/// All entity state.
#[derive(Default)]
pub(crate) struct StoreData {
    pub accounts: Table<AccountId, Account>,
    pub questions: Table<QuestionId, Question>,
    pub comments: Table<CommentId, Comment>,
}

/// A keyed collection that remembers insertion order.
pub(crate) struct Table<K, V> {
    rows: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, V> Table<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Insert or replace a row. New keys go to the end of the order.
    pub fn insert(&mut self, key: K, value: V) {
        if self.rows.insert(key, value).is_none() {
            self.order.push(key);
        }
    }

    /// Rows in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|key| self.rows.get(key))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table: Table<u32, &str> = Table::default();
        table.insert(3, "c");
        table.insert(1, "a");
        table.insert(2, "b");
        table.insert(1, "A");

        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec!["c", "A", "b"]);
        assert_eq!(table.len(), 3);
        assert!(table.contains(&2));
        assert!(!table.contains(&4));
    }

    #[test]
    fn test_new_store_is_healthy_and_empty() {
        let store = MemoryStore::new();
        assert!(store.is_healthy());
        assert_eq!(store.read().map(|data| data.accounts.len()).ok(), Some(0));
    }
}
