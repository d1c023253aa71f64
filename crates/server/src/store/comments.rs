//! Comment repository.

use chrono::Utc;
use tracing::{debug, instrument};

use study_helper_core::{CommentId, QuestionId};

use super::{MemoryStore, StoreData, StoreError};
use crate::models::{Comment, CommentDraft, CommentPatch, CommentWithAuthor};
use crate::models::comment::NewComment;
use crate::validation::ValidationErrors;

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a comment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(comment_id = %id))]
    pub fn get(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self.store.read()?.comments.get(&id).cloned())
    }

    /// All comments in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(self.store.read()?.comments.values().cloned().collect())
    }

    /// Add a comment to a question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the draft is malformed, its
    /// question or author does not exist, or `parentId` does not name a
    /// comment on the same question.
    #[instrument(skip(self, draft))]
    pub fn create(&self, draft: &CommentDraft) -> Result<Comment, StoreError> {
        let mut errors = ValidationErrors::new();
        let new = draft.validate(&mut errors);

        let mut data = self.store.write()?;
        if let Some(new) = &new {
            check_references(&data, new, &mut errors);
        }
        let new = errors.complete(new)?;

        let comment = Comment {
            id: CommentId::generate(),
            content: new.content,
            question_id: new.question_id,
            author_id: new.author_id,
            parent_id: new.parent_id,
            helpful: false,
            likes: 0,
            created_at: Utc::now(),
        };
        data.comments.insert(comment.id, comment.clone());
        drop(data);

        debug!(
            comment_id = %comment.id,
            question_id = %comment.question_id,
            "comment created"
        );
        Ok(comment)
    }

    /// Merge `patch` into an existing comment.
    ///
    /// Returns `Ok(None)` if no comment has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if a present field is invalid or a
    /// new author does not exist. Nothing is changed on error.
    #[instrument(skip(self, patch), fields(comment_id = %id))]
    pub fn update(
        &self,
        id: CommentId,
        patch: &CommentPatch,
    ) -> Result<Option<Comment>, StoreError> {
        let mut data = self.store.write()?;
        let Some(current) = data.comments.get(&id) else {
            return Ok(None);
        };

        let mut errors = ValidationErrors::new();
        let updated = patch.apply(current, &mut errors);
        if patch.author_id.is_some() && !data.accounts.contains(&updated.author_id) {
            errors.add("authorId", "does not match any account");
        }
        let updated = errors.finish(updated)?;

        data.comments.insert(id, updated.clone());
        drop(data);

        debug!("comment updated");
        Ok(Some(updated))
    }

    /// Comments on one question in creation order, each with its author.
    ///
    /// Replies are not nested; `parentId` is returned as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(question_id = %question_id))]
    pub fn for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let data = self.store.read()?;
        Ok(data
            .comments
            .values()
            .filter(|comment| comment.question_id == question_id)
            .filter_map(|comment| {
                let author = data.accounts.get(&comment.author_id)?;
                Some(CommentWithAuthor {
                    comment: comment.clone(),
                    author: author.clone(),
                })
            })
            .collect())
    }
}

fn check_references(data: &StoreData, new: &NewComment, errors: &mut ValidationErrors) {
    if !data.questions.contains(&new.question_id) {
        errors.add("questionId", "does not match any question");
    }
    if !data.accounts.contains(&new.author_id) {
        errors.add("authorId", "does not match any account");
    }
    if let Some(parent_id) = new.parent_id {
        match data.comments.get(&parent_id) {
            None => errors.add("parentId", "does not match any comment"),
            Some(parent) if parent.question_id != new.question_id => {
                errors.add("parentId", "belongs to a different question");
            }
            Some(_) => {}
        }
    }
}
