//! Question repository.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, instrument};

use study_helper_core::{QuestionId, QuestionSort};

use super::{MemoryStore, StoreData, StoreError};
use crate::models::{Question, QuestionDraft, QuestionPatch, QuestionWithAuthor};
use crate::validation::ValidationErrors;

/// Repository for question operations.
pub struct QuestionRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> QuestionRepository<'a> {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a question by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(question_id = %id))]
    pub fn get(&self, id: QuestionId) -> Result<Option<Question>, StoreError> {
        Ok(self.store.read()?.questions.get(&id).cloned())
    }

    /// All questions in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.store.read()?.questions.values().cloned().collect())
    }

    /// Post a new question. It starts unsolved with no likes or views.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the draft is malformed or its
    /// author does not exist.
    #[instrument(skip(self, draft))]
    pub fn create(&self, draft: &QuestionDraft) -> Result<Question, StoreError> {
        let mut errors = ValidationErrors::new();
        let new = draft.validate(&mut errors);

        let mut data = self.store.write()?;
        if let Some(new) = &new
            && !data.accounts.contains(&new.author_id)
        {
            errors.add("authorId", "does not match any account");
        }
        let new = errors.complete(new)?;

        let question = Question {
            id: QuestionId::generate(),
            title: new.title,
            content: new.content,
            subject: new.subject,
            grade_level: new.grade_level,
            difficulty: new.difficulty,
            images: new.images,
            author_id: new.author_id,
            solved: false,
            likes: 0,
            views: 0,
            created_at: Utc::now(),
        };
        data.questions.insert(question.id, question.clone());
        drop(data);

        debug!(question_id = %question.id, author_id = %question.author_id, "question created");
        Ok(question)
    }

    /// Merge `patch` into an existing question.
    ///
    /// Returns `Ok(None)` if no question has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if a present field is invalid or a
    /// new author does not exist. Nothing is changed on error.
    #[instrument(skip(self, patch), fields(question_id = %id))]
    pub fn update(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
    ) -> Result<Option<Question>, StoreError> {
        let mut data = self.store.write()?;
        let Some(current) = data.questions.get(&id) else {
            return Ok(None);
        };

        let mut errors = ValidationErrors::new();
        let updated = patch.apply(current, &mut errors);
        if patch.author_id.is_some() && !data.accounts.contains(&updated.author_id) {
            errors.add("authorId", "does not match any account");
        }
        let updated = errors.finish(updated)?;

        data.questions.insert(id, updated.clone());
        drop(data);

        debug!("question updated");
        Ok(Some(updated))
    }

    /// Every question joined with its author, in creation order.
    ///
    /// Questions whose author no longer resolves are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn with_authors(&self) -> Result<Vec<QuestionWithAuthor>, StoreError> {
        let data = self.store.read()?;
        let counts = comment_counts(&data);
        Ok(data
            .questions
            .values()
            .filter_map(|question| join(&data, &counts, question))
            .collect())
    }

    /// One question joined with its author.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(question_id = %id))]
    pub fn with_author(&self, id: QuestionId) -> Result<Option<QuestionWithAuthor>, StoreError> {
        let data = self.store.read()?;
        let Some(question) = data.questions.get(&id) else {
            return Ok(None);
        };
        let count = data
            .comments
            .values()
            .filter(|comment| comment.question_id == id)
            .count();
        let counts = HashMap::from([(id, count)]);
        Ok(join(&data, &counts, question))
    }

    /// The question feed in the requested order.
    ///
    /// Every ordering is stable, so equal keys keep creation order.
    /// `Unanswered` keeps creation order outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(sort = %sort))]
    pub fn list_sorted(&self, sort: QuestionSort) -> Result<Vec<QuestionWithAuthor>, StoreError> {
        let mut feed = self.with_authors()?;
        match sort {
            QuestionSort::Newest => {
                feed.sort_by(|a, b| b.question.created_at.cmp(&a.question.created_at));
            }
            QuestionSort::Helpful => {
                feed.sort_by(|a, b| b.question.likes.cmp(&a.question.likes));
            }
            QuestionSort::Unanswered => {
                feed.retain(|entry| entry.comment_count == 0);
            }
        }
        Ok(feed)
    }
}

fn comment_counts(data: &StoreData) -> HashMap<QuestionId, usize> {
    let mut counts = HashMap::new();
    for comment in data.comments.values() {
        *counts.entry(comment.question_id).or_insert(0) += 1;
    }
    counts
}

fn join(
    data: &StoreData,
    counts: &HashMap<QuestionId, usize>,
    question: &Question,
) -> Option<QuestionWithAuthor> {
    let author = data.accounts.get(&question.author_id)?;
    Some(QuestionWithAuthor {
        question: question.clone(),
        author: author.clone(),
        comment_count: counts.get(&question.id).copied().unwrap_or(0),
    })
}
