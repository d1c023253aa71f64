//! Question domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use study_helper_core::{AccountId, Difficulty, QuestionId};

use super::Account;
use crate::validation::{self, ValidationErrors};

const MAX_TITLE_LENGTH: usize = 200;
const MAX_CONTENT_LENGTH: usize = 10_000;
const MAX_TAG_LENGTH: usize = 50;
const MAX_IMAGE_LENGTH: usize = 2048;

/// A homework-help question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    /// Subject tag, e.g. "Mathematics".
    pub subject: String,
    /// Grade-level tag, e.g. "Grade 11".
    pub grade_level: String,
    pub difficulty: Difficulty,
    /// Attached image references, in upload order.
    pub images: Vec<String>,
    pub author_id: AccountId,
    pub solved: bool,
    pub likes: u32,
    pub views: u32,
    pub created_at: DateTime<Utc>,
}

/// A question joined with its author and the number of comments on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithAuthor {
    #[serde(flatten)]
    pub question: Question,
    pub author: Account,
    pub comment_count: usize,
}

/// Caller-supplied payload for posting a question.
///
/// `authorId` is never read from the request body; the router fills it in
/// from the current account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AccountId>,
}

/// Fields a question update may override. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u32>,
}

/// Validated question fields, before an ID and timestamp are assigned.
#[derive(Debug, Clone)]
pub(crate) struct NewQuestion {
    pub title: String,
    pub content: String,
    pub subject: String,
    pub grade_level: String,
    pub difficulty: Difficulty,
    pub images: Vec<String>,
    pub author_id: AccountId,
}

impl QuestionDraft {
    /// Check the shape of the draft. The author's existence is checked by
    /// the store.
    pub(crate) fn validate(&self, errors: &mut ValidationErrors) -> Option<NewQuestion> {
        let title =
            validation::required_text(errors, "title", self.title.as_deref(), MAX_TITLE_LENGTH);
        let content = validation::required_text(
            errors,
            "content",
            self.content.as_deref(),
            MAX_CONTENT_LENGTH,
        );
        let subject =
            validation::required_text(errors, "subject", self.subject.as_deref(), MAX_TAG_LENGTH);
        let grade_level = validation::required_text(
            errors,
            "gradeLevel",
            self.grade_level.as_deref(),
            MAX_TAG_LENGTH,
        );
        let difficulty = match self.difficulty.as_deref() {
            Some(raw) => parse_difficulty(errors, raw),
            None => {
                errors.add("difficulty", "is required");
                None
            }
        };
        let images = validation::text_list(
            errors,
            "images",
            self.images.as_deref().unwrap_or_default(),
            MAX_IMAGE_LENGTH,
        );
        if self.author_id.is_none() {
            errors.add("authorId", "is required");
        }

        Some(NewQuestion {
            title: title?,
            content: content?,
            subject: subject?,
            grade_level: grade_level?,
            difficulty: difficulty?,
            images: images?,
            author_id: self.author_id?,
        })
    }
}

impl QuestionPatch {
    /// Validate the present fields and merge them into a copy of `question`.
    ///
    /// A changed `authorId` is checked for existence by the store.
    pub(crate) fn apply(&self, question: &Question, errors: &mut ValidationErrors) -> Question {
        let mut updated = question.clone();
        if let Some(title) = self.title.as_deref()
            && let Some(title) = validation::text(errors, "title", title, MAX_TITLE_LENGTH)
        {
            updated.title = title;
        }
        if let Some(content) = self.content.as_deref()
            && let Some(content) = validation::text(errors, "content", content, MAX_CONTENT_LENGTH)
        {
            updated.content = content;
        }
        if let Some(subject) = self.subject.as_deref()
            && let Some(subject) = validation::text(errors, "subject", subject, MAX_TAG_LENGTH)
        {
            updated.subject = subject;
        }
        if let Some(grade) = self.grade_level.as_deref()
            && let Some(grade) = validation::text(errors, "gradeLevel", grade, MAX_TAG_LENGTH)
        {
            updated.grade_level = grade;
        }
        if let Some(difficulty) = self
            .difficulty
            .as_deref()
            .and_then(|raw| parse_difficulty(errors, raw))
        {
            updated.difficulty = difficulty;
        }
        if let Some(images) = self.images.as_deref()
            && let Some(images) = validation::text_list(errors, "images", images, MAX_IMAGE_LENGTH)
        {
            updated.images = images;
        }
        if let Some(author_id) = self.author_id {
            updated.author_id = author_id;
        }
        if let Some(solved) = self.solved {
            updated.solved = solved;
        }
        if let Some(likes) = self.likes {
            updated.likes = likes;
        }
        if let Some(views) = self.views {
            updated.views = views;
        }
        updated
    }
}

fn parse_difficulty(errors: &mut ValidationErrors, raw: &str) -> Option<Difficulty> {
    raw.parse::<Difficulty>()
        .map_err(|e| errors.add("difficulty", e.to_string()))
        .ok()
}
