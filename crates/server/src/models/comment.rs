//! Comment domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use study_helper_core::{AccountId, CommentId, QuestionId};

use super::Account;
use crate::validation::{self, ValidationErrors};

const MAX_CONTENT_LENGTH: usize = 10_000;

/// A reply to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub question_id: QuestionId,
    pub author_id: AccountId,
    /// Comment this one replies to. Stored only; listings stay flat.
    pub parent_id: Option<CommentId>,
    /// Marked helpful by the asker.
    pub helpful: bool,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Account,
}

/// Caller-supplied payload for commenting on a question.
///
/// `questionId` and `authorId` come from the route and the current account,
/// never from the body. `parentId` is accepted as a string so that an empty
/// value means "no parent" and a malformed one is a field error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AccountId>,
}

/// Fields a comment update may override. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
}

/// Validated comment fields, before an ID and timestamp are assigned.
#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub content: String,
    pub question_id: QuestionId,
    pub author_id: AccountId,
    pub parent_id: Option<CommentId>,
}

impl CommentDraft {
    /// Check the shape of the draft. References are checked by the store.
    pub(crate) fn validate(&self, errors: &mut ValidationErrors) -> Option<NewComment> {
        let content = validation::required_text(
            errors,
            "content",
            self.content.as_deref(),
            MAX_CONTENT_LENGTH,
        );
        let parent_id = match self.parent_id.as_deref().map(str::trim) {
            None | Some("") => Some(None),
            Some(raw) => match CommentId::parse_str(raw) {
                Ok(id) => Some(Some(id)),
                Err(_) => {
                    errors.add("parentId", "must be a comment ID");
                    None
                }
            },
        };
        if self.question_id.is_none() {
            errors.add("questionId", "is required");
        }
        if self.author_id.is_none() {
            errors.add("authorId", "is required");
        }

        Some(NewComment {
            content: content?,
            question_id: self.question_id?,
            author_id: self.author_id?,
            parent_id: parent_id?,
        })
    }
}

impl CommentPatch {
    /// Validate the present fields and merge them into a copy of `comment`.
    pub(crate) fn apply(&self, comment: &Comment, errors: &mut ValidationErrors) -> Comment {
        let mut updated = comment.clone();
        if let Some(content) = self.content.as_deref()
            && let Some(content) = validation::text(errors, "content", content, MAX_CONTENT_LENGTH)
        {
            updated.content = content;
        }
        if let Some(author_id) = self.author_id {
            updated.author_id = author_id;
        }
        if let Some(helpful) = self.helpful {
            updated.helpful = helpful;
        }
        if let Some(likes) = self.likes {
            updated.likes = likes;
        }
        updated
    }
}
