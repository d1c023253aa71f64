//! Comment route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use study_helper_core::{CommentId, QuestionId};

use crate::error::{AppError, INVALID_COMMENT, Result};
use crate::middleware::CurrentAccount;
use crate::models::{Comment, CommentDraft, CommentPatch, CommentWithAuthor};
use crate::routes::{JsonBody, questions::no_users};
use crate::state::AppState;
use crate::validation::ValidationErrors;

/// Comments on a question, oldest first. Unknown questions have none.
///
/// GET /api/questions/{id}/comments
///
/// # Errors
///
/// Returns 500 if the store is unavailable.
pub async fn index(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentWithAuthor>>> {
    let Ok(question_id) = QuestionId::parse_str(&id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store().comments().for_question(question_id)?))
}

/// Comment on a question as the current account.
///
/// POST /api/questions/{id}/comments
///
/// # Errors
///
/// Returns 400 if there is no account to comment as, the question does not
/// exist, or the payload is invalid.
pub async fn create(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
    JsonBody(mut draft): JsonBody<CommentDraft>,
) -> Result<Json<Comment>> {
    let author = account.ok_or_else(no_users)?;
    let Ok(question_id) = QuestionId::parse_str(&id) else {
        let mut errors = ValidationErrors::new();
        errors.add("questionId", "does not match any question");
        return Err(AppError::Validation {
            message: INVALID_COMMENT,
            errors,
        });
    };
    draft.question_id = Some(question_id);
    draft.author_id = Some(author.id);

    let comment = state
        .store()
        .comments()
        .create(&draft)
        .map_err(AppError::invalid(INVALID_COMMENT))?;

    tracing::info!(comment_id = %comment.id, question_id = %question_id, "Comment posted");
    Ok(Json(comment))
}

/// Update a comment.
///
/// PATCH /api/comments/{id}
///
/// # Errors
///
/// Returns 404 if the comment does not exist, 400 if a field is invalid.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<CommentPatch>,
) -> Result<Json<Comment>> {
    let not_found = || AppError::NotFound("Comment not found".to_string());
    let id = CommentId::parse_str(&id).map_err(|_| not_found())?;

    state
        .store()
        .comments()
        .update(id, &patch)
        .map_err(AppError::invalid(INVALID_COMMENT))?
        .map(Json)
        .ok_or_else(not_found)
}
