//! Question route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use study_helper_core::{QuestionId, QuestionSort};

use crate::error::{AppError, INVALID_QUESTION, Result};
use crate::middleware::CurrentAccount;
use crate::models::{Question, QuestionDraft, QuestionPatch, QuestionWithAuthor};
use crate::routes::JsonBody;
use crate::state::AppState;

/// Feed query parameter naming the sort order.
const SORT_PARAM: &str = "sortBy";

/// The question feed.
///
/// GET /api/questions?sortBy=
///
/// # Errors
///
/// Returns 500 if the store is unavailable.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<QuestionWithAuthor>>> {
    // The first `sortBy` wins; anything unrecognized means newest.
    let sort_by = params
        .iter()
        .find(|(key, _)| key == SORT_PARAM)
        .map(|(_, value)| value.as_str());
    let sort = QuestionSort::from_query(sort_by);
    Ok(Json(state.store().questions().list_sorted(sort)?))
}

/// Post a question as the current account.
///
/// POST /api/questions
///
/// # Errors
///
/// Returns 400 if there is no account to post as or the payload is invalid.
pub async fn create(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    JsonBody(mut draft): JsonBody<QuestionDraft>,
) -> Result<Json<Question>> {
    let author = account.ok_or_else(no_users)?;
    draft.author_id = Some(author.id);

    let question = state
        .store()
        .questions()
        .create(&draft)
        .map_err(AppError::invalid(INVALID_QUESTION))?;

    tracing::info!(question_id = %question.id, "Question posted");
    Ok(Json(question))
}

/// A question with its author and comment count.
///
/// GET /api/questions/{id}
///
/// # Errors
///
/// Returns 404 if the ID is malformed or unknown.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuestionWithAuthor>> {
    let id = parse_id(&id)?;
    state
        .store()
        .questions()
        .with_author(id)?
        .map(Json)
        .ok_or_else(not_found)
}

/// Update a question.
///
/// PATCH /api/questions/{id}
///
/// # Errors
///
/// Returns 404 if the question does not exist, 400 if a field is invalid.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<QuestionPatch>,
) -> Result<Json<Question>> {
    let id = parse_id(&id)?;
    state
        .store()
        .questions()
        .update(id, &patch)
        .map_err(AppError::invalid(INVALID_QUESTION))?
        .map(Json)
        .ok_or_else(not_found)
}

fn parse_id(raw: &str) -> Result<QuestionId> {
    QuestionId::parse_str(raw).map_err(|_| not_found())
}

fn not_found() -> AppError {
    AppError::NotFound("Question not found".to_string())
}

/// Rejection for writes made when no account exists to act as.
pub(crate) fn no_users() -> AppError {
    AppError::BadRequest("No users found".to_string())
}
