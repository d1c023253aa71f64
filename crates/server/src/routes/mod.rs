//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                       - Liveness check
//! GET   /health/ready                 - Readiness check (store lock healthy)
//!
//! # Auth
//! POST  /api/auth/register            - Register an account
//! GET   /api/auth/me                  - Current account
//!
//! # Questions
//! GET   /api/questions?sortBy=        - Feed (newest | helpful | unanswered)
//! POST  /api/questions                - Post a question as the current account
//! GET   /api/questions/{id}           - Question detail
//! PATCH /api/questions/{id}           - Update a question
//! GET   /api/questions/{id}/comments  - Comments on a question
//! POST  /api/questions/{id}/comments  - Comment as the current account
//!
//! # Comments
//! PATCH /api/comments/{id}            - Update a comment
//!
//! # Users
//! GET   /api/users/top-helpers        - Leaderboard
//! GET   /api/users/{id}               - Account by ID
//! ```
//!
//! Request bodies are JSON. Every failure is a JSON `{ "message" }` body,
//! see [`crate::error`].

pub mod auth;
pub mod comments;
pub mod health;
pub mod questions;
pub mod users;

use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    routing::{get, patch, post},
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, INVALID_COMMENT, INVALID_QUESTION, INVALID_USER};
use crate::models::{AccountDraft, CommentDraft, CommentPatch, QuestionDraft, QuestionPatch};
use crate::state::AppState;
use crate::validation::ValidationErrors;

/// A JSON request payload and the message its validation failures carry.
pub trait Payload: DeserializeOwned {
    /// Generic message for a rejected payload of this kind.
    const INVALID: &'static str;
}

impl Payload for AccountDraft {
    const INVALID: &'static str = INVALID_USER;
}

impl Payload for QuestionDraft {
    const INVALID: &'static str = INVALID_QUESTION;
}

impl Payload for QuestionPatch {
    const INVALID: &'static str = INVALID_QUESTION;
}

impl Payload for CommentDraft {
    const INVALID: &'static str = INVALID_COMMENT;
}

impl Payload for CommentPatch {
    const INVALID: &'static str = INVALID_COMMENT;
}

/// JSON request body.
///
/// Malformed JSON is an [`AppError::BadRequest`]. Well-formed JSON whose
/// fields have the wrong shape (a negative count, a number where text is
/// expected) is an [`AppError::Validation`] naming the offending path.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: Payload,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state).await?;

        serde_path_to_error::deserialize(value)
            .map(Self)
            .map_err(|err| {
                let path = err.path().to_string();
                let field = if path == "." { "body".to_owned() } else { path };
                let mut errors = ValidationErrors::new();
                errors.add(field, err.inner().to_string());
                AppError::Validation {
                    message: T::INVALID,
                    errors,
                }
            })
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
}

/// Create the question routes router.
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::index).post(questions::create))
        .route("/{id}", get(questions::show).patch(questions::update))
        .route(
            "/{id}/comments",
            get(comments::index).post(comments::create),
        )
}

/// Create the comment routes router.
pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/{id}", patch(comments::update))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/top-helpers", get(users::top_helpers))
        .route("/{id}", get(users::show))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the API server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/questions", question_routes())
        .nest("/api/comments", comment_routes())
        .nest("/api/users", user_routes())
}
