//! User (account) route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use study_helper_core::AccountId;

use crate::error::{AppError, Result};
use crate::models::Account;
use crate::state::AppState;
use crate::store::TOP_HELPERS_LIMIT;

/// The leaderboard: accounts by points, highest first.
///
/// GET /api/users/top-helpers
///
/// # Errors
///
/// Returns 500 if the store is unavailable.
pub async fn top_helpers(State(state): State<AppState>) -> Result<Json<Vec<Account>>> {
    Ok(Json(
        state.store().accounts().top_helpers(TOP_HELPERS_LIMIT)?,
    ))
}

/// An account by ID.
///
/// GET /api/users/{id}
///
/// # Errors
///
/// Returns 404 if the ID is malformed or unknown.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>> {
    let not_found = || AppError::NotFound("User not found".to_string());
    let id = AccountId::parse_str(&id).map_err(|_| not_found())?;
    state
        .store()
        .accounts()
        .get(id)?
        .map(Json)
        .ok_or_else(not_found)
}
