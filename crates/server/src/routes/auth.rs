//! Account registration and current-account routes.

use axum::{Json, extract::State};

use crate::error::{AppError, INVALID_USER, Result};
use crate::middleware::CurrentAccount;
use crate::models::{Account, AccountDraft};
use crate::routes::JsonBody;
use crate::state::AppState;

/// Register an account.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 with the offending fields if the payload is invalid or the
/// `firebaseUid` or email is already registered.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<AccountDraft>,
) -> Result<Json<Account>> {
    let account = state
        .store()
        .accounts()
        .create(&draft)
        .map_err(AppError::invalid(INVALID_USER))?;

    tracing::info!(account_id = %account.id, "Account registered");
    Ok(Json(account))
}

/// The calling account.
///
/// GET /api/auth/me
///
/// # Errors
///
/// Returns 404 if no account matches the caller, 401 if the caller sent no
/// identity and the demo fallback is disabled.
pub async fn me(CurrentAccount(account): CurrentAccount) -> Result<Json<Account>> {
    account
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
