//! Caller identity extractor.
//!
//! Identity tokens are verified by a fronting proxy, which forwards the
//! provider's user ID in the `x-identity-uid` header. The extractor maps that
//! ID to an account.
//!
//! Without the header, the request is either rejected with 401 or, when
//! `STUDY_HELPER_ALLOW_DEMO_IDENTITY` is enabled, served as the first
//! registered account so a local client works without an identity provider.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{Span, warn};

use crate::error::{AppError, set_sentry_user};
use crate::models::Account;
use crate::state::AppState;

/// The HTTP header carrying the identity provider's user ID.
pub const IDENTITY_HEADER: &str = "x-identity-uid";

/// Extractor that resolves the calling account.
///
/// Holds `None` when no account matches; handlers decide whether that is a
/// 404 or a 400.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(CurrentAccount(account): CurrentAccount) -> Result<Json<Account>> {
///     account.map(Json).ok_or_else(|| AppError::NotFound("User not found".into()))
/// }
/// ```
pub struct CurrentAccount(pub Option<Account>);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(IDENTITY_HEADER)
            .map(|value| {
                value
                    .to_str()
                    .map(str::trim)
                    .map_err(|_| AppError::BadRequest(format!("Malformed {IDENTITY_HEADER} header")))
            })
            .transpose()?
            .filter(|uid| !uid.is_empty());

        let accounts = state.store().accounts();
        let account = match header {
            Some(uid) => accounts.find_by_external_id(uid)?,
            None if state.config().allow_demo_identity => {
                let account = accounts.first()?;
                if let Some(account) = &account {
                    warn!(account_id = %account.id, "No identity header, acting as demo account");
                }
                account
            }
            None => {
                return Err(AppError::Unauthorized("Identity required".to_string()));
            }
        };

        if let Some(account) = &account {
            Span::current().record("account_id", account.id.to_string());
            set_sentry_user(&account.id, Some(account.email.as_str()));
        }

        Ok(Self(account))
    }
}
