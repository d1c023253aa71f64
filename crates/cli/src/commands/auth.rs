//! Account registration and identity commands.
//!
//! # Usage
//!
//! ```bash
//! # Register an account
//! sh-cli register --uid firebase-uid-123 --email sam@example.com --name "Sam Lee"
//!
//! # Show the account the server resolves for this identity
//! sh-cli --identity firebase-uid-123 me
//! ```

use tracing::info;

use study_helper_server::models::{Account, AccountDraft};

use super::{CommandResult, print_json};
use crate::client::ApiClient;

/// Register a new account.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects the payload.
pub async fn register(
    client: &ApiClient,
    uid: String,
    email: String,
    name: String,
    avatar: Option<String>,
) -> CommandResult {
    let draft = AccountDraft {
        identity_uid: Some(uid),
        email: Some(email),
        name: Some(name),
        avatar,
        ..AccountDraft::default()
    };
    let account: Account = client.post("/api/auth/register", &draft).await?;
    info!(account_id = %account.id, "Registered account");
    print_json(&account)
}

/// Show the current account.
///
/// # Errors
///
/// Returns an error if the request fails or no account matches.
pub async fn me(client: &ApiClient) -> CommandResult {
    let account: Account = client.get("/api/auth/me").await?;
    print_json(&account)
}
