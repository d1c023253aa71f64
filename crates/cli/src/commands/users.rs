//! Leaderboard command.

use study_helper_server::models::Account;

use super::{CommandResult, print_json};
use crate::client::ApiClient;

/// Show the top helpers.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn leaderboard(client: &ApiClient) -> CommandResult {
    let leaders: Vec<Account> = client.get("/api/users/top-helpers").await?;
    print_json(&leaders)
}
