//! Comment commands.

use tracing::info;

use study_helper_core::{CommentId, QuestionId};
use study_helper_server::models::{Comment, CommentDraft};

use super::{CommandResult, print_json};
use crate::client::ApiClient;

/// Comment on a question as the current account, optionally as a reply.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects the payload.
pub async fn create(
    client: &ApiClient,
    question_id: QuestionId,
    content: String,
    parent: Option<CommentId>,
) -> CommandResult {
    let draft = CommentDraft {
        content: Some(content),
        parent_id: parent.map(|id| id.to_string()),
        ..CommentDraft::default()
    };
    let comment: Comment = client
        .post(&format!("/api/questions/{question_id}/comments"), &draft)
        .await?;
    info!(comment_id = %comment.id, "Posted comment");
    print_json(&comment)
}
