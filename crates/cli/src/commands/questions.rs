//! Question commands.
//!
//! # Usage
//!
//! ```bash
//! # Browse the feed
//! sh-cli questions --sort helpful
//!
//! # Ask a question
//! sh-cli ask --title "Projectile range" --content "..." --subject Physics \
//!     --grade "Grade 11" --difficulty medium
//!
//! # Show a question with its comments, then mark it solved
//! sh-cli show 6f1c...
//! sh-cli solve 6f1c...
//! ```

use serde::Serialize;
use tracing::info;

use study_helper_core::{Difficulty, QuestionId, QuestionSort};
use study_helper_server::models::{
    CommentWithAuthor, Question, QuestionDraft, QuestionPatch, QuestionWithAuthor,
};

use super::{CommandResult, print_json};
use crate::client::ApiClient;

/// Fields of a new question.
pub struct Ask {
    pub title: String,
    pub content: String,
    pub subject: String,
    pub grade: String,
    pub difficulty: Difficulty,
    pub images: Vec<String>,
}

/// List the question feed.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &ApiClient, sort: QuestionSort) -> CommandResult {
    let feed: Vec<QuestionWithAuthor> = client.get(&format!("/api/questions?sortBy={sort}")).await?;
    info!(count = feed.len(), sort = %sort, "Fetched questions");
    print_json(&feed)
}

/// Post a question as the current account.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects the payload.
pub async fn ask(client: &ApiClient, ask: Ask) -> CommandResult {
    let draft = QuestionDraft {
        title: Some(ask.title),
        content: Some(ask.content),
        subject: Some(ask.subject),
        grade_level: Some(ask.grade),
        difficulty: Some(ask.difficulty.to_string()),
        images: Some(ask.images),
        author_id: None,
    };
    let question: Question = client.post("/api/questions", &draft).await?;
    info!(question_id = %question.id, "Posted question");
    print_json(&question)
}

/// A question together with its comments.
#[derive(Serialize)]
struct Thread {
    question: QuestionWithAuthor,
    comments: Vec<CommentWithAuthor>,
}

/// Show one question and its comments.
///
/// # Errors
///
/// Returns an error if the request fails or the question does not exist.
pub async fn show(client: &ApiClient, id: QuestionId) -> CommandResult {
    let question = client.get(&format!("/api/questions/{id}")).await?;
    let comments = client.get(&format!("/api/questions/{id}/comments")).await?;
    print_json(&Thread { question, comments })
}

/// Mark a question solved.
///
/// # Errors
///
/// Returns an error if the request fails or the question does not exist.
pub async fn solve(client: &ApiClient, id: QuestionId) -> CommandResult {
    let patch = QuestionPatch {
        solved: Some(true),
        ..QuestionPatch::default()
    };
    let question: Question = client.patch(&format!("/api/questions/{id}"), &patch).await?;
    info!(question_id = %question.id, "Marked solved");
    print_json(&question)
}
