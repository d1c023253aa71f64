//! StudyHelper CLI - command-line client for the JSON API.
//!
//! # Usage
//!
//! ```bash
//! # Register and check the account
//! sh-cli register --uid demo-user-9 --email sam@example.com --name "Sam Lee"
//! sh-cli --identity demo-user-9 me
//!
//! # Browse and answer
//! sh-cli questions --sort unanswered
//! sh-cli --identity demo-user-9 comment <question-id> --content "Try factoring first."
//!
//! # Leaderboard
//! sh-cli leaderboard
//! ```
//!
//! # Environment Variables
//!
//! - `STUDY_HELPER_URL` - Server base URL (default: http://127.0.0.1:5000)
//! - `STUDY_HELPER_IDENTITY` - Identity sent as `x-identity-uid`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use study_helper_core::{CommentId, Difficulty, QuestionId, QuestionSort};

mod client;
mod commands;

use client::{ApiClient, ClientError};

#[derive(Parser)]
#[command(name = "sh-cli")]
#[command(author, version, about = "StudyHelper command-line client")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "STUDY_HELPER_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Identity provider user ID to act as
    #[arg(long, env = "STUDY_HELPER_IDENTITY")]
    identity: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Identity provider user ID
        #[arg(long)]
        uid: String,

        /// Contact email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Show the current account
    Me,
    /// List questions
    Questions {
        /// Feed order (`newest`, `helpful`, `unanswered`)
        #[arg(short, long, default_value = "newest")]
        sort: String,
    },
    /// Ask a question
    Ask {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        /// Subject, e.g. "Mathematics"
        #[arg(short, long)]
        subject: String,

        /// Grade level, e.g. "Grade 11"
        #[arg(short, long)]
        grade: String,

        /// `easy`, `medium` or `hard`
        #[arg(short, long)]
        difficulty: Difficulty,

        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Show a question and its comments
    Show { id: QuestionId },
    /// Comment on a question
    Comment {
        question_id: QuestionId,

        #[arg(short, long)]
        content: String,

        /// Comment being replied to
        #[arg(long)]
        parent: Option<CommentId>,
    },
    /// Mark a question solved
    Solve { id: QuestionId },
    /// Show the top helpers
    Leaderboard,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_helper_cli=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        if let Some(ClientError::Api { fields, .. }) = e.downcast_ref::<ClientError>() {
            for field in fields {
                tracing::error!("  {field}");
            }
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(&cli.base_url, cli.identity);

    match cli.command {
        Commands::Register {
            uid,
            email,
            name,
            avatar,
        } => commands::auth::register(&client, uid, email, name, avatar).await?,
        Commands::Me => commands::auth::me(&client).await?,
        Commands::Questions { sort } => {
            commands::questions::list(&client, QuestionSort::from_query(Some(&sort))).await?;
        }
        Commands::Ask {
            title,
            content,
            subject,
            grade,
            difficulty,
            images,
        } => {
            let ask = commands::questions::Ask {
                title,
                content,
                subject,
                grade,
                difficulty,
                images,
            };
            commands::questions::ask(&client, ask).await?;
        }
        Commands::Show { id } => commands::questions::show(&client, id).await?,
        Commands::Comment {
            question_id,
            content,
            parent,
        } => commands::comments::create(&client, question_id, content, parent).await?,
        Commands::Solve { id } => commands::questions::solve(&client, id).await?,
        Commands::Leaderboard => commands::users::leaderboard(&client).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_ask() {
        let cli = Cli::try_parse_from([
            "sh-cli",
            "--identity",
            "demo-user-1",
            "ask",
            "--title",
            "Limits",
            "--content",
            "What is lim x->0 sin(x)/x?",
            "--subject",
            "Mathematics",
            "--grade",
            "Grade 12",
            "--difficulty",
            "hard",
            "--image",
            "https://example.com/a.png",
        ]);
        let Ok(cli) = cli else {
            panic!("ask should parse");
        };
        assert_eq!(cli.identity.as_deref(), Some("demo-user-1"));
        let Commands::Ask {
            difficulty, images, ..
        } = cli.command
        else {
            panic!("expected ask");
        };
        assert_eq!(difficulty, Difficulty::Hard);
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_question_id() {
        assert!(Cli::try_parse_from(["sh-cli", "show", "not-an-id"]).is_err());
    }
}
