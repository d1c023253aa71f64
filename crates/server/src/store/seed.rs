//! Demo data for local development.
//!
//! Loaded at startup when `STUDY_HELPER_SEED_DEMO` is enabled so the feed and
//! leaderboard have something to show.

use chrono::{Duration, Utc};
use tracing::info;

use study_helper_core::QuestionId;

use super::{MemoryStore, StoreError};
use crate::models::{AccountDraft, QuestionDraft};

struct DemoAccount {
    uid: &'static str,
    email: &'static str,
    name: &'static str,
    avatar: &'static str,
    points: u32,
    rank: &'static str,
    answered: u32,
}

struct DemoQuestion {
    title: &'static str,
    content: &'static str,
    subject: &'static str,
    grade: &'static str,
    difficulty: &'static str,
    image: Option<&'static str>,
    /// Index into [`ACCOUNTS`].
    author: usize,
    solved: bool,
    likes: u32,
    views: u32,
    hours_ago: i64,
}

const ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        uid: "demo-user-1",
        email: "alex.chen@example.com",
        name: "Alex Chen",
        avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=40&h=40&fit=crop&crop=face",
        points: 1247,
        rank: "Gold Helper",
        answered: 73,
    },
    DemoAccount {
        uid: "demo-user-2",
        email: "sarah.johnson@example.com",
        name: "Sarah Johnson",
        avatar: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=40&h=40&fit=crop&crop=face",
        points: 892,
        rank: "Silver Helper",
        answered: 45,
    },
    DemoAccount {
        uid: "demo-user-3",
        email: "david.kim@example.com",
        name: "David Kim",
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=40&h=40&fit=crop&crop=face",
        points: 1847,
        rank: "Diamond Helper",
        answered: 128,
    },
];

const QUESTIONS: [DemoQuestion; 3] = [
    DemoQuestion {
        title: "Need help with quadratic equations - finding roots",
        content: "I'm struggling with solving quadratic equations using the quadratic formula. \
                  Can someone explain the steps and maybe show an example?",
        subject: "Mathematics",
        grade: "Grade 11",
        difficulty: "Easy",
        image: Some("https://images.unsplash.com/photo-1635070041078-e363dbe005cb?w=400&h=200&fit=crop"),
        author: 1,
        solved: false,
        likes: 12,
        views: 45,
        hours_ago: 2,
    },
    DemoQuestion {
        title: "Understanding Newton's Second Law - Force and Acceleration",
        content: "I understand F = ma conceptually, but I'm having trouble applying it to \
                  real-world problems. Can someone break down the problem-solving approach?",
        subject: "Physics",
        grade: "Grade 12",
        difficulty: "Medium",
        image: None,
        author: 2,
        solved: false,
        likes: 18,
        views: 67,
        hours_ago: 4,
    },
    DemoQuestion {
        title: "Balancing complex chemical equations with multiple compounds",
        content: "Having trouble balancing this equation: C₈H₁₈ + O₂ → CO₂ + H₂O. \
                  What's the systematic approach?",
        subject: "Chemistry",
        grade: "Grade 11",
        difficulty: "Hard",
        image: None,
        author: 1,
        solved: true,
        likes: 25,
        views: 89,
        hours_ago: 6,
    },
];

/// Insert the demo accounts and questions.
///
/// # Errors
///
/// Returns a validation error if the store already holds an account with one
/// of the demo identities or emails.
pub fn demo_data(store: &MemoryStore) -> Result<(), StoreError> {
    let mut author_ids = Vec::with_capacity(ACCOUNTS.len());
    for demo in &ACCOUNTS {
        let account = store.accounts().create(&AccountDraft {
            identity_uid: Some(demo.uid.to_owned()),
            email: Some(demo.email.to_owned()),
            name: Some(demo.name.to_owned()),
            avatar: Some(demo.avatar.to_owned()),
            points: Some(demo.points),
            rank: Some(demo.rank.to_owned()),
            questions_answered: Some(demo.answered),
        })?;
        author_ids.push(account.id);
    }

    let now = Utc::now();
    for demo in &QUESTIONS {
        let question = store.questions().create(&QuestionDraft {
            title: Some(demo.title.to_owned()),
            content: Some(demo.content.to_owned()),
            subject: Some(demo.subject.to_owned()),
            grade_level: Some(demo.grade.to_owned()),
            difficulty: Some(demo.difficulty.to_owned()),
            images: Some(demo.image.iter().map(|s| (*s).to_owned()).collect()),
            author_id: author_ids.get(demo.author).copied(),
        })?;
        backdate(store, question.id, demo, now - Duration::hours(demo.hours_ago))?;
    }

    info!(
        accounts = ACCOUNTS.len(),
        questions = QUESTIONS.len(),
        "seeded demo data"
    );
    Ok(())
}

/// Apply the activity counters and creation time a fresh question cannot take.
fn backdate(
    store: &MemoryStore,
    id: QuestionId,
    demo: &DemoQuestion,
    created_at: chrono::DateTime<Utc>,
) -> Result<(), StoreError> {
    let mut data = store.write()?;
    if let Some(question) = data.questions.get_mut(&id) {
        question.solved = demo.solved;
        question.likes = demo.likes;
        question.views = demo.views;
        question.created_at = created_at;
    }
    Ok(())
}
