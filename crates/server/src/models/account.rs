//! Account domain types.
//!
//! An account is a registered student. Identity itself lives with the
//! external provider; the account stores the provider's user ID alongside
//! the helper statistics shown on the leaderboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use study_helper_core::{AccountId, Email};

use crate::validation::{self, ValidationErrors};

/// Rank label given to accounts that do not specify one.
pub const DEFAULT_RANK: &str = "Bronze Helper";

const MAX_NAME_LENGTH: usize = 100;
const MAX_IDENTITY_LENGTH: usize = 128;
const MAX_RANK_LENGTH: usize = 50;
const MAX_AVATAR_LENGTH: usize = 2048;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// User ID assigned by the external identity provider (unique).
    #[serde(rename = "firebaseUid")]
    pub identity_uid: String,
    /// Contact email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Avatar image reference.
    pub avatar: Option<String>,
    /// Accumulated helper points.
    pub points: u32,
    /// Rank label, e.g. "Gold Helper".
    pub rank: String,
    /// How many questions this account has answered.
    pub questions_answered: u32,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied payload for registering an account.
///
/// Every field is optional at the type level so that missing fields are
/// reported by validation alongside any other problems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    #[serde(rename = "firebaseUid", skip_serializing_if = "Option::is_none")]
    pub identity_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_answered: Option<u32>,
}

/// Fields an account update may override. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountPatch {
    #[serde(rename = "firebaseUid", skip_serializing_if = "Option::is_none")]
    pub identity_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_answered: Option<u32>,
}

/// Validated account fields, before an ID and timestamp are assigned.
#[derive(Debug, Clone)]
pub(crate) struct NewAccount {
    pub identity_uid: String,
    pub email: Email,
    pub name: String,
    pub avatar: Option<String>,
    pub points: u32,
    pub rank: String,
    pub questions_answered: u32,
}

impl AccountDraft {
    /// Check the shape of the draft and apply defaults.
    ///
    /// Uniqueness is checked by the store, which can see other accounts.
    pub(crate) fn validate(&self, errors: &mut ValidationErrors) -> Option<NewAccount> {
        let identity_uid = validation::required_text(
            errors,
            "firebaseUid",
            self.identity_uid.as_deref(),
            MAX_IDENTITY_LENGTH,
        );
        let email = match self.email.as_deref() {
            Some(raw) => parse_email(errors, raw),
            None => {
                errors.add("email", "is required");
                None
            }
        };
        let name = validation::required_text(errors, "name", self.name.as_deref(), MAX_NAME_LENGTH);
        let avatar = optional_avatar(errors, self.avatar.as_deref());
        let rank = match self.rank.as_deref() {
            Some(rank) => validation::text(errors, "rank", rank, MAX_RANK_LENGTH),
            None => Some(DEFAULT_RANK.to_owned()),
        };

        Some(NewAccount {
            identity_uid: identity_uid?,
            email: email?,
            name: name?,
            avatar: avatar?,
            points: self.points.unwrap_or(0),
            rank: rank?,
            questions_answered: self.questions_answered.unwrap_or(0),
        })
    }
}

impl AccountPatch {
    /// Validate the present fields and merge them into a copy of `account`.
    pub(crate) fn apply(&self, account: &Account, errors: &mut ValidationErrors) -> Account {
        let mut updated = account.clone();
        if let Some(uid) = self.identity_uid.as_deref()
            && let Some(uid) = validation::text(errors, "firebaseUid", uid, MAX_IDENTITY_LENGTH)
        {
            updated.identity_uid = uid;
        }
        if let Some(email) = self.email.as_deref().and_then(|raw| parse_email(errors, raw)) {
            updated.email = email;
        }
        if let Some(name) = self.name.as_deref()
            && let Some(name) = validation::text(errors, "name", name, MAX_NAME_LENGTH)
        {
            updated.name = name;
        }
        // A blank avatar clears it.
        if let Some(raw) = self.avatar.as_deref()
            && let Some(avatar) = optional_avatar(errors, Some(raw))
        {
            updated.avatar = avatar;
        }
        if let Some(points) = self.points {
            updated.points = points;
        }
        if let Some(rank) = self.rank.as_deref()
            && let Some(rank) = validation::text(errors, "rank", rank, MAX_RANK_LENGTH)
        {
            updated.rank = rank;
        }
        if let Some(count) = self.questions_answered {
            updated.questions_answered = count;
        }
        updated
    }
}

fn parse_email(errors: &mut ValidationErrors, raw: &str) -> Option<Email> {
    Email::parse(raw)
        .map_err(|e| errors.add("email", e.to_string()))
        .ok()
}

/// A blank avatar is treated as no avatar. `None` means the value was invalid.
fn optional_avatar(errors: &mut ValidationErrors, avatar: Option<&str>) -> Option<Option<String>> {
    match avatar.map(str::trim) {
        None | Some("") => Some(None),
        Some(avatar) if avatar.chars().count() > MAX_AVATAR_LENGTH => {
            errors.add(
                "avatar",
                format!("must be at most {MAX_AVATAR_LENGTH} characters"),
            );
            None
        }
        Some(avatar) => Some(Some(avatar.to_owned())),
    }
}
