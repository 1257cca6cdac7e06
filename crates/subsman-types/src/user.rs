//! User types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::define_id;
use crate::StatusParseError;

/// Maximum accepted email length, in characters
pub const MAX_EMAIL_LEN: usize = 255;

define_id!(
    /// Unique user identifier
    UserId
);

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account can sign in and own subscriptions
    #[default]
    Active,
    /// Soft-disabled account
    Inactive,
}

impl UserStatus {
    /// Stored string form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(StatusParseError::new("user", s)),
        }
    }
}

/// Registered user
///
/// The password is an opaque credential stored exactly as submitted. It is
/// never serialized and never printed by `Debug`. Hashing is not performed.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with fresh id and timestamps
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into(),
            password: password.into(),
            email: email.into(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Length-only email check: non-empty and at most [`MAX_EMAIL_LEN`] characters.
    ///
    /// No format validation happens here; `"x"` passes.
    pub fn validate_email(&self) -> bool {
        let len = self.email.chars().count();
        len > 0 && len <= MAX_EMAIL_LEN
    }

    /// Plain equality check against the stored credential
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Soft-disable the account
    pub fn deactivate(&mut self) {
        self.status = UserStatus::Inactive;
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}
