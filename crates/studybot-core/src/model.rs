//! Domain types shared by the store, the composer and the UI.
//!
//! Everything here serializes to the same JSON shape the storage files use:
//! camelCase field names, lowercase role tags, capitalized study modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returns the current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Account role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Guest,
}

/// A signed-in user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub const GUEST_NAME: &str = "Guest Learner";
    pub const GUEST_EMAIL: &str = "guest@example.com";

    /// Synthesizes a guest user with a `guest-<millis>` id.
    pub fn guest() -> Self {
        Self {
            id: format!("guest-{}", now_millis()),
            name: Self::GUEST_NAME.to_string(),
            email: Self::GUEST_EMAIL.to_string(),
            role: UserRole::Guest,
        }
    }

    /// Returns false for users that deserialized but carry blank fields.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// Author of a message, in the generation API's two-role scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A single chat message. Immutable and append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: now_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }
}

/// One conversation thread with its own message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: i64,
}

impl ChatSession {
    pub const DEFAULT_TITLE: &str = "New Study Session";

    /// Creates an empty session titled after `mode`, or the default title.
    pub fn new(mode: Option<StudyMode>) -> Self {
        let title = mode.map_or_else(|| Self::DEFAULT_TITLE.to_string(), StudyMode::session_title);
        Self::with_title(title)
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Tag selecting the tutoring instruction set sent to the generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StudyMode {
    Notes,
    Assignment,
    Project,
    Research,
    Study,
    #[default]
    General,
}

impl StudyMode {
    /// Modes offered as session starters (General is the implicit fallback).
    pub fn starters() -> &'static [StudyMode] {
        &[
            StudyMode::Notes,
            StudyMode::Assignment,
            StudyMode::Project,
            StudyMode::Research,
            StudyMode::Study,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            StudyMode::Notes => "Notes",
            StudyMode::Assignment => "Assignment",
            StudyMode::Project => "Project",
            StudyMode::Research => "Research",
            StudyMode::Study => "Study",
            StudyMode::General => "General",
        }
    }

    /// Title used for sessions started from this mode.
    pub fn session_title(self) -> String {
        format!("{} Session", self.label())
    }

    /// Prompt sent when a session is started without typed input.
    pub fn starter_prompt(self) -> String {
        let label = self.label();
        format!(
            "I want to start a new {label} session. Please introduce yourself as my {label} tutor."
        )
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StudyMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "notes" => Ok(StudyMode::Notes),
            "assignment" => Ok(StudyMode::Assignment),
            "project" => Ok(StudyMode::Project),
            "research" => Ok(StudyMode::Research),
            "study" => Ok(StudyMode::Study),
            "general" => Ok(StudyMode::General),
            _ => Err(format!("Unknown study mode: {value}")),
        }
    }
}
