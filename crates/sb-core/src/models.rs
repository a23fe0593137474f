//! # Domain Models
//!
//! These structs represent the core entities of the suggestion box.
//! We use UUID v7 for time-ordered, globally unique identification.
//! Field names serialize in camelCase so stored blobs and JSON exports keep
//! one record shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed set of suggestion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Academics,
    Events,
    Facilities,
    /// Catch-all. Unknown labels coming back from storage or the classifier land here.
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Academics,
        Category::Events,
        Category::Facilities,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Academics => "Academics",
            Category::Events => "Events",
            Category::Facilities => "Facilities",
            Category::Other => "Other",
        }
    }

    /// Maps a free-form label onto the enumeration, coercing anything unknown to `Other`.
    pub fn coerce(label: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Triage state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Reviewed,
    Implemented,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Reviewed,
        Status::Implemented,
        Status::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Reviewed => "Reviewed",
            Status::Implemented => "Implemented",
            Status::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Symbolic reactions, counted independently of up/down votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    #[serde(rename = "👍")]
    ThumbsUp,
    #[serde(rename = "❤️")]
    Heart,
    #[serde(rename = "💡")]
    Idea,
    #[serde(rename = "😂")]
    Laugh,
}

impl ReactionKind {
    /// Order in which counters are laid out on every suggestion.
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::ThumbsUp,
        ReactionKind::Heart,
        ReactionKind::Idea,
        ReactionKind::Laugh,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    pub count: u32,
}

/// Zeroed counters, one per reaction kind.
pub fn empty_reactions() -> Vec<Reaction> {
    ReactionKind::ALL
        .into_iter()
        .map(|kind| Reaction { kind, count: 0 })
        .collect()
}

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Identity snapshot (author of a suggestion, moderator of an action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

/// The fundamental unit of the suggestion box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub status: Status,
    pub upvotes: u32,
    pub downvotes: u32,
    pub comments: Vec<Comment>,
    pub reactions: Vec<Reaction>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
    /// Inline `data:image/svg+xml` avatar
    pub avatar: String,
    pub sentiment: Sentiment,
    pub is_anonymous: bool,
    pub is_private: bool,
    /// Absent for anonymous or signed-out submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub is_reported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_reason: Option<String>,
}

impl Suggestion {
    /// Upvotes minus downvotes.
    pub fn net_score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Visible in public listings, leaderboard and feeds.
    pub fn is_public(&self) -> bool {
        !self.is_private
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModerationAction {
    Dismissed,
    Removed,
}

/// Append-only record of a moderator's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLog {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    /// Title at the time of the action; the suggestion may be gone since
    pub suggestion_title: String,
    pub action: ModerationAction,
    pub moderator: UserRef,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl User {
    pub fn snapshot(&self) -> UserRef {
        UserRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Output of the classification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub sentiment: Sentiment,
    pub category: Category,
    pub tags: Vec<String>,
}

impl Analysis {
    /// Used when no classifier is configured.
    pub fn unconfigured() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            category: Category::Other,
            tags: vec!["general".to_string()],
        }
    }

    /// Used when the classifier call fails.
    pub fn failed() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            category: Category::Other,
            tags: vec!["general".to_string(), "analysis-failed".to_string()],
        }
    }
}

/// Caller-supplied half of a new suggestion.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub title: String,
    pub description: String,
    pub analysis: Analysis,
    pub is_anonymous: bool,
    pub is_private: bool,
}

/// The single saved submission draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Top-level screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Dashboard,
    Suggestions,
    Analytics,
    Leaderboard,
    Profile,
    Moderation,
}
