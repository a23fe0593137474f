//! # Collection transforms
//!
//! Pure operations over the suggestion list. Each returns a fresh list and
//! leaves its input untouched. An id that matches nothing is a no-op.

use chrono::Utc;
use uuid::Uuid;

use crate::avatar::{anonymous_avatar, generate_avatar};
use crate::models::{
    empty_reactions, Comment, NewSuggestion, ReactionKind, Status, Suggestion, User, VoteDirection,
};

/// Applies `f` to the suggestion with `id`, copying every other record as is.
fn update_one<F>(list: &[Suggestion], id: Uuid, f: F) -> Vec<Suggestion>
where
    F: FnOnce(&mut Suggestion),
{
    let mut out = list.to_vec();
    if let Some(target) = out.iter_mut().find(|s| s.id == id) {
        f(target);
    }
    out
}

/// Builds a fresh Pending record. Anonymous or signed-out submissions carry no author.
pub fn build_suggestion(new: NewSuggestion, user: Option<&User>) -> Suggestion {
    let now = Utc::now();
    let author = user.filter(|_| !new.is_anonymous);

    Suggestion {
        id: Uuid::now_v7(),
        title: new.title,
        description: new.description,
        category: new.analysis.category,
        tags: new.analysis.tags,
        status: Status::Pending,
        upvotes: 0,
        downvotes: 0,
        comments: Vec::new(),
        reactions: empty_reactions(),
        created_at: now,
        status_updated_at: Some(now),
        avatar: author.map_or_else(anonymous_avatar, |u| generate_avatar(&u.name)),
        sentiment: new.analysis.sentiment,
        is_anonymous: new.is_anonymous,
        is_private: new.is_private,
        author: author.map(User::snapshot),
        is_reported: false,
        report_reason: None,
    }
}

/// Prepends a newly built suggestion. The new record is at index 0.
pub fn add_suggestion(list: &[Suggestion], new: NewSuggestion, user: Option<&User>) -> Vec<Suggestion> {
    let mut out = Vec::with_capacity(list.len() + 1);
    out.push(build_suggestion(new, user));
    out.extend_from_slice(list);
    out
}

pub fn vote(list: &[Suggestion], id: Uuid, direction: VoteDirection) -> Vec<Suggestion> {
    update_one(list, id, |s| match direction {
        VoteDirection::Up => s.upvotes = s.upvotes.saturating_add(1),
        VoteDirection::Down => s.downvotes = s.downvotes.saturating_add(1),
    })
}

pub fn react(list: &[Suggestion], id: Uuid, kind: ReactionKind) -> Vec<Suggestion> {
    update_one(list, id, |s| {
        if let Some(reaction) = s.reactions.iter_mut().find(|r| r.kind == kind) {
            reaction.count = reaction.count.saturating_add(1);
        }
    })
}

pub fn add_comment(list: &[Suggestion], id: Uuid, text: &str) -> Vec<Suggestion> {
    update_one(list, id, |s| {
        s.comments.push(Comment {
            id: Uuid::now_v7(),
            text: text.to_string(),
            timestamp: Utc::now(),
        })
    })
}

/// Flags a suggestion for moderators. The record stays listed.
pub fn report(list: &[Suggestion], id: Uuid, reason: &str) -> Vec<Suggestion> {
    update_one(list, id, |s| {
        s.is_reported = true;
        s.report_reason = Some(reason.to_string());
    })
}

pub fn dismiss_report(list: &[Suggestion], id: Uuid) -> Vec<Suggestion> {
    update_one(list, id, |s| {
        s.is_reported = false;
        s.report_reason = None;
    })
}

pub fn update_status(list: &[Suggestion], id: Uuid, status: Status) -> Vec<Suggestion> {
    update_one(list, id, |s| {
        s.status = status;
        s.status_updated_at = Some(Utc::now());
    })
}

pub fn remove(list: &[Suggestion], id: Uuid) -> Vec<Suggestion> {
    list.iter().filter(|s| s.id != id).cloned().collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::{Analysis, Category, Sentiment};

    pub fn user(name: &str) -> User {
        User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            avatar: generate_avatar(name),
        }
    }

    pub fn new_suggestion(title: &str) -> NewSuggestion {
        NewSuggestion {
            title: title.to_string(),
            description: format!("{title} description"),
            analysis: Analysis {
                sentiment: Sentiment::Positive,
                category: Category::Facilities,
                tags: vec!["campus".to_string()],
            },
            is_anonymous: false,
            is_private: false,
        }
    }

    pub fn suggestion(title: &str) -> Suggestion {
        build_suggestion(new_suggestion(title), None)
    }
}
