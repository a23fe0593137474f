//! # Read path
//!
//! Derived views over the suggestion list: the filtered and sorted listing,
//! the featured card, the "recently implemented" feed, the leaderboard and the
//! moderation board. Nothing here mutates or caches; callers recompute on demand.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Status, Suggestion, User, View};

pub const LEADERBOARD_SIZE: usize = 10;
pub const RECENTLY_IMPLEMENTED_SIZE: usize = 1;

/// Listing order. Parsed leniently ("Most Popular", "most-popular", "popular").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortOption {
    /// Creation time, newest first
    #[default]
    Newest,
    /// Net score, highest first
    MostPopular,
    /// Fresh shuffle on every call
    Random,
}

impl SortOption {
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::MostPopular => "Most Popular",
            SortOption::Random => "Random",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "most popular" | "most-popular" | "popular" => Ok(SortOption::MostPopular),
            "random" => Ok(SortOption::Random),
            other => Err(format!("unknown sort option '{other}'")),
        }
    }
}

impl TryFrom<String> for SortOption {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortOption> for String {
    fn from(value: SortOption) -> Self {
        value.label().to_string()
    }
}

/// Category selector: every category or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(value.trim()))
            .map(CategoryFilter::Only)
            .ok_or_else(|| format!("unknown category '{value}'"))
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

/// Who is looking at the listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer<'a> {
    pub user: Option<&'a User>,
    pub is_admin: bool,
}

/// UI-selected listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortOption,
    /// Only the viewer's own, non-anonymous submissions
    pub mine_only: bool,
    /// Admins only: restrict to private submissions
    pub private_only: bool,
}

/// Applies visibility, ownership, category and search filters, keeping list order.
pub fn filter_suggestions<'s>(
    suggestions: &'s [Suggestion],
    query: &ListingQuery,
    viewer: Viewer<'_>,
) -> Vec<&'s Suggestion> {
    let needle = query.search.to_lowercase();

    suggestions
        .iter()
        .filter(|s| {
            if viewer.is_admin {
                !query.private_only || s.is_private
            } else {
                !s.is_private
            }
        })
        .filter(|s| {
            !query.mine_only
                || viewer.user.is_some_and(|u| {
                    !s.is_anonymous && s.author.as_ref().is_some_and(|a| a.id == u.id)
                })
        })
        .filter(|s| query.category.matches(s.category))
        .filter(|s| matches_search(s, &needle))
        .collect()
}

/// Case-insensitive substring match over title, description or any tag.
fn matches_search(s: &Suggestion, needle: &str) -> bool {
    needle.is_empty()
        || s.title.to_lowercase().contains(needle)
        || s.description.to_lowercase().contains(needle)
        || s.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Orders a filtered list. `Random` is deliberately unstable across calls.
pub fn sort_suggestions(mut items: Vec<&Suggestion>, sort: SortOption) -> Vec<&Suggestion> {
    match sort {
        SortOption::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::MostPopular => items.sort_by(|a, b| b.net_score().cmp(&a.net_score())),
        SortOption::Random => items.shuffle(&mut rand::thread_rng()),
    }
    items
}

/// Filter then sort, as the suggestions page shows them.
pub fn list_suggestions<'s>(
    suggestions: &'s [Suggestion],
    query: &ListingQuery,
    viewer: Viewer<'_>,
) -> Vec<&'s Suggestion> {
    sort_suggestions(filter_suggestions(suggestions, query, viewer), query.sort)
}

fn public_by_score(suggestions: &[Suggestion]) -> Vec<&Suggestion> {
    let public = suggestions.iter().filter(|s| s.is_public()).collect();
    sort_suggestions(public, SortOption::MostPopular)
}

/// The highest-scoring public suggestion.
pub fn featured(suggestions: &[Suggestion]) -> Option<&Suggestion> {
    public_by_score(suggestions).into_iter().next()
}

/// Top public suggestions by net score; ties keep list order.
pub fn leaderboard(suggestions: &[Suggestion]) -> Vec<&Suggestion> {
    let mut top = public_by_score(suggestions);
    top.truncate(LEADERBOARD_SIZE);
    top
}

/// Most recently implemented public suggestions.
pub fn recently_implemented(suggestions: &[Suggestion]) -> Vec<&Suggestion> {
    let mut done: Vec<&Suggestion> = suggestions
        .iter()
        .filter(|s| s.status == Status::Implemented && s.is_public())
        .collect();
    done.sort_by(|a, b| {
        let a_at = a.status_updated_at.unwrap_or(a.created_at);
        let b_at = b.status_updated_at.unwrap_or(b.created_at);
        b_at.cmp(&a_at)
    });
    done.truncate(RECENTLY_IMPLEMENTED_SIZE);
    done
}

/// Everything a moderator triages, grouped by status.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationBoard {
    pub pending: Vec<Suggestion>,
    pub reviewed: Vec<Suggestion>,
    pub implemented: Vec<Suggestion>,
    pub rejected: Vec<Suggestion>,
    pub reported: Vec<Suggestion>,
}

pub fn moderation_board(suggestions: &[Suggestion]) -> ModerationBoard {
    let with_status = |status: Status| -> Vec<Suggestion> {
        suggestions
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    };

    ModerationBoard {
        pending: with_status(Status::Pending),
        reviewed: with_status(Status::Reviewed),
        implemented: with_status(Status::Implemented),
        rejected: with_status(Status::Rejected),
        reported: suggestions.iter().filter(|s| s.is_reported).cloned().collect(),
    }
}

/// Moderation is admin-only; everyone else lands on the suggestions page.
pub fn resolve_view(requested: View, is_admin: bool) -> View {
    match requested {
        View::Moderation if !is_admin => View::Suggestions,
        other => other,
    }
}
