//! Dashboard aggregates over the full suggestion list.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Sentiment, Status, Suggestion};

pub const TOP_CONTRIBUTORS: usize = 5;
pub const TAG_CLOUD_SIZE: usize = 40;

/// Headline numbers. Rates are pre-formatted with one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_suggestions: usize,
    pub total_votes: u64,
    /// (votes + comments) per suggestion
    pub engagement_rate: String,
    /// Percentage of suggestions marked Implemented
    pub implementation_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentDay {
    #[serde(rename = "date")]
    pub date: NaiveDate,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub id: Uuid,
    pub name: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub name: Status,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFrequency {
    pub text: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub summary: Summary,
    pub sentiment_by_day: Vec<SentimentDay>,
    pub top_contributors: Vec<Contributor>,
    pub status_funnel: Vec<StatusCount>,
    pub tag_cloud: Vec<TagFrequency>,
}

/// One decimal place, halves rounded away from zero (0.25 -> "0.3").
fn one_decimal(x: f64) -> String {
    format!("{:.1}", (x * 10.0).round() / 10.0)
}

pub fn summary(suggestions: &[Suggestion]) -> Summary {
    if suggestions.is_empty() {
        return Summary {
            total_suggestions: 0,
            total_votes: 0,
            engagement_rate: "0.0".to_string(),
            implementation_rate: "0.0".to_string(),
        };
    }

    let count = suggestions.len() as f64;
    let votes: u64 = suggestions
        .iter()
        .map(|s| u64::from(s.upvotes) + u64::from(s.downvotes))
        .sum();
    let comments: u64 = suggestions.iter().map(|s| s.comments.len() as u64).sum();
    let implemented = suggestions
        .iter()
        .filter(|s| s.status == Status::Implemented)
        .count() as f64;

    Summary {
        total_suggestions: suggestions.len(),
        total_votes: votes,
        engagement_rate: one_decimal((votes + comments) as f64 / count),
        implementation_rate: one_decimal(implemented / count * 100.0),
    }
}

/// Sentiment counts per UTC creation day, oldest day first.
pub fn sentiment_by_day(suggestions: &[Suggestion]) -> Vec<SentimentDay> {
    let mut days: HashMap<NaiveDate, SentimentDay> = HashMap::new();
    for s in suggestions {
        let date = s.created_at.date_naive();
        let day = days.entry(date).or_insert(SentimentDay {
            date,
            positive: 0,
            neutral: 0,
            negative: 0,
        });
        match s.sentiment {
            Sentiment::Positive => day.positive += 1,
            Sentiment::Neutral => day.neutral += 1,
            Sentiment::Negative => day.negative += 1,
        }
    }

    let mut out: Vec<SentimentDay> = days.into_values().collect();
    out.sort_by_key(|d| d.date);
    out
}

/// Authors ranked by `2 × upvotes + comments` across their named submissions.
pub fn top_contributors(suggestions: &[Suggestion]) -> Vec<Contributor> {
    // Keep first-seen order so equal scores rank deterministically.
    let mut order: Vec<Uuid> = Vec::new();
    let mut scores: HashMap<Uuid, Contributor> = HashMap::new();

    for s in suggestions.iter().filter(|s| !s.is_anonymous) {
        let Some(author) = &s.author else { continue };
        let entry = scores.entry(author.id).or_insert_with(|| {
            order.push(author.id);
            Contributor {
                id: author.id,
                name: author.name.clone(),
                score: 0,
            }
        });
        entry.score += u64::from(s.upvotes) * 2 + s.comments.len() as u64;
    }

    let mut ranked: Vec<Contributor> = order
        .into_iter()
        .filter_map(|id| scores.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(TOP_CONTRIBUTORS);
    ranked
}

/// Counts per status, in funnel order.
pub fn status_funnel(suggestions: &[Suggestion]) -> Vec<StatusCount> {
    [
        Status::Pending,
        Status::Reviewed,
        Status::Rejected,
        Status::Implemented,
    ]
    .into_iter()
    .map(|name| StatusCount {
        name,
        count: suggestions.iter().filter(|s| s.status == name).count(),
    })
    .collect()
}

/// Most frequent tags, most common first.
pub fn tag_cloud(suggestions: &[Suggestion]) -> Vec<TagFrequency> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in suggestions.iter().flat_map(|s| s.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert_with(|| {
            order.push(tag.as_str());
            0
        });
        *count += 1;
    }

    let mut cloud: Vec<TagFrequency> = order
        .into_iter()
        .map(|text| TagFrequency {
            text: text.to_string(),
            value: counts[text],
        })
        .collect();
    cloud.sort_by(|a, b| b.value.cmp(&a.value));
    cloud.truncate(TAG_CLOUD_SIZE);
    cloud
}

pub fn analytics(suggestions: &[Suggestion]) -> Analytics {
    Analytics {
        summary: summary(suggestions),
        sentiment_by_day: sentiment_by_day(suggestions),
        top_contributors: top_contributors(suggestions),
        status_funnel: status_funnel(suggestions),
        tag_cloud: tag_cloud(suggestions),
    }
}
