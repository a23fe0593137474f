//! Snapshot exports of the suggestion collection.

use chrono::SecondsFormat;

use crate::error::{AppError, Result};
use crate::models::Suggestion;

pub const CSV_HEADER: &str =
    "ID,Title,Description,Category,Tags,Status,Upvotes,Downvotes,Sentiment,CreatedAt,IsAnonymous,AuthorName";

/// Indented JSON with the full record shape.
pub fn to_json(suggestions: &[Suggestion]) -> Result<String> {
    serde_json::to_string_pretty(suggestions).map_err(|e| AppError::Internal(e.to_string()))
}

/// Parses a JSON export back into records.
pub fn from_json(raw: &str) -> Result<Vec<Suggestion>> {
    serde_json::from_str(raw).map_err(|e| AppError::ValidationError(e.to_string()))
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(s: &Suggestion) -> String {
    let author = s.author.as_ref().map_or("", |a| a.name.as_str());
    [
        quoted(&s.id.to_string()),
        quoted(&s.title),
        quoted(&s.description),
        quoted(s.category.label()),
        quoted(&s.tags.join(";")),
        quoted(s.status.label()),
        s.upvotes.to_string(),
        s.downvotes.to_string(),
        s.sentiment.label().to_string(),
        s.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        s.is_anonymous.to_string(),
        quoted(author),
    ]
    .join(",")
}

/// Fixed-column CSV. Text columns are double-quoted, tags joined by `;`.
pub fn to_csv(suggestions: &[Suggestion]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    let rows: Vec<String> = suggestions.iter().map(csv_row).collect();
    out.push_str(&rows.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::fixtures::{new_suggestion, suggestion, user};
    use crate::collection::{add_comment, build_suggestion, react, report};
    use crate::models::{Category, ReactionKind, Sentiment};
    use chrono::{TimeZone, Utc};

    fn parking() -> Suggestion {
        let mut s = suggestion("Add more parking");
        s.category = Category::Facilities;
        s.tags = vec!["parking".to_string(), "campus".to_string()];
        s.upvotes = 5;
        s.downvotes = 1;
        s.sentiment = Sentiment::Positive;
        s.created_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        s
    }

    #[test]
    fn test_csv_row_columns() {
        let s = parking();
        let csv = to_csv(std::slice::from_ref(&s));
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().unwrap();
        let expected = format!(
            "\"{}\",\"Add more parking\",\"Add more parking description\",\"Facilities\",\"parking;campus\",\"Pending\",5,1,Positive,2024-01-15T10:30:00.000Z,false,\"\"",
            s.id
        );
        assert_eq!(row, expected);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_escapes_quotes_and_names_author() {
        let mut s = build_suggestion(new_suggestion("x"), Some(&user("Jo \"JJ\" Doe")));
        s.title = "Say \"hello\"".to_string();
        let csv = to_csv(&[s]);

        assert!(csv.contains("\"Say \"\"hello\"\"\""));
        assert!(csv.ends_with("\"Jo \"\"JJ\"\" Doe\""));
    }

    #[test]
    fn test_csv_of_empty_list_is_header_only() {
        assert_eq!(to_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn test_json_round_trip() {
        let author = user("Test User");
        let named = build_suggestion(new_suggestion("Named"), Some(&author));
        let list = vec![parking(), named];
        let list = add_comment(&list, list[0].id, "agreed");
        let list = react(&list, list[1].id, ReactionKind::Idea);
        let list = report(&list, list[1].id, "duplicate");

        let json = to_json(&list).unwrap();
        assert!(json.contains("\n  "));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"💡\""));
        assert_eq!(from_json(&json).unwrap(), list);
    }
}
