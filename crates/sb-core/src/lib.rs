//! suggestion-box/crates/sb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the suggestion box.

pub mod analytics;
pub mod avatar;
pub mod classify;
pub mod collection;
pub mod context;
pub mod error;
pub mod export;
pub mod memory;
pub mod models;
pub mod persist;
pub mod session;
pub mod store;
pub mod traits;
pub mod validation;
pub mod view;

// Re-exporting for easier access in other crates
pub use context::{SignupForm, Submission, SuggestionBox};
pub use error::*;
pub use memory::InMemoryStore;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_suggestion_json_shape() {
        let s = crate::collection::fixtures::suggestion("Hello Rust!");
        let json = serde_json::to_value(&s).unwrap();

        assert_eq!(json["status"], "Pending");
        assert_eq!(json["category"], "Facilities");
        assert_eq!(json["isAnonymous"], false);
        assert_eq!(json["reactions"][0]["type"], "👍");
        assert!(json.get("author").is_none());
        assert!(json.get("reportReason").is_none());
    }

    #[test]
    fn test_unknown_category_reads_as_other() {
        let parsed: Category = serde_json::from_str("\"Sports\"").unwrap();
        assert_eq!(parsed, Category::Other);
        assert_eq!(Category::coerce("academics"), Category::Academics);
        assert_eq!(Category::coerce("Cafeteria"), Category::Other);
    }

    #[test]
    fn test_net_score_can_go_negative() {
        let mut s = crate::collection::fixtures::suggestion("x");
        s.upvotes = 1;
        s.downvotes = 4;
        assert_eq!(s.net_score(), -3);
        assert_ne!(s.id, Uuid::nil());
    }
}
