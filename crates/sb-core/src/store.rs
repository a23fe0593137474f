//! # State-owning collections
//!
//! `SuggestionStore` and `ModerationJournal` hold their list in memory, load it
//! once at startup and rewrite the whole blob after every mutation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::collection;
use crate::models::{
    ModerationAction, ModerationLog, NewSuggestion, ReactionKind, Status, Suggestion, User,
    UserRef, VoteDirection,
};
use crate::persist::{load_json, save_json, MODERATION_LOGS_KEY, SUGGESTIONS_KEY};
use crate::traits::KeyValueStore;

pub struct SuggestionStore {
    kv: Arc<dyn KeyValueStore>,
    items: Vec<Suggestion>,
}

impl SuggestionStore {
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let items: Vec<Suggestion> = load_json(kv.as_ref(), SUGGESTIONS_KEY)
            .await
            .unwrap_or_default();
        log::info!("Loaded {} suggestions", items.len());
        Self { kv, items }
    }

    pub fn all(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&Suggestion> {
        self.items.iter().find(|s| s.id == id)
    }

    /// Swaps in the transformed list and persists it in full.
    async fn replace(&mut self, items: Vec<Suggestion>) {
        self.items = items;
        save_json(self.kv.as_ref(), SUGGESTIONS_KEY, &self.items).await;
    }

    async fn update(
        &mut self,
        id: Uuid,
        op: impl FnOnce(&[Suggestion]) -> Vec<Suggestion>,
    ) -> Option<Suggestion> {
        let next = op(&self.items);
        self.replace(next).await;
        self.get(id).cloned()
    }

    pub async fn add(&mut self, new: NewSuggestion, user: Option<&User>) -> Suggestion {
        let next = collection::add_suggestion(&self.items, new, user);
        let created = next[0].clone();
        self.replace(next).await;
        created
    }

    pub async fn vote(&mut self, id: Uuid, direction: VoteDirection) -> Option<Suggestion> {
        self.update(id, |list| collection::vote(list, id, direction)).await
    }

    pub async fn react(&mut self, id: Uuid, kind: ReactionKind) -> Option<Suggestion> {
        self.update(id, |list| collection::react(list, id, kind)).await
    }

    pub async fn comment(&mut self, id: Uuid, text: &str) -> Option<Suggestion> {
        self.update(id, |list| collection::add_comment(list, id, text)).await
    }

    pub async fn report(&mut self, id: Uuid, reason: &str) -> Option<Suggestion> {
        self.update(id, |list| collection::report(list, id, reason)).await
    }

    pub async fn dismiss_report(&mut self, id: Uuid) -> Option<Suggestion> {
        self.update(id, |list| collection::dismiss_report(list, id)).await
    }

    pub async fn update_status(&mut self, id: Uuid, status: Status) -> Option<Suggestion> {
        self.update(id, |list| collection::update_status(list, id, status)).await
    }

    /// Returns the removed record, if it existed.
    pub async fn remove(&mut self, id: Uuid) -> Option<Suggestion> {
        let removed = self.get(id).cloned();
        let next = collection::remove(&self.items, id);
        self.replace(next).await;
        removed
    }
}

/// Append-only audit trail of moderator actions.
pub struct ModerationJournal {
    kv: Arc<dyn KeyValueStore>,
    /// Newest first, which is also the stored blob's order
    logs: Vec<ModerationLog>,
}

impl ModerationJournal {
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let logs: Vec<ModerationLog> = load_json(kv.as_ref(), MODERATION_LOGS_KEY)
            .await
            .unwrap_or_default();
        Self { kv, logs }
    }

    pub async fn record(
        &mut self,
        action: ModerationAction,
        suggestion: &Suggestion,
        moderator: UserRef,
    ) -> ModerationLog {
        let entry = ModerationLog {
            id: Uuid::now_v7(),
            suggestion_id: suggestion.id,
            suggestion_title: suggestion.title.clone(),
            action,
            moderator,
            timestamp: Utc::now(),
        };
        self.logs.insert(0, entry.clone());
        save_json(self.kv.as_ref(), MODERATION_LOGS_KEY, &self.logs).await;
        log::info!(
            "Moderator {} {:?} suggestion {}",
            entry.moderator.name,
            action,
            entry.suggestion_id
        );
        entry
    }

    pub fn latest_first(&self) -> Vec<ModerationLog> {
        self.logs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::fixtures::{new_suggestion, user};
    use crate::memory::InMemoryStore;
    use crate::traits::MockKeyValueStore;

    fn kv() -> Arc<dyn KeyValueStore> {
        Arc::new(InMemoryStore::default())
    }

    #[tokio::test]
    async fn test_every_mutation_rewrites_storage() {
        let kv = kv();
        let mut store = SuggestionStore::load(kv.clone()).await;
        let created = store.add(new_suggestion("Persist me"), None).await;
        store.vote(created.id, VoteDirection::Up).await;

        let reloaded = SuggestionStore::load(kv).await;
        assert_eq!(reloaded.all().len(), 1);
        assert_eq!(reloaded.all()[0].upvotes, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_returns_none() {
        let mut store = SuggestionStore::load(kv()).await;
        store.add(new_suggestion("Only"), None).await;
        assert!(store.vote(Uuid::now_v7(), VoteDirection::Up).await.is_none());
        assert!(store.remove(Uuid::now_v7()).await.is_none());
        assert_eq!(store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_drops_record() {
        let mut store = SuggestionStore::load(kv()).await;
        let a = store.add(new_suggestion("A"), None).await;
        store.add(new_suggestion("B"), None).await;

        let removed = store.remove(a.id).await;
        assert_eq!(removed.map(|s| s.title), Some("A".to_string()));
        assert!(store.get(a.id).is_none());
        assert_eq!(store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_storage_loads_empty() {
        let kv = kv();
        kv.set(SUGGESTIONS_KEY, "[{broken").await.unwrap();
        let store = SuggestionStore::load(kv).await;
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set()
            .times(2)
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));
        let mut store = SuggestionStore::load(Arc::new(mock)).await;

        let created = store.add(new_suggestion("A"), None).await;
        let voted = store.vote(created.id, VoteDirection::Down).await.unwrap();
        assert_eq!(voted.downvotes, 1);
    }

    #[tokio::test]
    async fn test_journal_reads_latest_first_and_persists() {
        let kv = kv();
        let moderator = user("Mod");
        let mut store = SuggestionStore::load(kv.clone()).await;
        let a = store.add(new_suggestion("A"), None).await;
        let b = store.add(new_suggestion("B"), None).await;

        let mut journal = ModerationJournal::load(kv.clone()).await;
        journal.record(ModerationAction::Dismissed, &a, moderator.snapshot()).await;
        journal.record(ModerationAction::Removed, &b, moderator.snapshot()).await;

        let reloaded = ModerationJournal::load(kv).await;
        let latest = reloaded.latest_first();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].suggestion_title, "B");
        assert_eq!(latest[0].action, ModerationAction::Removed);
        assert_eq!(latest[1].suggestion_title, "A");
        assert_eq!(latest[1].moderator.name, "Mod");
    }

    #[tokio::test]
    async fn test_journal_blob_is_stored_newest_first() {
        let kv = kv();
        let moderator = user("Mod");
        let mut store = SuggestionStore::load(kv.clone()).await;
        let a = store.add(new_suggestion("A"), None).await;
        let b = store.add(new_suggestion("B"), None).await;

        let mut journal = ModerationJournal::load(kv.clone()).await;
        journal.record(ModerationAction::Dismissed, &a, moderator.snapshot()).await;
        journal.record(ModerationAction::Dismissed, &b, moderator.snapshot()).await;

        let raw = kv.get(MODERATION_LOGS_KEY).await.unwrap().unwrap();
        let stored: Vec<ModerationLog> = serde_json::from_str(&raw).unwrap();
        let titles: Vec<&str> = stored.iter().map(|l| l.suggestion_title.as_str()).collect();
        assert_eq!(titles, ["B", "A"]);
    }
}
