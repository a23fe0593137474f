//! # Application context
//!
//! `SuggestionBox` is the one object a front end talks to. It owns the
//! suggestion list, the moderation journal, the session, admin mode, the theme
//! preference and the current human-check challenge for the lifetime of the
//! application session.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::analytics::{self, Analytics};
use crate::classify::classify_or_fallback;
use crate::error::{AppError, Result};
use crate::export;
use crate::models::{
    Draft, ModerationAction, ModerationLog, NewSuggestion, ReactionKind, Status, Suggestion,
    Theme, User, View, VoteDirection,
};
use crate::persist::{load_json, remove_key, save_json, DRAFT_KEY, THEME_KEY};
use crate::session::Session;
use crate::store::{ModerationJournal, SuggestionStore};
use crate::traits::{AuthProvider, Classifier, KeyValueStore};
use crate::validation::{
    require_matching_passwords, require_non_empty, require_submission_fields, HumanCheck,
};
use crate::view::{self, ListingQuery, ModerationBoard, Viewer};

/// The submission form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub is_anonymous: bool,
    pub is_private: bool,
    /// Answer to the current [`HumanCheck`]
    pub human_check: String,
}

/// The signup form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub human_check: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound("Suggestion".into(), id.to_string())
}

pub struct SuggestionBox {
    kv: Arc<dyn KeyValueStore>,
    suggestions: SuggestionStore,
    moderation: ModerationJournal,
    session: Session,
    classifier: Option<Arc<dyn Classifier>>,
    is_admin: bool,
    theme: Theme,
    challenge: HumanCheck,
}

impl SuggestionBox {
    /// Reads every stored collection once. Missing or corrupt blobs start empty.
    pub async fn load(
        kv: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthProvider>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> Self {
        let suggestions = SuggestionStore::load(kv.clone()).await;
        let moderation = ModerationJournal::load(kv.clone()).await;
        let session = Session::restore(kv.clone(), auth).await;
        let theme: Theme = load_json(kv.as_ref(), THEME_KEY).await.unwrap_or_default();

        Self {
            kv,
            suggestions,
            moderation,
            session,
            classifier,
            is_admin: false,
            theme,
            challenge: HumanCheck::generate(),
        }
    }

    // ── Session ─────────────────────────────────────────────────────────────

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    fn viewer(&self) -> Viewer<'_> {
        Viewer {
            user: self.session.user(),
            is_admin: self.is_admin,
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.session.login(email, password).await
    }

    /// Validates the form, then registers. The new account is not logged in.
    pub async fn signup(&mut self, form: &SignupForm) -> Result<()> {
        require_non_empty(&form.name, "Name can't be empty.")?;
        require_non_empty(&form.email, "Email can't be empty.")?;
        require_matching_passwords(&form.password, &form.confirm_password)?;
        if let Err(e) = self.challenge.verify(&form.human_check) {
            self.challenge = HumanCheck::generate();
            return Err(e);
        }
        let result = self
            .session
            .signup(form.name.trim(), form.email.trim(), &form.password)
            .await;
        self.challenge = HumanCheck::generate();
        result
    }

    /// Ends the session. Admin mode does not outlive it.
    pub async fn logout(&mut self) {
        self.is_admin = false;
        self.session.logout().await;
    }

    pub async fn update_profile(&mut self, name: &str) -> Result<User> {
        require_non_empty(name, "Name can't be empty.")?;
        self.session.update_profile(name.trim()).await
    }

    // ── Admin mode ──────────────────────────────────────────────────────────

    pub async fn enable_admin(&mut self, password: &str) -> Result<()> {
        let Some(user) = self.session.user() else {
            return Err(AppError::Unauthorized(
                "You must be logged in to use admin features.".into(),
            ));
        };
        if !self.session.auth().verify_admin_password(password).await {
            return Err(AppError::Unauthorized(
                "Incorrect password. Please try again.".into(),
            ));
        }
        log::info!("Admin mode enabled for {}", user.email);
        self.is_admin = true;
        Ok(())
    }

    pub fn disable_admin(&mut self) {
        self.is_admin = false;
    }

    fn require_admin(&self) -> Result<&User> {
        match self.session.user() {
            Some(user) if self.is_admin => Ok(user),
            _ => Err(AppError::Forbidden("Admin mode is required.".into())),
        }
    }

    // ── Preferences ─────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        save_json(self.kv.as_ref(), THEME_KEY, &theme).await;
    }

    pub async fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next).await;
        next
    }

    /// Where a navigation request actually lands.
    pub fn open_view(&self, requested: View) -> View {
        view::resolve_view(requested, self.is_admin)
    }

    // ── Submission ──────────────────────────────────────────────────────────

    pub fn challenge(&self) -> HumanCheck {
        self.challenge
    }

    /// Human check, required fields, classification (never fatal), then add.
    pub async fn submit(&mut self, form: Submission) -> Result<Suggestion> {
        if let Err(e) = self.challenge.verify(&form.human_check) {
            self.challenge = HumanCheck::generate();
            return Err(e);
        }
        // An empty field keeps the current challenge valid for the retry
        require_submission_fields(&form.title, &form.description)?;
        self.challenge = HumanCheck::generate();

        let analysis =
            classify_or_fallback(self.classifier.as_deref(), &form.title, &form.description).await;
        let new = NewSuggestion {
            title: form.title,
            description: form.description,
            analysis,
            is_anonymous: form.is_anonymous,
            is_private: form.is_private,
        };
        let created = self.suggestions.add(new, self.session.user()).await;
        log::info!("New suggestion {} ({})", created.id, created.category);

        remove_key(self.kv.as_ref(), DRAFT_KEY).await;
        Ok(created)
    }

    // ── Drafts ──────────────────────────────────────────────────────────────

    pub async fn save_draft(&mut self, draft: &Draft) -> Result<()> {
        if draft.title.trim().is_empty() && draft.description.trim().is_empty() {
            return Err(AppError::ValidationError("Nothing to save.".into()));
        }
        save_json(self.kv.as_ref(), DRAFT_KEY, draft).await;
        Ok(())
    }

    pub async fn load_draft(&self) -> Option<Draft> {
        load_json(self.kv.as_ref(), DRAFT_KEY).await
    }

    pub async fn has_draft(&self) -> bool {
        self.load_draft().await.is_some()
    }

    pub async fn clear_draft(&mut self) {
        remove_key(self.kv.as_ref(), DRAFT_KEY).await;
    }

    // ── Engagement ──────────────────────────────────────────────────────────

    pub fn suggestion(&self, id: Uuid) -> Result<&Suggestion> {
        self.suggestions.get(id).ok_or_else(|| not_found(id))
    }

    pub async fn vote(&mut self, id: Uuid, direction: VoteDirection) -> Result<Suggestion> {
        self.suggestions
            .vote(id, direction)
            .await
            .ok_or_else(|| not_found(id))
    }

    pub async fn react(&mut self, id: Uuid, kind: ReactionKind) -> Result<Suggestion> {
        self.suggestions
            .react(id, kind)
            .await
            .ok_or_else(|| not_found(id))
    }

    pub async fn comment(&mut self, id: Uuid, text: &str) -> Result<Suggestion> {
        require_non_empty(text, "Comment cannot be empty.")?;
        self.suggestions
            .comment(id, text.trim())
            .await
            .ok_or_else(|| not_found(id))
    }

    pub async fn report(&mut self, id: Uuid, reason: &str) -> Result<Suggestion> {
        require_non_empty(reason, "Please give a reason for the report.")?;
        let reported = self
            .suggestions
            .report(id, reason.trim())
            .await
            .ok_or_else(|| not_found(id))?;
        log::warn!("Suggestion {} reported: {}", id, reason.trim());
        Ok(reported)
    }

    // ── Moderation ──────────────────────────────────────────────────────────

    pub async fn update_status(&mut self, id: Uuid, status: Status) -> Result<Suggestion> {
        self.require_admin()?;
        self.suggestions
            .update_status(id, status)
            .await
            .ok_or_else(|| not_found(id))
    }

    /// Clears a report and journals the decision.
    pub async fn dismiss_report(&mut self, id: Uuid) -> Result<Suggestion> {
        let moderator = self.require_admin()?.snapshot();
        let cleared = self
            .suggestions
            .dismiss_report(id)
            .await
            .ok_or_else(|| not_found(id))?;
        self.moderation
            .record(ModerationAction::Dismissed, &cleared, moderator)
            .await;
        Ok(cleared)
    }

    /// Deletes a suggestion and journals the decision.
    pub async fn remove(&mut self, id: Uuid) -> Result<Suggestion> {
        let moderator = self.require_admin()?.snapshot();
        let removed = self
            .suggestions
            .remove(id)
            .await
            .ok_or_else(|| not_found(id))?;
        self.moderation
            .record(ModerationAction::Removed, &removed, moderator)
            .await;
        Ok(removed)
    }

    pub async fn moderate(&mut self, id: Uuid, action: ModerationAction) -> Result<Suggestion> {
        match action {
            ModerationAction::Dismissed => self.dismiss_report(id).await,
            ModerationAction::Removed => self.remove(id).await,
        }
    }

    pub fn moderation_board(&self) -> Result<ModerationBoard> {
        self.require_admin()?;
        Ok(view::moderation_board(self.suggestions.all()))
    }

    pub fn moderation_logs(&self) -> Result<Vec<ModerationLog>> {
        self.require_admin()?;
        Ok(self.moderation.latest_first())
    }

    // ── Read path ───────────────────────────────────────────────────────────

    pub fn all(&self) -> &[Suggestion] {
        self.suggestions.all()
    }

    pub fn listing(&self, query: &ListingQuery) -> Vec<Suggestion> {
        view::list_suggestions(self.suggestions.all(), query, self.viewer())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn featured(&self) -> Option<Suggestion> {
        view::featured(self.suggestions.all()).cloned()
    }

    pub fn recently_implemented(&self) -> Vec<Suggestion> {
        view::recently_implemented(self.suggestions.all())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn leaderboard(&self) -> Vec<Suggestion> {
        view::leaderboard(self.suggestions.all())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn analytics(&self) -> Analytics {
        analytics::analytics(self.suggestions.all())
    }

    pub fn export_json(&self) -> Result<String> {
        export::to_json(self.suggestions.all())
    }

    pub fn export_csv(&self) -> String {
        export::to_csv(self.suggestions.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::generate_avatar;
    use crate::memory::InMemoryStore;
    use crate::models::{Analysis, Category, Sentiment};
    use crate::persist::{SESSION_USER_KEY, SUGGESTIONS_KEY};
    use crate::traits::{MockAuthProvider, MockClassifier};

    const ADMIN_PASSWORD: &str = "letmein";

    fn mock_auth() -> MockAuthProvider {
        let mut auth = MockAuthProvider::new();
        auth.expect_login().returning(|email, password| {
            if email == "test@example.com" && password == "password123" {
                Ok(User {
                    id: Uuid::now_v7(),
                    name: "Test User".into(),
                    email: email.into(),
                    avatar: generate_avatar("Test User"),
                })
            } else {
                Err(AppError::Unauthorized("Invalid email or password".into()))
            }
        });
        auth.expect_signup().returning(|_, email, _| {
            if email == "test@example.com" {
                Err(AppError::Conflict("User with this email already exists.".into()))
            } else {
                Ok(())
            }
        });
        auth.expect_verify_admin_password()
            .returning(|p| p == ADMIN_PASSWORD);
        auth
    }

    fn working_classifier() -> MockClassifier {
        let mut classifier = MockClassifier::new();
        classifier.expect_analyze().returning(|_, _| {
            Ok(Analysis {
                sentiment: Sentiment::Positive,
                category: Category::Facilities,
                tags: vec!["parking".into()],
            })
        });
        classifier
    }

    async fn app_with(kv: Arc<dyn KeyValueStore>, classifier: Option<MockClassifier>) -> SuggestionBox {
        let classifier = classifier.map(|c| Arc::new(c) as Arc<dyn Classifier>);
        SuggestionBox::load(kv, Arc::new(mock_auth()), classifier).await
    }

    async fn app() -> SuggestionBox {
        app_with(Arc::new(InMemoryStore::default()), Some(working_classifier())).await
    }

    fn answer(app: &SuggestionBox) -> String {
        let c = app.challenge();
        (u16::from(c.a) + u16::from(c.b)).to_string()
    }

    fn form(app: &SuggestionBox, title: &str) -> Submission {
        Submission {
            title: title.into(),
            description: "Details".into(),
            human_check: answer(app),
            ..Default::default()
        }
    }

    async fn admin_app() -> SuggestionBox {
        let mut app = app().await;
        app.login("test@example.com", "password123").await.unwrap();
        app.enable_admin(ADMIN_PASSWORD).await.unwrap();
        app
    }

    #[tokio::test]
    async fn test_submit_classifies_and_prepends() {
        let mut app = app().await;
        let first = form(&app, "First");
        app.submit(first).await.unwrap();
        let second = form(&app, "Add more parking");
        let created = app.submit(second).await.unwrap();

        assert_eq!(created.category, Category::Facilities);
        assert_eq!(created.sentiment, Sentiment::Positive);
        assert_eq!(app.all()[0].id, created.id);
        assert_eq!(app.all().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected() {
        let mut app = app().await;
        let mut submission = form(&app, "   ");
        submission.description = "Has a body".into();

        let err = app.submit(submission).await.unwrap_err();
        assert_eq!(
            err,
            AppError::ValidationError("Title and description cannot be empty.".into())
        );
        assert!(app.all().is_empty());
    }

    #[tokio::test]
    async fn test_empty_field_keeps_challenge_for_retry() {
        let mut app = app().await;
        let before = app.challenge();
        let mut submission = form(&app, "Title");
        submission.description = "".into();
        assert!(app.submit(submission.clone()).await.is_err());
        assert_eq!(app.challenge(), before);

        // Same answer still works once the field is filled in
        submission.description = "Now with details".into();
        let created = app.submit(submission).await.unwrap();
        assert_eq!(created.title, "Title");
    }

    #[tokio::test]
    async fn test_wrong_human_check_is_rejected_and_rotated() {
        let mut app = app().await;
        let mut submission = form(&app, "Title");
        submission.human_check = "999".into();

        let err = app.submit(submission).await.unwrap_err();
        assert_eq!(err, AppError::ValidationError("Incorrect CAPTCHA answer.".into()));
        assert!(app.all().is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_still_adds() {
        let mut failing = MockClassifier::new();
        failing
            .expect_analyze()
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));
        let mut app = app_with(Arc::new(InMemoryStore::default()), Some(failing)).await;

        let created = app.submit(form(&app, "Title")).await.unwrap();
        assert_eq!(created.category, Category::Other);
        assert_eq!(created.sentiment, Sentiment::Neutral);
        assert_eq!(created.tags, ["general", "analysis-failed"]);
        assert_eq!(app.all().len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_classifier_still_adds() {
        let mut app = app_with(Arc::new(InMemoryStore::default()), None).await;
        let created = app.submit(form(&app, "Title")).await.unwrap();
        assert_eq!(created.tags, ["general"]);
    }

    #[tokio::test]
    async fn test_submission_records_author_unless_anonymous() {
        let mut app = app().await;
        let user = app.login("test@example.com", "password123").await.unwrap();

        let named = app.submit(form(&app, "Named")).await.unwrap();
        assert_eq!(named.author.map(|a| a.id), Some(user.id));

        let mut anon = form(&app, "Anon");
        anon.is_anonymous = true;
        let anon = app.submit(anon).await.unwrap();
        assert!(anon.author.is_none());
    }

    #[tokio::test]
    async fn test_submit_clears_draft() {
        let mut app = app().await;
        let draft = Draft { title: "Half".into(), description: "written".into() };
        app.save_draft(&draft).await.unwrap();
        assert_eq!(app.load_draft().await, Some(draft));

        app.submit(form(&app, "Done")).await.unwrap();
        assert!(!app.has_draft().await);
    }

    #[tokio::test]
    async fn test_empty_draft_is_not_saved() {
        let mut app = app().await;
        assert!(app.save_draft(&Draft::default()).await.is_err());
        assert!(!app.has_draft().await);
    }

    #[tokio::test]
    async fn test_engagement_on_unknown_id_is_not_found() {
        let mut app = app().await;
        let ghost = Uuid::now_v7();
        assert!(matches!(
            app.vote(ghost, VoteDirection::Up).await,
            Err(AppError::NotFound(..))
        ));
        assert!(matches!(
            app.react(ghost, ReactionKind::Idea).await,
            Err(AppError::NotFound(..))
        ));
    }

    #[tokio::test]
    async fn test_comment_and_report_validate_text() {
        let mut app = app().await;
        let s = app.submit(form(&app, "Title")).await.unwrap();

        assert!(app.comment(s.id, "  ").await.is_err());
        let commented = app.comment(s.id, "Great idea").await.unwrap();
        assert_eq!(commented.comments.len(), 1);

        assert!(app.report(s.id, "").await.is_err());
        let reported = app.report(s.id, "off-topic").await.unwrap();
        assert!(reported.is_reported);
        // Reported items stay listed
        assert_eq!(app.listing(&ListingQuery::default()).len(), 1);
    }

    #[tokio::test]
    async fn test_admin_requires_login_and_password() {
        let mut app = app().await;
        assert!(matches!(
            app.enable_admin(ADMIN_PASSWORD).await,
            Err(AppError::Unauthorized(_))
        ));

        app.login("test@example.com", "password123").await.unwrap();
        assert!(app.enable_admin("wrong").await.is_err());
        assert!(!app.is_admin());

        app.enable_admin(ADMIN_PASSWORD).await.unwrap();
        assert!(app.is_admin());
        app.logout().await;
        assert!(!app.is_admin());
    }

    #[tokio::test]
    async fn test_non_admin_is_kept_out_of_moderation() {
        let mut app = app().await;
        let s = app.submit(form(&app, "Title")).await.unwrap();
        app.login("test@example.com", "password123").await.unwrap();

        assert_eq!(app.open_view(View::Moderation), View::Suggestions);
        assert!(matches!(app.moderation_board(), Err(AppError::Forbidden(_))));
        assert!(matches!(
            app.update_status(s.id, Status::Implemented).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(app.remove(s.id).await, Err(AppError::Forbidden(_))));
        assert_eq!(app.all().len(), 1);
        assert_eq!(app.all()[0].status, Status::Pending);
    }

    #[tokio::test]
    async fn test_moderation_actions_are_journaled() {
        let mut app = admin_app().await;
        let keep = app.submit(form(&app, "Keep")).await.unwrap();
        let drop = app.submit(form(&app, "Drop")).await.unwrap();
        app.report(keep.id, "spam?").await.unwrap();

        let cleared = app.moderate(keep.id, ModerationAction::Dismissed).await.unwrap();
        assert!(!cleared.is_reported);
        app.moderate(drop.id, ModerationAction::Removed).await.unwrap();
        assert_eq!(app.all().len(), 1);

        let logs = app.moderation_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, ModerationAction::Removed);
        assert_eq!(logs[0].suggestion_title, "Drop");
        assert_eq!(logs[0].moderator.name, "Test User");
        assert_eq!(logs[1].action, ModerationAction::Dismissed);
    }

    #[tokio::test]
    async fn test_private_suggestions_stay_off_public_views() {
        let mut app = admin_app().await;
        let mut secret = form(&app, "Secret");
        secret.is_private = true;
        let secret = app.submit(secret).await.unwrap();
        app.vote(secret.id, VoteDirection::Up).await.unwrap();
        app.update_status(secret.id, Status::Implemented).await.unwrap();

        assert_eq!(app.listing(&ListingQuery::default()).len(), 1);
        app.disable_admin();
        assert!(app.listing(&ListingQuery::default()).is_empty());
        assert!(app.leaderboard().is_empty());
        assert!(app.recently_implemented().is_empty());
        assert!(app.featured().is_none());
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::default());
        {
            let mut app = app_with(kv.clone(), Some(working_classifier())).await;
            app.login("test@example.com", "password123").await.unwrap();
            app.submit(form(&app, "Persisted")).await.unwrap();
            app.set_theme(Theme::Light).await;
        }
        assert!(kv.get(SUGGESTIONS_KEY).await.unwrap().is_some());
        assert!(kv.get(SESSION_USER_KEY).await.unwrap().is_some());

        let app = app_with(kv, None).await;
        assert_eq!(app.all().len(), 1);
        assert_eq!(app.user().map(|u| u.name.as_str()), Some("Test User"));
        assert_eq!(app.theme(), Theme::Light);
        assert!(!app.is_admin());
    }

    #[tokio::test]
    async fn test_signup_validation_order() {
        let mut app = app().await;
        let mut signup = SignupForm {
            name: "New".into(),
            email: "new@example.com".into(),
            password: "a".into(),
            confirm_password: "b".into(),
            human_check: answer(&app),
        };
        assert_eq!(
            app.signup(&signup).await,
            Err(AppError::ValidationError("Passwords do not match.".into()))
        );

        signup.confirm_password = "a".into();
        signup.human_check = answer(&app);
        app.signup(&signup).await.unwrap();

        signup.email = "test@example.com".into();
        signup.human_check = answer(&app);
        assert!(matches!(app.signup(&signup).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_theme_toggles() {
        let mut app = app().await;
        assert_eq!(app.theme(), Theme::Dark);
        assert_eq!(app.toggle_theme().await, Theme::Light);
        assert_eq!(app.toggle_theme().await, Theme::Dark);
    }
}
