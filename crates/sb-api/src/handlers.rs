//! # sb-api Handlers
//!
//! Thin translation between HTTP requests and `SuggestionBox` operations.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use sb_core::models::{
    Draft, ModerationAction, ReactionKind, Status, Suggestion, Theme, User, View, VoteDirection,
};
use sb_core::view::ListingQuery;
use sb_core::{SignupForm, Submission, SuggestionBox};

use crate::error::ApiResult;

/// State shared across all Actix-web workers.
/// One lock around the whole context: every mutation is a full rewrite, last write wins.
pub struct AppState {
    pub app: Mutex<SuggestionBox>,
}

impl AppState {
    pub fn new(app: SuggestionBox) -> Self {
        Self {
            app: Mutex::new(app),
        }
    }
}

// ── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub direction: VoteDirection,
}

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportBody {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct ModerationBody {
    pub action: ModerationAction,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminBody {
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub view: View,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Me<'a> {
    user: Option<&'a User>,
    is_admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    featured: Option<Suggestion>,
    recently_implemented: Vec<Suggestion>,
}

// ── Suggestions ─────────────────────────────────────────────────────────────

pub async fn list_suggestions(
    data: web::Data<AppState>,
    query: web::Query<ListingQuery>,
) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(app.listing(&query)))
}

pub async fn get_suggestion(data: web::Data<AppState>, path: web::Path<Uuid>) -> ApiResult {
    let app = data.app.lock().await;
    let suggestion = app.suggestion(path.into_inner())?;
    Ok(HttpResponse::Ok().json(suggestion))
}

pub async fn submit_suggestion(
    data: web::Data<AppState>,
    form: web::Json<Submission>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let created = app.submit(form.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/suggestions/{}", created.id)))
        .json(created))
}

pub async fn vote(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<VoteBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let updated = app.vote(path.into_inner(), body.direction).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn react(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ReactionBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let updated = app.react(path.into_inner(), body.kind).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn comment(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let updated = app.comment(path.into_inner(), &body.text).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn report(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ReportBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let updated = app.report(path.into_inner(), &body.reason).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn update_status(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StatusBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let updated = app.update_status(path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn moderate(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ModerationBody>,
) -> ApiResult {
    let mut app = data.app.lock().await;
    let affected = app.moderate(path.into_inner(), body.action).await?;
    Ok(HttpResponse::Ok().json(affected))
}

// ── Read views ──────────────────────────────────────────────────────────────

pub async fn dashboard(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(Dashboard {
        featured: app.featured(),
        recently_implemented: app.recently_implemented(),
    }))
}

pub async fn leaderboard(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(app.leaderboard()))
}

pub async fn analytics(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(app.analytics()))
}

/// Non-admins are sent back to the suggestion listing.
pub async fn moderation_board(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    if app.open_view(View::Moderation) != View::Moderation {
        return Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/suggestions"))
            .finish());
    }
    Ok(HttpResponse::Ok().json(app.moderation_board()?))
}

pub async fn moderation_logs(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(app.moderation_logs()?))
}

pub async fn navigate(data: web::Data<AppState>, query: web::Query<NavigateQuery>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(json!({ "view": app.open_view(query.view) })))
}

// ── Export ──────────────────────────────────────────────────────────────────

pub async fn export_json(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"suggestions.json\"",
        ))
        .body(app.export_json()?))
}

pub async fn export_csv(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"suggestions.csv\"",
        ))
        .body(app.export_csv()))
}

// ── Forms ───────────────────────────────────────────────────────────────────

pub async fn challenge(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    let check = app.challenge();
    Ok(HttpResponse::Ok().json(json!({
        "a": check.a,
        "b": check.b,
        "question": check.question(),
    })))
}

pub async fn get_draft(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(match app.load_draft().await {
        Some(draft) => HttpResponse::Ok().json(draft),
        None => HttpResponse::NoContent().finish(),
    })
}

pub async fn save_draft(data: web::Data<AppState>, body: web::Json<Draft>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.save_draft(&body).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn clear_draft(data: web::Data<AppState>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.clear_draft().await;
    Ok(HttpResponse::NoContent().finish())
}

// ── Session & admin ─────────────────────────────────────────────────────────

pub async fn me(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(Me {
        user: app.user(),
        is_admin: app.is_admin(),
    }))
}

pub async fn login(data: web::Data<AppState>, body: web::Json<LoginBody>) -> ApiResult {
    let mut app = data.app.lock().await;
    let user = app.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn signup(data: web::Data<AppState>, form: web::Json<SignupForm>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.signup(&form).await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn logout(data: web::Data<AppState>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.logout().await;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn update_profile(data: web::Data<AppState>, body: web::Json<ProfileBody>) -> ApiResult {
    let mut app = data.app.lock().await;
    let user = app.update_profile(&body.name).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn enable_admin(data: web::Data<AppState>, body: web::Json<AdminBody>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.enable_admin(&body.password).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn disable_admin(data: web::Data<AppState>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.disable_admin();
    Ok(HttpResponse::NoContent().finish())
}

// ── Preferences ─────────────────────────────────────────────────────────────

pub async fn get_theme(data: web::Data<AppState>) -> ApiResult {
    let app = data.app.lock().await;
    Ok(HttpResponse::Ok().json(ThemeBody { theme: app.theme() }))
}

pub async fn set_theme(data: web::Data<AppState>, body: web::Json<ThemeBody>) -> ApiResult {
    let mut app = data.app.lock().await;
    app.set_theme(body.theme).await;
    Ok(HttpResponse::Ok().json(ThemeBody { theme: app.theme() }))
}

pub async fn toggle_theme(data: web::Data<AppState>) -> ApiResult {
    let mut app = data.app.lock().await;
    let theme = app.toggle_theme().await;
    Ok(HttpResponse::Ok().json(ThemeBody { theme }))
}
