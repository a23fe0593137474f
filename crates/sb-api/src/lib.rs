//! # sb-api
//!
//! The web routing layer for the suggestion box.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::{web, HttpRequest};
use sb_core::AppError;

pub use error::ApiError;
pub use handlers::AppState;

/// Extractor failures answer with the same JSON error body as handler errors.
fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::ValidationError(format!("Invalid request body: {err}"))).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::ValidationError(format!("Invalid query: {err}"))).into()
}

/// A path that does not parse cannot name an existing suggestion.
fn path_error(_err: actix_web::error::PathError, req: &HttpRequest) -> actix_web::Error {
    let id = req.match_info().get("id").unwrap_or_default().to_string();
    ApiError(AppError::NotFound("Suggestion".into(), id)).into()
}

/// Configures every route of the JSON API.
///
/// Routes are registered on a scope so the binary can mount them under a
/// prefix (e.g. `/api`) if needed.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .route("/suggestions", web::get().to(handlers::list_suggestions))
            .route("/suggestions", web::post().to(handlers::submit_suggestion))
            .route("/suggestions/{id}", web::get().to(handlers::get_suggestion))
            .route("/suggestions/{id}/vote", web::post().to(handlers::vote))
            .route("/suggestions/{id}/reactions", web::post().to(handlers::react))
            .route("/suggestions/{id}/comments", web::post().to(handlers::comment))
            .route("/suggestions/{id}/report", web::post().to(handlers::report))
            .route("/suggestions/{id}/status", web::put().to(handlers::update_status))
            .route("/suggestions/{id}/moderation", web::post().to(handlers::moderate))
            // Read views
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/leaderboard", web::get().to(handlers::leaderboard))
            .route("/analytics", web::get().to(handlers::analytics))
            .route("/moderation", web::get().to(handlers::moderation_board))
            .route("/moderation/logs", web::get().to(handlers::moderation_logs))
            .route("/navigate", web::get().to(handlers::navigate))
            .route("/export.json", web::get().to(handlers::export_json))
            .route("/export.csv", web::get().to(handlers::export_csv))
            // Forms
            .route("/challenge", web::get().to(handlers::challenge))
            .route("/draft", web::get().to(handlers::get_draft))
            .route("/draft", web::put().to(handlers::save_draft))
            .route("/draft", web::delete().to(handlers::clear_draft))
            // Session
            .route("/auth/me", web::get().to(handlers::me))
            .route("/auth/login", web::post().to(handlers::login))
            .route("/auth/signup", web::post().to(handlers::signup))
            .route("/auth/logout", web::post().to(handlers::logout))
            .route("/auth/profile", web::put().to(handlers::update_profile))
            .route("/admin/enable", web::post().to(handlers::enable_admin))
            .route("/admin/disable", web::post().to(handlers::disable_admin))
            // Preferences
            .route("/theme", web::get().to(handlers::get_theme))
            .route("/theme", web::put().to(handlers::set_theme))
            .route("/theme/toggle", web::post().to(handlers::toggle_theme)),
    );
}
