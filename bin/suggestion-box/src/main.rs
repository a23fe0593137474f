//! # Suggestion Box Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use secrecy::ExposeSecret;

use sb_api::{configure_routes, middleware, AppState};
use sb_config::Settings;
use sb_core::traits::{AuthProvider, Classifier, KeyValueStore};
use sb_core::SuggestionBox;

#[cfg(feature = "storage-local")]
use sb_storage_local::LocalKeyValueStore;

#[cfg(feature = "auth-simple")]
use sb_auth_simple::MockUserDirectory;

#[cfg(feature = "classify-gemini")]
use sb_classify_gemini::GeminiClassifier;

#[cfg(not(feature = "auth-simple"))]
compile_error!("an auth provider feature is required (auth-simple)");

#[cfg(feature = "storage-local")]
fn build_store(settings: &Settings) -> Arc<dyn KeyValueStore> {
    log::info!("Storing data under {}", settings.storage.data_dir.display());
    Arc::new(LocalKeyValueStore::new(settings.storage.data_dir.clone()))
}

#[cfg(not(feature = "storage-local"))]
fn build_store(_settings: &Settings) -> Arc<dyn KeyValueStore> {
    log::warn!("No storage plugin compiled in, data lives in memory only");
    Arc::new(sb_core::InMemoryStore::default())
}

#[cfg(feature = "auth-simple")]
fn build_auth(settings: &Settings) -> anyhow::Result<Arc<dyn AuthProvider>> {
    let directory = MockUserDirectory::new(
        settings.auth.admin_password.expose_secret(),
        Duration::from_millis(settings.auth.latency_ms),
    )
    .context("failed to initialise user directory")?;
    Ok(Arc::new(directory))
}

#[cfg(feature = "classify-gemini")]
fn build_classifier(settings: &Settings) -> anyhow::Result<Option<Arc<dyn Classifier>>> {
    let Some(api_key) = settings.classifier.api_key.as_ref() else {
        log::warn!("Classifier API key not set. AI features will be disabled.");
        return Ok(None);
    };
    let classifier = GeminiClassifier::new(
        secrecy::SecretString::from(api_key.expose_secret().to_string()),
        settings.classifier.model.clone(),
        settings.classifier.base_url.clone(),
        Duration::from_secs(settings.classifier.timeout_secs),
    )?;
    log::info!("Classifying with {}", settings.classifier.model);
    Ok(Some(Arc::new(classifier)))
}

#[cfg(not(feature = "classify-gemini"))]
fn build_classifier(_settings: &Settings) -> anyhow::Result<Option<Arc<dyn Classifier>>> {
    Ok(None)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Settings (.env, suggestion-box.toml, SB__* variables)
    let settings = Settings::load().context("failed to load settings")?;

    // 2. Plugins
    let store = build_store(&settings);
    let auth = build_auth(&settings)?;
    let classifier = build_classifier(&settings)?;

    // 3. Application context, read once from storage
    let app = SuggestionBox::load(store, auth, classifier).await;
    let state = web::Data::new(AppState::new(app));

    let (host, port) = settings.bind_addr();
    log::info!("🚀 Suggestion box starting on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::cors_policy())
            .wrap(middleware::standard_middleware())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {}:{}", host, port))?
    .run()
    .await?;

    Ok(())
}
