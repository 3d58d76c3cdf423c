use std::sync::Arc;

use axum::{extract::Request, ServiceExt};

mod config;
mod db;
mod dto;
mod emotion;
mod error;
mod handlers;
mod models;
mod router;
mod services;
mod store;

use config::Config;
use services::emotion_analyzer::EmotionAnalyzer;
use services::image_generator::{self, ImageGenerator};
use services::FlowerOrchestrator;
use store::{DiaryStore, MemoryStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DiaryStore>,
    pub config: Arc<Config>,
    pub orchestrator: FlowerOrchestrator,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flower_diary_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Persistence
    let store: Arc<dyn DiaryStore> = match &config.database_url {
        Some(url) => {
            let db = db::create_pool(url).await;
            db::run_migrations(&db).await;
            Arc::new(PgStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    // Image generation
    let generator: Arc<dyn ImageGenerator> = match image_generator::create_generator(&config) {
        Ok(generator) => Arc::from(generator),
        Err(e) => panic!("Failed to configure image generator: {}", e),
    };
    let analyzer = Arc::new(EmotionAnalyzer::from_config(&config));
    tracing::info!(
        image_provider = generator.provider_name(),
        emotion_analyzer = analyzer.name(),
        timeout_secs = config.image_timeout_secs,
        "Flower generation configured"
    );

    let orchestrator = FlowerOrchestrator::new(
        store.clone(),
        generator,
        analyzer,
        config.image_timeout(),
    );

    let state = AppState {
        store,
        config: config.clone(),
        orchestrator,
    };

    let app = router::build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .expect("Server error");
}
