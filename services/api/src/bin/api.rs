//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileTestStore, InMemoryTestStore, OpenAiCompletionAdapter},
    config::{Config, StoreKind},
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::Router;
use quiz_core::{
    generator::{Generator, RetryPolicy},
    ports::TestStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Set Up the Test Store ---
    let store: Arc<dyn TestStore> = match config.store {
        StoreKind::File => {
            let file_store = FileTestStore::new(config.tests_dir.clone());
            file_store.ensure_dir().await?;
            Arc::new(file_store)
        }
        StoreKind::Memory => {
            warn!("Using the in-memory test store; tests are lost on restart.");
            Arc::new(InMemoryTestStore::new())
        }
    };

    // --- 3. Initialize the Completion Adapter & Generator ---
    let completion = Arc::new(OpenAiCompletionAdapter::from_credentials(
        &config.llm_api_key,
        &config.llm_api_base,
        config.llm_model.clone(),
    ));
    info!("Using model {} at {}", config.llm_model, config.llm_api_base);
    let generator = Generator::new(
        completion,
        RetryPolicy {
            max_attempts: config.max_attempts,
            delay: config.retry_delay,
        },
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, generator));

    // --- 5. Create the Web Router ---
    let public_dir = config
        .public_dir
        .is_dir()
        .then_some(config.public_dir.as_path());
    if public_dir.is_none() {
        warn!(
            "Static directory {} not found; serving the API only.",
            config.public_dir.display()
        );
    }

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(build_router(app_state, public_dir));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
