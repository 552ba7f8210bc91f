mod config;
mod db;
mod provider;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use provider::SupabaseClient;
use services::recipe::PgRecipeStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");
    tracing::info!(max_connections = config.db_max_connections, "database ready");

    let provider = Arc::new(SupabaseClient::new(&config).expect("provider client init failed"));
    tracing::info!(provider = %config.provider_url, bucket = %config.storage_bucket, "provider client initialized");

    let store = Arc::new(PgRecipeStore::new(pool));
    if config.seed_sample_recipes {
        if let Err(e) = services::seed::seed_if_empty(store.as_ref()).await {
            tracing::warn!(error = %e, "sample recipe seeding failed");
        }
    }

    let state = state::AppState::new(config, store, provider.clone(), provider);

    // Spawn background session cache sweeper.
    let _purge = services::session::spawn_purge_task(state.sessions.clone());

    let app = routes::app(state).expect("router init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "recipe server listening");
    axum::serve(listener, app).await.expect("server failed");
}
