mod auth;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod search;
mod state;
mod wipe;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::PgSessionStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::search::client::{JobSearchApi, SerpApiClient};
use crate::state::AppState;
use crate::wipe::RemoteNamespaces;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Saffron API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (sessions)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (per-user key-value namespaces)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO (per-user file namespaces)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let job_search: Option<Arc<dyn JobSearchApi>> = match &config.serpapi_api_key {
        Some(key) => {
            let client = SerpApiClient::new(key.clone(), config.serpapi_base_url.clone())?;
            info!("SerpAPI client initialized ({})", config.serpapi_base_url);
            Some(Arc::new(client))
        }
        None => {
            warn!("SERPAPI_API_KEY is not set; job search requests will fail");
            None
        }
    };

    let state = AppState {
        job_search,
        namespaces: Arc::new(RemoteNamespaces::new(s3, config.s3_bucket.clone(), redis)),
        sessions: Arc::new(PgSessionStore::new(db)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web app origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "saffron-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
