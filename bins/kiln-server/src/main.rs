mod generate;
mod handlers;
mod routes;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use kiln_engine::{Engine, EngineConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use generate::CodeGenerator;

pub struct AppState {
    pub engine: Engine,
    pub generator: Option<CodeGenerator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Kiln server booting...");

    let scratch_root: PathBuf = std::env::var("KILN_SCRATCH_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("kiln"));

    let timeout_ms: u64 = std::env::var("KILN_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000);

    let config = EngineConfig::new(&scratch_root)
        .with_run_timeout(Duration::from_millis(timeout_ms));
    let engine = Engine::new(config).context("Failed to prepare scratch directory")?;
    info!(
        scratch_dir = %scratch_root.display(),
        timeout_ms,
        "Execution engine ready"
    );

    let generator = CodeGenerator::from_env();
    match &generator {
        Some(g) => info!(model = %g.model(), "Code generation enabled"),
        None => info!("GEMINI_API_KEY not set, code generation disabled"),
    }

    let state = Arc::new(AppState { engine, generator });

    // Single-origin CORS for the playground frontend.
    let allowed_origin = std::env::var("KILN_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let cors = CorsLayer::new()
        .allow_origin(
            allowed_origin
                .parse::<HeaderValue>()
                .context("Invalid KILN_ALLOWED_ORIGIN")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .merge(routes::routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr = std::env::var("KILN_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on {}", addr);
    info!("Ready to accept requests");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
