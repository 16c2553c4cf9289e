// Route table for the Kiln API.

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::{handlers, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/execute", post(handlers::execute))
        .route("/generate", post(handlers::generate))
        .route("/status", get(handlers::health_check))
}
