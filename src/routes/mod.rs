// src/routes/mod.rs
pub mod chat;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{ask_handler, chat_handler, transcript_handler, welcome_handler};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(static_dir: impl AsRef<Path>) -> Router<SharedState> {
    let widget_routes = Router::new()
        .route("/welcome", get(welcome_handler))
        .route("/chat", post(chat_handler))
        .route("/ask", post(ask_handler))
        .route("/transcript/{widget_id}", get(transcript_handler));

    Router::new()
        .nest("/widget", widget_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
}
