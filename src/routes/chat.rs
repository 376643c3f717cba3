// src/routes/chat.rs
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};

use crate::{
    conversation::Identity,
    error::AppError,
    message::{AskRequest, SendRequest, WidgetQuery, WidgetResponse},
    state::SharedState,
    transcript::Entry,
};

async fn resolve_widget(state: &SharedState, requested: Option<&str>) -> String {
    match requested {
        Some(id) if !id.trim().is_empty() => state.sessions.ensure_session(id).await,
        _ => state.sessions.create_session().await,
    }
}

pub async fn welcome_handler(
    State(state): State<SharedState>,
    Query(query): Query<WidgetQuery>,
) -> Json<WidgetResponse> {
    let widget_id = resolve_widget(&state, query.widget_id.as_deref()).await;

    let entry = state.conversation(&widget_id).await.welcome().await;
    let html = entry.render();
    state.sessions.append_entry(&widget_id, entry).await;

    Json(WidgetResponse { widget_id, html })
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SendRequest>,
) -> Result<Json<WidgetResponse>, AppError> {
    let widget_id = resolve_widget(&state, payload.widget_id.as_deref()).await;
    let mut conversation = state.conversation(&widget_id).await;

    let identity = Identity::new(payload.name, payload.age, payload.gender);
    let request = conversation.prepare(&payload.message, &identity)?;

    // Show the visitor's message before the backend answers.
    let user = Entry::User(request.message.clone());
    let mut html = user.render();
    state.sessions.append_entry(&widget_id, user).await;

    let reply = conversation.dispatch(request).await;
    html.push_str(&reply.render());
    tracing::info!(
        %widget_id,
        failed = matches!(reply, Entry::Error(_)),
        "chat exchange complete"
    );
    state.sessions.append_entry(&widget_id, reply).await;

    if let Some(upstream) = conversation.session_id() {
        state
            .sessions
            .set_upstream_session(&widget_id, Some(upstream.to_string()))
            .await;
    }

    Ok(Json(WidgetResponse { widget_id, html }))
}

pub async fn ask_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AskRequest>,
) -> Json<WidgetResponse> {
    let widget_id = resolve_widget(&state, payload.widget_id.as_deref()).await;

    let message = payload.message.trim();
    if message.is_empty() {
        return Json(WidgetResponse {
            widget_id,
            html: String::new(),
        });
    }

    let user = Entry::UserText(message.to_string());
    let mut html = user.render();
    state.sessions.append_entry(&widget_id, user).await;
    let placeholder = state.sessions.append_entry(&widget_id, Entry::Typing).await;

    let reply = state
        .conversation(&widget_id)
        .await
        .ask(message, &payload.language)
        .await;
    html.push_str(&reply.render());
    tracing::info!(%widget_id, language = %payload.language, "language exchange complete");
    state
        .sessions
        .replace_entry(&widget_id, placeholder, reply)
        .await;

    Json(WidgetResponse { widget_id, html })
}

pub async fn transcript_handler(
    State(state): State<SharedState>,
    Path(widget_id): Path<String>,
) -> Result<Html<String>, AppError> {
    state
        .sessions
        .render_transcript(&widget_id)
        .await
        .map(Html)
        .ok_or_else(|| AppError::NotFound(format!("Unknown widget session: {widget_id}")))
}
