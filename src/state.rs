// src/state.rs
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::conversation::Conversation;
use crate::error::AppError;
use crate::services::session_manager::SessionManager;
use crate::transport::HttpTransport;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub transport: HttpTransport,
}

impl AppState {
    pub fn new(config: &WidgetConfig) -> Result<Self, AppError> {
        Ok(Self {
            sessions: SessionManager::new(config.session_ttl),
            transport: HttpTransport::new(&config.backend_url)?,
        })
    }

    /// Rebuild the conversation for a widget session from its stored backend session id.
    pub async fn conversation(&self, widget_id: &str) -> Conversation<HttpTransport> {
        let upstream = self.sessions.upstream_session(widget_id).await;
        Conversation::resume(self.transport.clone(), upstream)
    }
}
