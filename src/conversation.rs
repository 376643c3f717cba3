// src/conversation.rs
//! One visitor's exchange with the chat backend.
//!
//! A [`Conversation`] owns the backend session id it was issued, so any number
//! of them can run side by side. Failures never escape as errors: they come
//! back as [`Entry::Error`] ready to be shown, except for validation, which
//! stops the exchange before anything is sent.

use thiserror::Error;

use crate::message::{ChatRequest, LanguageChatRequest};
use crate::transcript::Entry;
use crate::transport::{Reply, Transport};

pub const FALLBACK_ERROR: &str = "Something went wrong!";
pub const CONNECTION_ERROR: &str = "Could not connect to the server. Please check your network.";
pub const NO_REPLY: &str = "⚠️ No reply received from bot.";
pub const PROCESSING_ERROR: &str = "⚠️ An error occurred while processing your message.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please describe your issue or ask a question.")]
    EmptyMessage,

    #[error("Please enter your name, age, and gender to start the chat.")]
    MissingIdentity,
}

/// Visitor details, required before the first message of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub age: String,
    pub gender: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, age: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            gender: gender.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.age.is_empty() && !self.gender.is_empty()
    }
}

/// The visitor's message and the reply it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: Entry,
    pub reply: Entry,
}

#[derive(Debug, Clone)]
pub struct Conversation<T> {
    transport: T,
    session_id: Option<String>,
}

impl<T: Transport> Conversation<T> {
    pub fn new(transport: T) -> Self {
        Self::resume(transport, None)
    }

    /// Pick up a conversation the backend already knows about.
    pub fn resume(transport: T, session_id: Option<String>) -> Self {
        Self { transport, session_id }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate input and build the backend request.
    ///
    /// Identity is only checked and attached while no session id is known.
    pub fn prepare(&self, message: &str, identity: &Identity) -> Result<ChatRequest, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let mut request = ChatRequest {
            message: message.to_string(),
            session_id: self.session_id.clone(),
            ..Default::default()
        };

        if self.session_id.is_none() {
            if !identity.is_complete() {
                return Err(ValidationError::MissingIdentity);
            }
            request.name = Some(identity.name.clone());
            request.age = Some(identity.age.clone());
            request.gender = Some(identity.gender.clone());
        }

        Ok(request)
    }

    /// Send a prepared request and turn the outcome into a displayable entry.
    pub async fn dispatch(&mut self, request: ChatRequest) -> Entry {
        match self.transport.chat(&request).await {
            Ok(reply) => {
                let (entry, session_id) = bot_entry(reply);
                if let Some(session_id) = session_id {
                    tracing::debug!(%session_id, "backend session established");
                    self.session_id = Some(session_id);
                }
                entry
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat backend unreachable");
                Entry::Error(CONNECTION_ERROR.to_string())
            }
        }
    }

    /// Validate, send, and return both sides of the exchange.
    pub async fn send(&mut self, message: &str, identity: &Identity) -> Result<Exchange, ValidationError> {
        let request = self.prepare(message, identity)?;
        let user = Entry::User(request.message.clone());
        let reply = self.dispatch(request).await;
        Ok(Exchange { user, reply })
    }

    pub async fn welcome(&self) -> Entry {
        match self.transport.welcome().await {
            Ok(reply) => bot_entry(reply).0,
            Err(err) => {
                tracing::warn!(error = %err, "welcome request failed");
                Entry::Error(CONNECTION_ERROR.to_string())
            }
        }
    }

    /// Language-aware variant. The reply is shown as plain text whatever the status.
    ///
    /// Callers skip empty messages; this does not validate.
    pub async fn ask(&self, message: &str, language: &str) -> Entry {
        let request = LanguageChatRequest {
            message: message.to_string(),
            language: language.to_string(),
        };
        match self.transport.chat_in_language(&request).await {
            Ok(reply) => Entry::BotText(
                reply
                    .body
                    .response
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| NO_REPLY.to_string()),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "chat backend unreachable");
                Entry::BotText(PROCESSING_ERROR.to_string())
            }
        }
    }
}

fn bot_entry(reply: Reply) -> (Entry, Option<String>) {
    let body = reply.body;
    match body.response.filter(|text| reply.ok && !text.is_empty()) {
        Some(text) => (
            Entry::Bot(text),
            body.session_id.filter(|id| !id.is_empty()),
        ),
        None => (
            Entry::Error(
                body.error
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            ),
            None,
        ),
    }
}
