// src/transport.rs
//! HTTP access to the chat backend.

use std::future::Future;

use reqwest::header::{COOKIE, SET_COOKIE};
use thiserror::Error;
use url::Url;

use crate::message::{ChatRequest, ChatResponse, LanguageChatRequest};

const SESSION_COOKIE: &str = "session_id";

/// Network, URL or decoding failure. The backend's own `error` field is not one of these.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decoded backend reply along with whether the status was 2xx.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub ok: bool,
    pub body: ChatResponse,
}

pub trait Transport: Send + Sync {
    fn welcome(&self) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    fn chat_in_language(
        &self,
        request: &LanguageChatRequest,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(base_url)?;
        // `join` drops the last path segment unless the base ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn read_reply(response: reqwest::Response) -> Result<Reply, TransportError> {
        let ok = response.status().is_success();
        let cookie_session = session_from_cookies(&response);
        // Valid JSON that is not an object carries no reply fields at all.
        let mut body = match response.json::<serde_json::Value>().await? {
            value @ serde_json::Value::Object(_) => serde_json::from_value::<ChatResponse>(value)?,
            _ => ChatResponse::default(),
        };
        if body.session_id.is_none() {
            body.session_id = cookie_session;
        }
        Ok(Reply { ok, body })
    }
}

impl Transport for HttpTransport {
    async fn welcome(&self) -> Result<Reply, TransportError> {
        let url = self.url("welcome")?;
        tracing::debug!(%url, "requesting welcome message");
        let response = self.http.get(url).send().await?;
        Self::read_reply(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<Reply, TransportError> {
        let url = self.url("chat")?;
        tracing::debug!(%url, has_session = request.session_id.is_some(), "posting chat message");
        let mut builder = self.http.post(url).json(request);
        if let Some(session_id) = &request.session_id {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={session_id}"));
        }
        let response = builder.send().await?;
        Self::read_reply(response).await
    }

    async fn chat_in_language(
        &self,
        request: &LanguageChatRequest,
    ) -> Result<Reply, TransportError> {
        let url = self.url("chat")?;
        tracing::debug!(%url, language = %request.language, "posting chat message");
        let response = self.http.post(url).json(request).send().await?;
        Self::read_reply(response).await
    }
}

fn session_from_cookies(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim();
            let (name, value) = pair.split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}
