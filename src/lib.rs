// src/lib.rs
//! Server-side chat widget.
//!
//! Collects visitor messages, relays them to a chat backend over HTTP and
//! returns ready-to-insert HTML, with bot replies run through [`format`].

pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;
pub mod transcript;
pub mod transport;

pub use conversation::{Conversation, Exchange, Identity, ValidationError};
pub use format::format_bot_response;
pub use transport::{HttpTransport, Transport, TransportError};
