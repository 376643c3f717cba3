// src/transcript.rs
use crate::format::format_bot_response;

/// One message in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// What the visitor typed, shown as plain text.
    User(String),
    /// What the visitor typed, shown bare without the sender label.
    UserText(String),
    /// A bot reply, run through the formatter.
    Bot(String),
    /// A bot reply shown verbatim as plain text.
    BotText(String),
    /// Placeholder while a reply is outstanding.
    Typing,
    Error(String),
}

impl Entry {
    pub fn render(&self) -> String {
        match self {
            Entry::User(text) => format!(
                r#"<div class="user-msg"><strong>👨 You</strong><p>{}</p></div>"#,
                html_escape::encode_text(text)
            ),
            Entry::UserText(text) => format!(
                r#"<div class="user-msg">{}</div>"#,
                html_escape::encode_text(text)
            ),
            Entry::Bot(text) => format!(
                r#"<div class="bot-msg"><strong>🤖 Bot</strong><div class="bot-response-content">{}</div></div>"#,
                format_bot_response(text)
            ),
            Entry::BotText(text) => format!(
                r#"<div class="bot-msg">{}</div>"#,
                html_escape::encode_text(text)
            ),
            Entry::Typing => r#"<div class="bot-msg">🤖 Typing...</div>"#.to_string(),
            Entry::Error(text) => format!(
                r#"<div class="bot-msg error"><strong>Error:</strong><p>{}</p></div>"#,
                html_escape::encode_text(text)
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Overwrite the entry at `index`. Returns false if there is none.
    pub fn replace(&mut self, index: usize, entry: Entry) -> bool {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries.iter().map(Entry::render).collect()
    }
}
