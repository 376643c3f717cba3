// src/format.rs
//! Turns a bot's plain-text reply into HTML.
//!
//! Non-blank lines become paragraphs, `**bold**` spans become `<strong>`,
//! and runs of `1. item` lines are grouped into a single `<ol>`. Text is
//! always escaped; the only raw markup in the output is the tags emitted here.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

static LIST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.\s").expect("list prefix pattern is valid"));

/// A run of inline text. Content is raw, escaping happens at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Consecutive list lines. Numbering is left to the `<ol>`.
    List(Vec<Vec<Inline>>),
}

enum Line {
    Paragraph(Vec<Inline>),
    Item(Vec<Inline>),
}

/// Split a reply into blocks, merging adjacent list items into one list.
pub fn parse(text: &str) -> Vec<Block> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(classify)
        .fold(Vec::new(), |mut blocks, line| {
            match line {
                Line::Item(item) => match blocks.last_mut() {
                    Some(Block::List(items)) => items.push(item),
                    _ => blocks.push(Block::List(vec![item])),
                },
                Line::Paragraph(spans) => blocks.push(Block::Paragraph(spans)),
            }
            blocks
        })
}

fn classify(line: &str) -> Line {
    // The prefix never contains `*`, so stripping it first leaves bold matches unchanged.
    match LIST_PREFIX.find(line) {
        Some(prefix) => Line::Item(inlines(&line[prefix.end()..])),
        None => Line::Paragraph(inlines(line)),
    }
}

fn inlines(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = 0;

    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > rest {
            spans.push(Inline::Text(line[rest..whole.start()].to_string()));
        }
        spans.push(Inline::Bold(inner.as_str().to_string()));
        rest = whole.end();
    }

    if rest < line.len() {
        spans.push(Inline::Text(line[rest..].to_string()));
    }
    spans
}

pub fn render(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(spans) => {
                html.push_str("<p>");
                push_inlines(&mut html, spans);
                html.push_str("</p>");
            }
            Block::List(items) => {
                html.push_str("<ol>");
                for item in items {
                    html.push_str("<li>");
                    push_inlines(&mut html, item);
                    html.push_str("</li>");
                }
                html.push_str("</ol>");
            }
        }
    }
    html
}

fn push_inlines(html: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text(text) => html.push_str(&html_escape::encode_text(text)),
            Inline::Bold(text) => {
                html.push_str("<strong>");
                html.push_str(&html_escape::encode_text(text));
                html.push_str("</strong>");
            }
        }
    }
}

/// Format a bot reply for insertion into the conversation view.
pub fn format_bot_response(text: &str) -> String {
    render(&parse(text))
}
