//! Response extraction and text cleanup
//!
//! The cleanup is a readability heuristic for prose returned by the
//! assistant, not a markdown formatter. Whitespace is collapsed first and
//! every break inserted afterwards replaces exactly one space of the
//! collapsed text, so cleaning already-cleaned text changes nothing.

use lazy_static::lazy_static;
use ra_llm::{MessageContent, MessageRole, ThreadMessage};
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NUMBERED_MARKER: Regex = Regex::new(r"^\d+\.$").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

const BULLET_MARKERS: &[&str] = &["•", "-", "*"];

/// Tokens ending in a period that do not close a sentence
const ABBREVIATIONS: &[&str] = &["e.g.", "i.e.", "etc.", "vs.", "cf."];

fn is_list_marker(token: &str) -> bool {
    BULLET_MARKERS.contains(&token) || NUMBERED_MARKER.is_match(token)
}

fn ends_sentence(token: &str) -> bool {
    token.ends_with('.')
        && !NUMBERED_MARKER.is_match(token)
        && !ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

/// Normalize whitespace and re-insert paragraph and list breaks.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let collapsed = collapsed.trim();
    if collapsed.is_empty() {
        return String::new();
    }

    let tokens: Vec<&str> = collapsed.split(' ').collect();
    let mut out = String::with_capacity(collapsed.len() + tokens.len() / 4);
    out.push_str(tokens[0]);

    for pair in tokens.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let separator = if is_list_marker(next) {
            "\n"
        } else if ends_sentence(prev) {
            "\n\n"
        } else {
            " "
        };
        out.push_str(separator);
        out.push_str(next);
    }

    EXCESS_NEWLINES.replace_all(&out, "\n\n").into_owned()
}

/// Render one message: text blocks cleaned, other blocks as a type tag,
/// blocks separated by a blank line.
pub fn render_message(message: &ThreadMessage) -> String {
    message
        .content
        .iter()
        .map(|block| match block {
            MessageContent::Text(text) => clean_text(text),
            MessageContent::Other { kind } => format!("[{} content]", kind.to_uppercase()),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Newest assistant message rendered for display. `messages` is newest first.
pub fn extract_response(messages: &[ThreadMessage]) -> Option<String> {
    let message = messages.iter().find(|m| m.role == MessageRole::Assistant)?;
    let rendered = render_message(message);
    if rendered.trim().is_empty() {
        None
    } else {
        Some(rendered)
    }
}
