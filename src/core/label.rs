// src/core/label.rs
//! Link label grammar.
//!
//! ```text
//! label  := name sep+ marker close*
//! marker := one letter or digit
//! sep    := whitespace | - – — : , | / ( ) [ ]
//! close  := ) | ]
//! ```
//!
//! `"Full score 1"`, `"Full score - 2"` and `"Full score (3)"` all give the
//! name `"Full score"`. A label with no separator before its last character
//! (`"Reel"`, `"7"`) or ending in something other than a letter or digit has
//! no difficulty and keeps the whole text as its name.

use super::sanitize::normalize_ws;
use crate::data::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub difficulty: Option<Difficulty>,
}

fn is_sep(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | ',' | '|' | '/' | '(' | ')' | '[' | ']')
}

// Closing brackets may belong to the name ("Reel (trad.) 2")
fn is_trailing_sep(c: char) -> bool {
    is_sep(c) && !matches!(c, ')' | ']')
}

pub fn parse_label(raw: &str) -> Label {
    let text = normalize_ws(raw);
    let body = text.trim_end_matches([')', ']']).trim_end();

    let mut rev = body.char_indices().rev();
    if let (Some((i, marker)), Some((_, before))) = (rev.next(), rev.next()) {
        if is_sep(before) {
            if let Ok(d) = Difficulty::new(marker) {
                let name = body[..i].trim_end_matches(is_trailing_sep);
                return Label { name: s!(name), difficulty: Some(d) };
            }
        }
    }

    Label { name: text, difficulty: None }
}
