// src/core/sanitize.rs

/// Collapse whitespace runs (incl. NBSP) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// First line that has any visible text, normalized.
pub fn first_line(s: &str) -> String {
    s.lines()
        .map(normalize_ws)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
}

/// Make a user-supplied stem safe as a file name: alphanumerics, `-`, `_`;
/// whitespace runs become a single `_`. Falls back to `fallback` if nothing is left.
pub fn sanitize_file_stem(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}
