//! Defensive parsing of untrusted model output.
//!
//! Model text is tried as-is (after stripping Markdown code fences), then the
//! first `{...}` span is extracted and tried again. Anything else is a miss.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;

fn object_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Strip Markdown code fences (```json ... ``` or ``` ... ```) if present.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }
    let after_open = match text.find('\n') {
        Some(nl) => &text[nl + 1..],
        None => return text,
    };
    match after_open.rfind("```") {
        Some(close) => after_open[..close].trim(),
        None => after_open.trim(),
    }
}

/// Extract the outermost `{...}` span of `text`, if any.
pub fn extract_object(text: &str) -> Option<&str> {
    object_span().find(text).map(|m| m.as_str())
}

/// Parse `raw` into `T`: direct parse, then brace extraction, then `None`.
pub fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let body = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }
    extract_object(body).and_then(|span| serde_json::from_str(span).ok())
}

/// Shorten `s` for use in log lines and error messages.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
