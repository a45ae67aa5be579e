//! Shallow syntactic checks for generated file content.
//!
//! `.json` content is fully parsed. Everything else gets a lexical bracket
//! balance scan that skips quoted spans. This catches truncated or
//! corrupted model output, not semantic errors.

use std::fmt;

/// Why a piece of content failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// JSON content did not parse; carries the parser message.
    #[error("{0}")]
    InvalidJson(String),

    /// A closing bracket did not match the innermost open bracket.
    #[error("mismatched bracket: expected {expected}, found '{found}'")]
    Mismatched { expected: Expected, found: char },

    /// Brackets were still open at end of input.
    #[error("unbalanced brackets")]
    Unbalanced,
}

/// The closing bracket the scanner was waiting for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected(pub Option<char>);

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "'{}'", c),
            None => f.write_str("no closing bracket"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
    Backtick,
}

impl Quote {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Quote::Single),
            '"' => Some(Quote::Double),
            '`' => Some(Quote::Backtick),
            _ => None,
        }
    }

    fn closes_with(self, c: char) -> bool {
        matches!(
            (self, c),
            (Quote::Single, '\'') | (Quote::Double, '"') | (Quote::Backtick, '`')
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Normal,
    InQuote(Quote),
    AfterEscape(Quote),
}

fn closing_for(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        _ => None,
    }
}

fn is_closing(c: char) -> bool {
    matches!(c, ')' | '}' | ']')
}

/// Validate `content` using the file extension hint (`".json"`, `"ts"`, ...).
pub fn validate_content(content: &str, extension: &str) -> Result<(), ValidationError> {
    let ext = extension.trim_start_matches('.');
    if ext.eq_ignore_ascii_case("json") {
        return serde_json::from_str::<serde_json::Value>(content)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidJson(e.to_string()));
    }
    check_brackets(content)
}

/// Bracket balance scan with quote awareness.
pub fn check_brackets(content: &str) -> Result<(), ValidationError> {
    let mut stack: Vec<char> = Vec::new();
    let mut state = LexState::Normal;

    for c in content.chars() {
        state = match state {
            LexState::AfterEscape(q) => LexState::InQuote(q),
            LexState::InQuote(q) if c == '\\' => LexState::AfterEscape(q),
            LexState::InQuote(q) if q.closes_with(c) => LexState::Normal,
            LexState::InQuote(q) => LexState::InQuote(q),
            LexState::Normal => {
                if let Some(q) = Quote::from_char(c) {
                    LexState::InQuote(q)
                } else if let Some(close) = closing_for(c) {
                    stack.push(close);
                    LexState::Normal
                } else if is_closing(c) {
                    let expected = stack.pop();
                    if expected != Some(c) {
                        return Err(ValidationError::Mismatched {
                            expected: Expected(expected),
                            found: c,
                        });
                    }
                    LexState::Normal
                } else {
                    LexState::Normal
                }
            }
        };
    }

    if stack.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Unbalanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_valid_and_invalid() {
        assert!(validate_content("{\"a\":1}", ".json").is_ok());
        let err = validate_content("{\"a\":}", ".json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn extension_without_dot_and_uppercase() {
        assert!(validate_content("[1, 2]", "JSON").is_ok());
        assert!(validate_content("[1, 2", "json").is_err());
    }

    #[test]
    fn balanced_typescript_passes() {
        assert_eq!(
            validate_content("function f() { return [1,2]; }", ".ts"),
            Ok(())
        );
    }

    #[test]
    fn truncated_typescript_is_unbalanced() {
        assert_eq!(
            validate_content("function f() { return [1,2;", ".ts"),
            Err(ValidationError::Unbalanced)
        );
    }

    #[test]
    fn brace_inside_string_is_ignored() {
        assert!(validate_content("\"a string with } inside\"", ".ts").is_ok());
        assert!(validate_content("const s = 'x)';", ".tsx").is_ok());
        assert!(validate_content("const t = `${a} ]`;", ".ts").is_ok());
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        assert!(validate_content(r#"const s = "say \"}\" now";"#, ".ts").is_ok());
        assert!(validate_content(r"const s = 'it\'s ]';", ".ts").is_ok());
    }

    #[test]
    fn escape_resets_after_one_character() {
        // `\\` consumes one backslash, so the next quote closes the string.
        assert!(validate_content(r#"const s = "\\"; f()"#, ".ts").is_ok());
    }

    #[test]
    fn mismatch_names_expected_and_found() {
        let err = validate_content("call(a]", ".ts").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Mismatched {
                expected: Expected(Some(')')),
                found: ']'
            }
        );
        assert_eq!(
            err.to_string(),
            "mismatched bracket: expected ')', found ']'"
        );
    }

    #[test]
    fn stray_closing_bracket() {
        let err = validate_content("}", ".css").unwrap_err();
        assert_eq!(
            err.to_string(),
            "mismatched bracket: expected no closing bracket, found '}'"
        );
    }

    #[test]
    fn empty_content_passes_for_source_files() {
        assert!(validate_content("", ".tsx").is_ok());
        assert!(validate_content("", ".json").is_err());
    }
}
