//! Token grammar codec.
//!
//! # Grammar
//! ```text
//! token   := id ('&' pair)*
//! pair    := key ('=' value)?
//! value   := plain | "'" complex "'"
//! plain   := any chars except '&'
//! complex := any chars including '&' and '=' up to the next "'"
//! ```
//!
//! # Design Decisions
//! - One left-to-right pass over the input, no backtracking
//! - Empty keys are dropped
//! - A quote opens a complex value only as the first character of the value
//! - Unterminated quotes are tolerated; the remaining text becomes the value
//! - Characters between a closing quote and the next `&` are discarded

use crate::token::types::Token;

/// Characters that force a value to be wrapped in quotes when serialized.
const QUOTED_CHARS: [char; 6] = ['&', '=', ' ', ':', '#', '?'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Id,
    Key,
    Value,
    ComplexValue,
    ParsedComplexValue,
}

/// Parse a raw history string into a [`Token`].
pub fn parse(raw: &str) -> Token {
    let mut token = Token::default();
    let mut buffer = String::new();
    let mut current_key: Option<String> = None;
    let mut state = ParseState::Id;

    for ch in raw.chars() {
        match state {
            ParseState::Id => {
                if ch == '&' {
                    token.set_id(std::mem::take(&mut buffer));
                    state = ParseState::Key;
                } else {
                    buffer.push(ch);
                }
            }
            ParseState::Key => match ch {
                '=' => {
                    current_key = take_key(&mut buffer);
                    if let Some(key) = &current_key {
                        token.set_parameter(key.clone(), "");
                    }
                    state = ParseState::Value;
                }
                '&' => {
                    if let Some(key) = take_key(&mut buffer) {
                        token.set_parameter(key, "");
                    }
                }
                _ => buffer.push(ch),
            },
            ParseState::Value => match ch {
                '\'' if buffer.is_empty() => state = ParseState::ComplexValue,
                '&' => {
                    let value = std::mem::take(&mut buffer);
                    if let Some(key) = current_key.take() {
                        token.set_parameter(key, value);
                    }
                    state = ParseState::Key;
                }
                _ => buffer.push(ch),
            },
            ParseState::ComplexValue => {
                if ch == '\'' {
                    let value = std::mem::take(&mut buffer);
                    if let Some(key) = current_key.take() {
                        token.set_parameter(key, value);
                    }
                    state = ParseState::ParsedComplexValue;
                } else {
                    buffer.push(ch);
                }
            }
            ParseState::ParsedComplexValue => {
                if ch == '&' {
                    state = ParseState::Key;
                }
            }
        }
    }

    match state {
        ParseState::Id => token.set_id(buffer),
        ParseState::Key => {
            if let Some(key) = take_key(&mut buffer) {
                token.set_parameter(key, "");
            }
        }
        ParseState::Value | ParseState::ComplexValue => {
            if let (Some(key), false) = (current_key, buffer.is_empty()) {
                token.set_parameter(key, buffer);
            }
        }
        ParseState::ParsedComplexValue => {}
    }

    token
}

/// Parse a possibly absent history string. `None` yields an empty token.
pub fn parse_opt(raw: Option<&str>) -> Token {
    raw.map(parse).unwrap_or_default()
}

/// Serialize a token into its canonical history string.
pub fn serialize(token: &Token) -> String {
    let mut out = String::from(token.id());
    for (key, value) in token.parameters() {
        out.push('&');
        out.push_str(key);
        if value.is_empty() {
            continue;
        }
        out.push('=');
        if value.contains(QUOTED_CHARS) {
            out.push('\'');
            out.push_str(value);
            out.push('\'');
        } else {
            out.push_str(value);
        }
    }
    out
}

fn take_key(buffer: &mut String) -> Option<String> {
    let key = std::mem::take(buffer);
    (!key.is_empty()).then_some(key)
}

/// Creates tokens from raw history strings.
///
/// The engine goes through this seam so hosts can plug in a different token layout.
pub trait TokenFactory: Send + Sync {
    fn create_token(&self, raw: Option<&str>) -> Token;
}

/// Factory using the standard grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenFactory;

impl TokenFactory for DefaultTokenFactory {
    fn create_token(&self, raw: Option<&str>) -> Token {
        parse_opt(raw)
    }
}
