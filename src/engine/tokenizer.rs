//! Format spec tokenizer.
//!
//! Splits a spec into literal runs and directive tokens:
//!
//! - `%%` is a literal `%`.
//! - `%` followed by text matching the dialect's identifier grammar is a
//!   directive; the grammar is anchored and matched greedily.
//! - Anything else after `%` is an error. A `%{` with no closing brace is
//!   reported separately so the message points at the real problem.

use crate::CompileError;
use crate::dialects::DELIMITER;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Literal(&'a str),
    Directive {
        text: &'a str,
        /// Byte offset of the delimiter in the spec.
        position: usize,
    },
}

pub(crate) fn tokenize<'a>(spec: &'a str, grammar: &Regex) -> Result<Vec<Token<'a>>, CompileError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = spec[pos..].find(DELIMITER) {
        let at = pos + offset;
        if at > pos {
            tokens.push(Token::Literal(&spec[pos..at]));
        }

        let rest = &spec[at + DELIMITER.len_utf8()..];
        if rest.starts_with(DELIMITER) {
            tokens.push(Token::Literal(&spec[at..at + DELIMITER.len_utf8()]));
            pos = at + 2 * DELIMITER.len_utf8();
            continue;
        }

        match grammar.find(rest) {
            Some(m) if m.start() == 0 && !m.is_empty() => {
                tokens.push(Token::Directive { text: m.as_str(), position: at });
                pos = at + DELIMITER.len_utf8() + m.end();
            }
            _ => return Err(invalid_directive(rest, at)),
        }
    }

    if pos < spec.len() {
        tokens.push(Token::Literal(&spec[pos..]));
    }
    Ok(tokens)
}

fn invalid_directive(rest: &str, position: usize) -> CompileError {
    if rest.starts_with('{') {
        return match rest.find('}') {
            None => CompileError::UnterminatedBrace { position, text: rest.to_string() },
            Some(close) => {
                // Include the suffix letter, if any, so the message shows the whole token.
                let end = rest[close + 1..].chars().next().map_or(close + 1, |c| close + 1 + c.len_utf8());
                CompileError::InvalidDirective { position, text: rest[..end].to_string() }
            }
        };
    }

    let text = rest.chars().next().map(String::from).unwrap_or_default();
    CompileError::InvalidDirective { position, text }
}
