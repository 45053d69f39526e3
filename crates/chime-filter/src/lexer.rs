// lexer.rs — Tokenizer for the filter expression language.
//
// Tokens carry the byte offset they start at so the parser can point error
// messages at the offending spot in the source text.

use crate::error::FilterError;

/// One lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier: `build`, `status`, `SUCCESS`, `in`, ...
    Ident(String),
    /// Quoted string literal (quotes stripped).
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `!`
    Not,
    /// `&&`
    And,
    /// `||`
    Or,
}

/// A token plus the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Tokenize the whole source text.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, FilterError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'(' => {
                tokens.push(Spanned { token: Token::LParen, pos: start });
                i += 1;
            }
            b')' => {
                tokens.push(Spanned { token: Token::RParen, pos: start });
                i += 1;
            }
            b'[' => {
                tokens.push(Spanned { token: Token::LBracket, pos: start });
                i += 1;
            }
            b']' => {
                tokens.push(Spanned { token: Token::RBracket, pos: start });
                i += 1;
            }
            b',' => {
                tokens.push(Spanned { token: Token::Comma, pos: start });
                i += 1;
            }
            b'.' => {
                tokens.push(Spanned { token: Token::Dot, pos: start });
                i += 1;
            }
            b'=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::Eq, pos: start });
                    i += 2;
                } else {
                    return Err(FilterError::Syntax {
                        pos: start,
                        message: "expected '==' (single '=' is not an operator)".to_string(),
                    });
                }
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::Ne, pos: start });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Not, pos: start });
                    i += 1;
                }
            }
            b'&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Spanned { token: Token::And, pos: start });
                    i += 2;
                } else {
                    return Err(FilterError::Syntax {
                        pos: start,
                        message: "expected '&&'".to_string(),
                    });
                }
            }
            b'|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Spanned { token: Token::Or, pos: start });
                    i += 2;
                } else {
                    return Err(FilterError::Syntax {
                        pos: start,
                        message: "expected '||'".to_string(),
                    });
                }
            }
            b'"' | b'\'' => {
                let quote = c;
                i += 1;
                let content_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(FilterError::Syntax {
                        pos: start,
                        message: "unterminated string literal".to_string(),
                    });
                }
                let text = source[content_start..i].to_string();
                tokens.push(Spanned { token: Token::Str(text), pos: start });
                i += 1;
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(source[start..i].to_string()),
                    pos: start,
                });
            }
            _ => {
                return Err(FilterError::Syntax {
                    pos: start,
                    message: format!("unexpected character '{}'", c as char),
                });
            }
        }
    }

    Ok(tokens)
}
