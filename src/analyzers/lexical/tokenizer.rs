use super::Dialect;
use crate::core::ParseError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifiers and keywords.
    Ident,
    Number,
    Str,
    Char,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
}

impl Token<'_> {
    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}

const TWO_CHAR_OPERATORS: &[&str] = &[
    "&&", "||", "==", "!=", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "->", "::", "<<", ">>",
];

/// Split `source` into tokens, dropping whitespace, comments and (for C)
/// preprocessor directives.
///
/// Fails on an unterminated block comment, string, character literal or
/// Java text block.
pub(crate) fn tokenize<'a>(
    source: &'a str,
    dialect: Dialect,
    path: &Path,
) -> Result<Vec<Token<'a>>, ParseError> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut at_line_start = true;

    while i < len {
        let b = bytes[i];
        if b == b'\n' {
            line += 1;
            at_line_start = true;
            i += 1;
            continue;
        }
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let starts_line = at_line_start;
        at_line_start = false;
        let next = bytes.get(i + 1).copied();

        if b == b'#' && starts_line && dialect == Dialect::C {
            while i < len && bytes[i] != b'\n' {
                if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'\n') {
                    line += 1;
                    i += 2;
                    continue;
                }
                i += 1;
            }
            continue;
        }

        if b == b'/' && next == Some(b'/') {
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        if b == b'/' && next == Some(b'*') {
            let start_line = line;
            let Some(offset) = source[i + 2..].find("*/") else {
                return Err(ParseError::at_line(
                    path,
                    start_line,
                    "unterminated block comment",
                ));
            };
            let end = i + 2 + offset + 2;
            line += count_newlines(&source[i..end]);
            i = end;
            continue;
        }

        if b == b'"' && dialect == Dialect::Java && source[i..].starts_with("\"\"\"") {
            let start_line = line;
            let Some(offset) = source[i + 3..].find("\"\"\"") else {
                return Err(ParseError::at_line(path, start_line, "unterminated text block"));
            };
            let end = i + 3 + offset + 3;
            tokens.push(Token {
                kind: TokenKind::Str,
                text: &source[i..end],
                line: start_line,
            });
            line += count_newlines(&source[i..end]);
            i = end;
            continue;
        }

        if b == b'"' || b == b'\'' {
            let (kind, what) = if b == b'"' {
                (TokenKind::Str, "unterminated string literal")
            } else {
                (TokenKind::Char, "unterminated character literal")
            };
            let start_line = line;
            let mut j = i + 1;
            loop {
                match bytes.get(j) {
                    None | Some(b'\n') => return Err(ParseError::at_line(path, start_line, what)),
                    Some(b'\\') => {
                        if bytes.get(j + 1) == Some(&b'\n') {
                            line += 1;
                        }
                        j += 2;
                    }
                    Some(&c) if c == b => break,
                    Some(_) => j += 1,
                }
            }
            tokens.push(Token {
                kind,
                text: &source[i..=j],
                line: start_line,
            });
            i = j + 1;
            continue;
        }

        if is_ident_start(b) {
            let start = i;
            while i < len && is_ident_continue(bytes[i]) {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                text: &source[start..i],
                line,
            });
            continue;
        }

        if b.is_ascii_digit() {
            let start = i;
            while i < len
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'.' || bytes[i] == b'_')
            {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                text: &source[start..i],
                line,
            });
            continue;
        }

        let width = match source.get(i..i + 2) {
            Some(pair) if TWO_CHAR_OPERATORS.contains(&pair) => 2,
            _ => 1,
        };
        tokens.push(Token {
            kind: TokenKind::Punct,
            text: &source[i..i + width],
            line,
        });
        i += width;
    }

    Ok(tokens)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}
