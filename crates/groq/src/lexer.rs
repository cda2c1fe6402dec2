use std::fmt;

use serde::{Deserialize, Serialize};

/// Token types produced by the GROQ lexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// A string literal, escapes already decoded.
    String(String),
    /// An integer literal.
    Integer(i64),
    /// A boolean literal.
    Bool(bool),
    /// The null literal.
    Null,

    /// An identifier. Parameters keep their leading `$`.
    Ident(String),

    Eq,  // ==
    Neq, // !=
    And, // &&
    Or,  // ||
    Not, // !
    In,  // in
    Asc,  // asc
    Desc, // desc

    Star,     // *
    Dot,      // .
    Ellipsis, // ...
    Comma,    // ,
    Colon,    // :
    Pipe,     // |
    Arrow,    // ->

    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    /// The end of the input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Integer(n) => write!(f, "{n}"),
            Token::Bool(b) => write!(f, "{b}"),
            Token::Null => write!(f, "null"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Star => write!(f, "*"),
            Token::Dot => write!(f, "."),
            Token::Ellipsis => write!(f, "..."),
            Token::Pipe => write!(f, "|"),
            Token::Arrow => write!(f, "->"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Eof => write!(f, "EOF"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Position in source code for error reporting, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer error.
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),
    #[error("invalid number '{0}' at position {1}")]
    InvalidNumber(String, usize),
    #[error("invalid escape sequence at position {0}")]
    InvalidEscape(usize),
}

/// Tokenize a GROQ query string into a sequence of tokens.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    let at = |i: usize| chars.get(i).copied();

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        let token = match ch {
            '*' => {
                pos += 1;
                Token::Star
            }
            '.' if at(pos + 1) == Some('.') && at(pos + 2) == Some('.') => {
                pos += 3;
                Token::Ellipsis
            }
            '.' => {
                pos += 1;
                Token::Dot
            }
            ',' => {
                pos += 1;
                Token::Comma
            }
            ':' => {
                pos += 1;
                Token::Colon
            }
            '(' => {
                pos += 1;
                Token::LParen
            }
            ')' => {
                pos += 1;
                Token::RParen
            }
            '[' => {
                pos += 1;
                Token::LBracket
            }
            ']' => {
                pos += 1;
                Token::RBracket
            }
            '{' => {
                pos += 1;
                Token::LBrace
            }
            '}' => {
                pos += 1;
                Token::RBrace
            }
            '=' if at(pos + 1) == Some('=') => {
                pos += 2;
                Token::Eq
            }
            '!' => {
                if at(pos + 1) == Some('=') {
                    pos += 2;
                    Token::Neq
                } else {
                    pos += 1;
                    Token::Not
                }
            }
            '&' if at(pos + 1) == Some('&') => {
                pos += 2;
                Token::And
            }
            '|' => {
                if at(pos + 1) == Some('|') {
                    pos += 2;
                    Token::Or
                } else {
                    pos += 1;
                    Token::Pipe
                }
            }
            '-' if at(pos + 1) == Some('>') => {
                pos += 2;
                Token::Arrow
            }
            '"' | '\'' => {
                let quote = ch;
                pos += 1;
                let mut value = String::new();
                loop {
                    match at(pos) {
                        None => return Err(LexError::UnterminatedString(start)),
                        Some(c) if c == quote => {
                            pos += 1;
                            break;
                        }
                        Some('\\') => {
                            let escaped = at(pos + 1).ok_or(LexError::UnterminatedString(start))?;
                            let decoded = match escaped {
                                'n' => '\n',
                                't' => '\t',
                                'r' => '\r',
                                '\\' | '"' | '\'' | '/' => escaped,
                                _ => return Err(LexError::InvalidEscape(pos)),
                            };
                            value.push(decoded);
                            pos += 2;
                        }
                        Some(c) => {
                            value.push(c);
                            pos += 1;
                        }
                    }
                }
                Token::String(value)
            }
            c if c.is_ascii_digit() => {
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let digits: String = chars[start..pos].iter().collect();
                digits
                    .parse::<i64>()
                    .map(Token::Integer)
                    .map_err(|_| LexError::InvalidNumber(digits, start))?
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                pos += 1;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                match word.as_str() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    "null" => Token::Null,
                    "in" => Token::In,
                    "asc" => Token::Asc,
                    "desc" => Token::Desc,
                    _ => Token::Ident(word),
                }
            }
            _ => return Err(LexError::UnexpectedChar(ch, pos)),
        };

        tokens.push(SpannedToken {
            token,
            span: Span { start, end: pos },
        });
    }

    tokens.push(SpannedToken {
        token: Token::Eof,
        span: Span {
            start: pos,
            end: pos,
        },
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn tokenize_simple_filter() {
        let tokens = tok("*[_type == \"post\"]");
        assert_eq!(
            tokens,
            vec![
                Token::Star,
                Token::LBracket,
                Token::Ident("_type".into()),
                Token::Eq,
                Token::String("post".into()),
                Token::RBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_projection() {
        let tokens = tok("{title, \"slug\": slug.current}");
        assert_eq!(tokens[0], Token::LBrace);
        assert_eq!(tokens[1], Token::Ident("title".into()));
        assert_eq!(tokens[2], Token::Comma);
        assert_eq!(tokens[3], Token::String("slug".into()));
        assert_eq!(tokens[4], Token::Colon);
        assert_eq!(tokens[5], Token::Ident("slug".into()));
        assert_eq!(tokens[6], Token::Dot);
        assert_eq!(tokens[7], Token::Ident("current".into()));
        assert_eq!(tokens[8], Token::RBrace);
    }

    #[test]
    fn tokenize_index_and_spread() {
        assert_eq!(
            tok("[42]{...}"),
            vec![
                Token::LBracket,
                Token::Integer(42),
                Token::RBracket,
                Token::LBrace,
                Token::Ellipsis,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_parameters_and_pipes() {
        let tokens = tok("slug.current == $slug] | order(publishedAt desc)");
        assert_eq!(tokens[4], Token::Ident("$slug".into()));
        assert_eq!(tokens[6], Token::Pipe);
        assert_eq!(tokens[7], Token::Ident("order".into()));
        assert_eq!(tokens[10], Token::Desc);
    }

    #[test]
    fn tokenize_dereference() {
        let tokens = tok("author->name");
        assert_eq!(tokens[0], Token::Ident("author".into()));
        assert_eq!(tokens[1], Token::Arrow);
        assert_eq!(tokens[2], Token::Ident("name".into()));
    }

    #[test]
    fn tokenize_string_escapes_and_unicode() {
        let tokens = tok(r#"'it\'s' "café""#);
        assert_eq!(tokens[0], Token::String("it's".into()));
        assert_eq!(tokens[1], Token::String("café".into()));
    }

    #[test]
    fn unterminated_string_error() {
        assert!(matches!(
            tokenize("\"hello"),
            Err(LexError::UnterminatedString(0))
        ));
    }

    #[test]
    fn number_out_of_range_is_rejected() {
        assert!(matches!(
            tokenize("[99999999999999999999]"),
            Err(LexError::InvalidNumber(_, 1))
        ));
    }

    #[test]
    fn lone_ampersand_is_rejected() {
        assert!(matches!(
            tokenize("a & b"),
            Err(LexError::UnexpectedChar('&', 2))
        ));
    }
}
