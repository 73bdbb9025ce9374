//! Byte lexer for equation text.

use crate::error::ExprError;

/// The kinds of tokens in an equation.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// A numeric literal.
    Number(f64),
    /// A variable name, with any leading `$` removed.
    Ident(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^` or `**`
    Caret,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// A short human-readable description, used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Caret => "'^'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Eof => "end of equation".to_string(),
        }
    }
}

/// A token and its byte offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was lexed.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub pos: usize,
}

/// Lexes an equation into tokens.
///
/// Whitespace is skipped. The returned vector always ends with
/// [`TokenKind::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    pos: self.pos,
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<Token, ExprError> {
        let start = self.pos;
        let c = self.peek();
        let kind = match c {
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'/' => self.single(TokenKind::Slash),
            b'^' => self.single(TokenKind::Caret),
            b'(' => self.single(TokenKind::LeftParen),
            b')' => self.single(TokenKind::RightParen),
            b'*' => {
                self.advance();
                if self.peek() == b'*' {
                    self.advance();
                    TokenKind::Caret
                } else {
                    TokenKind::Star
                }
            }
            b'0'..=b'9' | b'.' => self.lex_number()?,
            b'$' => {
                self.advance();
                if !is_ident_start(self.peek()) {
                    return Err(ExprError::UnexpectedChar { ch: '$', pos: start });
                }
                self.lex_ident()
            }
            c if is_ident_start(c) => self.lex_ident(),
            _ => {
                let ch = std::str::from_utf8(&self.source[start..])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(ExprError::UnexpectedChar { ch, pos: start });
            }
        };
        Ok(Token { kind, pos: start })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while is_ident_continue(self.peek()) {
            self.pos += 1;
        }
        // identifiers are ASCII by construction
        let name = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        TokenKind::Ident(name)
    }

    fn lex_number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        while self.peek().is_ascii_digit() || self.peek() == b'.' {
            self.pos += 1;
        }
        if matches!(self.peek(), b'e' | b'E') {
            let sign = usize::from(matches!(self.peek_at(1), b'+' | b'-'));
            if self.peek_at(1 + sign).is_ascii_digit() {
                self.pos += 1 + sign;
                while self.peek().is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ExprError::InvalidNumber { text, pos: start })
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
