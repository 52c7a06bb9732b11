use crate::ast::Token;
use log::trace;
use std::fmt;
use thiserror::Error;

/// Location of a character in the filter text.
///
/// `offset` counts characters from the start; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A token together with where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: Position,
}

/// Errors raised while tokenizing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("unexpected '{ch}' at {position} (did you mean '{suggestion}'?)")]
    IncompleteOperator {
        ch: char,
        suggestion: &'static str,
        position: Position,
    },

    #[error("unterminated string starting at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("unterminated escape sequence at {position}: unexpected end of input after '\\'")]
    UnterminatedEscape { position: Position },

    #[error("invalid escape sequence '\\{ch}' at {position}")]
    InvalidEscape { ch: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::IncompleteOperator { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedEscape { position }
            | LexError::InvalidEscape { position, .. } => *position,
        }
    }
}

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub(crate) fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Whether `text` would lex as a single identifier token.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

pub struct Lexer {
    input: Vec<char>,
    position: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: Position::default(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position.offset).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position.offset + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position.offset += 1;
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_identifier_continue(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                position: escape_at,
                            });
                        }
                        None => {
                            return Err(LexError::UnterminatedEscape {
                                position: escape_at,
                            });
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> String {
        let mut number = String::new();
        let mut seen_point = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !seen_point
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                seen_point = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
    }

    /// Consume `first`, then `second` if present, choosing between the
    /// one- and two-character tokens.
    fn one_or_two(&mut self, second: char, single: Token, double: Token) -> Token {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Consume a two-character operator whose first character is not a
    /// token on its own.
    fn pair(
        &mut self,
        ch: char,
        suggestion: &'static str,
        token: Token,
    ) -> Result<Token, LexError> {
        if self.peek_char(1) == suggestion.chars().nth(1) {
            self.advance();
            self.advance();
            Ok(token)
        } else {
            Err(LexError::IncompleteOperator {
                ch,
                suggestion,
                position: self.position,
            })
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_whitespace();
        let position = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('=') => self.pair('=', "==", Token::EqEq)?,
            Some('&') => self.pair('&', "&&", Token::AndAnd)?,
            Some('|') => self.pair('|', "||", Token::OrOr)?,
            Some('!') => self.one_or_two('=', Token::Exclamation, Token::NotEq),
            Some('>') => self.one_or_two('=', Token::Gt, Token::GtEq),
            Some('<') => self.one_or_two('=', Token::Lt, Token::LtEq),
            Some('.') => self.single(Token::Dot),
            Some(',') => self.single(Token::Comma),
            Some('-') => self.single(Token::Minus),
            Some('+') => self.single(Token::Plus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('?') => self.single(Token::Question),
            Some(':') => self.single(Token::Colon),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some(ch) if is_identifier_start(ch) => {
                let ident = self.read_identifier();
                match ident.as_str() {
                    "in" => Token::In,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => Token::Number(self.read_number()),
            Some(ch) => return Err(LexError::UnexpectedChar { ch, position }),
        };

        Ok(SpannedToken { token, position })
    }

    /// Tokenize the whole input. The last token is always [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        trace!("tokenized {} tokens", tokens.len());
        Ok(tokens)
    }
}
