use crate::{
    ast::{BinOp, Expr, Token, UnaryOp},
    lexer::{LexError, Lexer, Position, SpannedToken},
    literal::{LiteralError, RawLiteral},
};
use std::mem;
use thiserror::Error;

/// Default maximum nesting of groups and prefix operators.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// CEL functions and macros that are valid CEL but outside the filter language.
const UNSUPPORTED_FUNCTIONS: [&str; 16] = [
    "size",
    "exists",
    "exists_one",
    "all",
    "map",
    "filter",
    "matches",
    "int",
    "uint",
    "double",
    "string",
    "bytes",
    "timestamp",
    "duration",
    "type",
    "dyn",
];

/// Configuration for parsing filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum nesting depth of parenthesized groups and prefix operators
    /// (default: 64). Deeper input fails instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The text is not valid filter syntax
    Syntax,
    /// The text is well-formed CEL outside the supported subset
    UnsupportedExpression,
}

/// Errors raised while turning filter text into an AST.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected {found} at {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: Position,
    },

    #[error("unknown function '{name}' at {position}")]
    UnknownFunction { name: String, position: Position },

    #[error("unsupported expression at {position}: {message}")]
    Unsupported { message: String, position: Position },

    #[error("invalid literal at {position}: {source}")]
    Literal {
        source: LiteralError,
        position: Position,
    },

    #[error("expression nesting exceeds the maximum depth of {max} at {position}")]
    NestingTooDeep { max: usize, position: Position },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex(_)
            | ParseError::UnexpectedToken { .. }
            | ParseError::UnknownFunction { .. }
            | ParseError::Literal {
                source: LiteralError::NotALiteral(_),
                ..
            } => ErrorKind::Syntax,
            ParseError::Unsupported { .. }
            | ParseError::Literal {
                source: LiteralError::IntegerOutOfRange(_) | LiteralError::FloatOutOfRange(_),
                ..
            }
            | ParseError::NestingTooDeep { .. } => ErrorKind::UnsupportedExpression,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnknownFunction { position, .. }
            | ParseError::Unsupported { position, .. }
            | ParseError::Literal { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>, position: Position) -> Self {
        ParseError::Unsupported {
            message: message.into(),
            position,
        }
    }
}

/// Recursive-descent parser over a fully tokenized filter.
///
/// Precedence, lowest first: `||`, `&&`, prefix `!` / `-` / `has()`,
/// comparison, `in`, member access and method calls, primary.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    index: usize,
    config: ParseConfig,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_config(lexer, ParseConfig::default())
    }

    pub fn with_config(lexer: Lexer, config: ParseConfig) -> Result<Self, ParseError> {
        let tokens = lexer.tokenize()?;
        Ok(Parser {
            tokens,
            index: 0,
            config,
            depth: 0,
        })
    }

    fn current(&self) -> &SpannedToken {
        // The token stream always ends with Eof and `advance` never moves past it.
        &self.tokens[self.index]
    }

    fn current_token(&self) -> &Token {
        &self.current().token
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn peek_token(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + offset).min(last)].token
    }

    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(self.current_token()) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<Position, ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        let position = self.position();
        self.advance();
        Ok(position)
    }

    /// Error for a token that cannot start or continue an operand here.
    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.current_token().to_string(),
            expected: expected.to_string(),
            position: self.position(),
        }
    }

    /// Error for a token following a complete operand. Arithmetic and
    /// ternary operators are reported as unsupported rather than malformed.
    fn unexpected_after_operand(&self, expected: &str) -> ParseError {
        let token = self.current_token();
        if token.is_unsupported_operator() {
            ParseError::unsupported(
                format!("operator '{}' is not supported in filters", token),
                self.position(),
            )
        } else {
            self.unexpected(expected)
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::NestingTooDeep {
                max: self.config.max_depth,
                position: self.position(),
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Parse a complete filter; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected_after_operand("'&&', '||' or end of input"));
        }
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance();
            let right = self.parse_and()?;

            left = Expr::BinaryOp {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while self.check(&Token::AndAnd) {
            self.advance();
            let right = self.parse_unary()?;

            left = Expr::BinaryOp {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let position = self.position();
        let is_has = matches!(self.current_token(), Token::Identifier(name) if name == "has")
            && self.peek_token(1) == &Token::LParen;
        if is_has {
            return self.parse_has();
        }

        let op = match self.current_token() {
            Token::Exclamation => UnaryOp::Not,
            // `-5` is a negative literal, handled in parse_primary
            Token::Minus if !matches!(self.peek_token(1), Token::Number(_)) => UnaryOp::Negate,
            _ => return self.parse_comparison(),
        };

        self.advance();
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            position,
        })
    }

    fn parse_has(&mut self) -> Result<Expr, ParseError> {
        let position = self.position();
        self.advance(); // consume `has`
        self.expect(Token::LParen, "'(' after has")?;

        if !matches!(self.current_token(), Token::Identifier(_)) {
            return Err(self.unexpected("a property path inside has()"));
        }
        let path = self.parse_postfix()?;

        self.expect(Token::RParen, "')' to close has(")?;
        Ok(Expr::Call {
            target: None,
            function: "has".to_string(),
            args: vec![path],
            position,
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_membership()?;

        let op = match self.current_token() {
            Token::EqEq => BinOp::Equal,
            Token::NotEq => BinOp::NotEqual,
            Token::Lt => BinOp::LessThan,
            Token::Gt => BinOp::GreaterThan,
            Token::LtEq => BinOp::LessEqual,
            Token::GtEq => BinOp::GreaterEqual,
            _ => return Ok(left),
        };

        self.advance();
        let right = self.parse_membership()?;

        Ok(Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_membership(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_postfix()?;

        if !self.check(&Token::In) {
            return Ok(left);
        }
        self.advance();

        let right = if self.check(&Token::LBracket) {
            self.parse_list()?
        } else {
            self.parse_postfix()?
        };

        Ok(Expr::BinaryOp {
            op: BinOp::In,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        let position = self.expect(Token::LBracket, "'['")?;
        let mut elements = vec![];

        while !self.check(&Token::RBracket) {
            elements.push(self.parse_postfix()?);

            if self.check(&Token::Comma) {
                self.advance();
            } else if !self.check(&Token::RBracket) {
                return Err(self.unexpected_after_operand("',' or ']' in list"));
            }
        }

        self.advance(); // consume ']'
        Ok(Expr::List { elements, position })
    }

    /// Member access, index access and method calls.
    ///
    /// A method call ends the chain: predicates never take a receiver that
    /// is itself a call.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.advance(); // consume '.'

                let name_position = self.position();
                let name = match self.current_token() {
                    Token::Identifier(n) => n.clone(),
                    _ => return Err(self.unexpected("identifier after '.'")),
                };
                self.advance();

                if self.check(&Token::LParen) {
                    return self.parse_method_call(expr, name, name_position);
                }

                expr = Expr::Member {
                    object: Box::new(expr),
                    field: name,
                };
            } else if self.check(&Token::LBracket) {
                self.advance(); // consume '['

                let key_position = self.position();
                let key = match self.current_token() {
                    Token::String(s) => RawLiteral::quoted(s.clone(), key_position),
                    Token::Number(n) => RawLiteral::unquoted(n.clone(), key_position),
                    _ => return Err(self.unexpected("quoted or numeric key inside '[]'")),
                };
                self.advance();
                self.expect(Token::RBracket, "']'")?;

                expr = Expr::Index {
                    object: Box::new(expr),
                    key,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_method_call(
        &mut self,
        target: Expr,
        function: String,
        position: Position,
    ) -> Result<Expr, ParseError> {
        match function.as_str() {
            "contains" | "startsWith" | "endsWith" => {}
            name if UNSUPPORTED_FUNCTIONS.contains(&name) => {
                return Err(ParseError::unsupported(
                    format!("function '{}' is not supported in filters", name),
                    position,
                ));
            }
            _ => {
                return Err(ParseError::UnknownFunction {
                    name: function,
                    position,
                });
            }
        }

        let args = self.parse_call_arguments()?;
        Ok(Expr::Call {
            target: Some(Box::new(target)),
            function,
            args,
            position,
        })
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let mut args = vec![];

        while !self.check(&Token::RParen) {
            args.push(self.parse_membership()?);

            if self.check(&Token::Comma) {
                self.advance();
            } else if !self.check(&Token::RParen) {
                return Err(self.unexpected_after_operand("',' or ')' in argument list"));
            }
        }

        self.advance(); // consume ')'
        Ok(args)
    }

    /// Parse primary expressions: property heads, literals and groups.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let position = self.position();

        match self.current_token().clone() {
            Token::Identifier(name) => {
                if self.peek_token(1) == &Token::LParen {
                    return Err(self.function_in_operand_position(name, position));
                }
                self.advance();
                if name == "true" || name == "false" {
                    Ok(Expr::Literal(RawLiteral::unquoted(name, position)))
                } else {
                    Ok(Expr::Ident { name, position })
                }
            }
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Literal(RawLiteral::unquoted(n, position)))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::Literal(RawLiteral::quoted(s, position)))
            }

            // Negative numeric literal
            Token::Minus => match self.peek_token(1).clone() {
                Token::Number(n) => {
                    self.advance();
                    self.advance();
                    Ok(Expr::Literal(RawLiteral::unquoted(format!("-{}", n), position)))
                }
                _ => Err(self.unexpected("a property, literal or '('")),
            },

            Token::LParen => {
                self.advance();
                let inner = self.nested(|p| p.parse_expression())?;
                if !self.check(&Token::RParen) {
                    return Err(self.unexpected_after_operand(&format!(
                        "')' to close '(' opened at {}",
                        position
                    )));
                }
                self.advance();
                Ok(Expr::Group {
                    inner: Box::new(inner),
                    position,
                })
            }

            Token::LBracket => Err(ParseError::unsupported(
                "list literals are only supported on the right of 'in'",
                position,
            )),
            Token::LBrace => Err(ParseError::unsupported(
                "map literals are not supported",
                position,
            )),

            _ => Err(self.unexpected("a property, literal or '('")),
        }
    }

    fn function_in_operand_position(&self, name: String, position: Position) -> ParseError {
        if name == "has" || UNSUPPORTED_FUNCTIONS.contains(&name.as_str()) {
            ParseError::unsupported(
                format!("function '{}' cannot be used as an operand", name),
                position,
            )
        } else {
            ParseError::UnknownFunction { name, position }
        }
    }
}
