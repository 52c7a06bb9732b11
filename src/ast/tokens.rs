use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, kept as raw text
    ///
    /// Whether it is an integer or a float is decided by the literal
    /// interpreter, not the lexer.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1234.9983
    /// ```
    Number(String),

    /// Quoted string literal, escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// 'fake alert'
    /// "It\"s value"
    /// ```
    String(String),

    // Identifiers
    /// Property segment, keyword or function name
    ///
    /// Must start with letter or underscore, followed by letters, digits, or underscores.
    /// `true`, `false`, `has`, `contains`, `startsWith` and `endsWith` all
    /// arrive as identifiers and are recognised by the parser.
    ///
    /// # Examples
    /// ```text
    /// severity
    /// _internal
    /// startsWith
    /// ```
    Identifier(String),

    /// Membership operator (`in`)
    In,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical negation (`!`)
    Exclamation,

    /// Unary minus; binary subtraction is not part of the filter language
    Minus,

    // Recognised only to be rejected as unsupported
    /// Addition
    Plus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// Modulo
    Percent,

    /// Ternary condition
    Question,

    /// Ternary alternative / map entry separator
    Colon,

    // Delimiters
    /// Left bracket for index accessors and list literals
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Left brace (map literals, unsupported)
    LBrace,

    /// Right brace
    RBrace,

    /// Dot for member access and method calls
    Dot,

    /// Comma for separating arguments or list elements
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Arithmetic and ternary operators are well-formed CEL that the
    /// filter language deliberately rejects.
    pub fn is_unsupported_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::Question
                | Token::Colon
                | Token::LBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::In => write!(f, "in"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Exclamation => write!(f, "!"),
            Token::Minus => write!(f, "-"),
            Token::Plus => write!(f, "+"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
