use crate::{
    ast::{BinOp, UnaryOp},
    lexer::Position,
    literal::RawLiteral,
};

/// Generic parse tree produced by the parser.
///
/// This is the untyped intermediate form: literals are still raw text and
/// property paths are still nested accessors. The assembler turns it into
/// an [`AstNode`](crate::ast::AstNode).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare identifier, the head of a property path
    ///
    /// # Example
    /// ```text
    /// severity
    /// ```
    Ident { name: String, position: Position },

    /// Dotted member access
    ///
    /// # Example
    /// ```text
    /// labels.team
    /// ```
    Member { object: Box<Expr>, field: String },

    /// Bracket access with a quoted or numeric key
    ///
    /// # Examples
    /// ```text
    /// labels['team-name']
    /// tags[0]
    /// ```
    Index { object: Box<Expr>, key: RawLiteral },

    /// Literal value, type not yet inferred
    Literal(RawLiteral),

    /// List literal (right-hand side of `in`)
    ///
    /// # Example
    /// ```text
    /// ['critical', 'high']
    /// ```
    List { elements: Vec<Expr>, position: Position },

    /// Parenthesized sub-expression
    Group { inner: Box<Expr>, position: Position },

    /// Prefix operator application
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        position: Position,
    },

    /// Function or method call
    ///
    /// # Examples
    /// ```text
    /// has(labels.team)
    /// name.startsWith('db-')
    /// ```
    Call {
        target: Option<Box<Expr>>,
        function: String,
        args: Vec<Expr>,
        position: Position,
    },

    /// Binary operation (comparison, membership, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Position of the first token of this expression.
    pub fn position(&self) -> Position {
        match self {
            Expr::Ident { position, .. }
            | Expr::List { position, .. }
            | Expr::Group { position, .. }
            | Expr::Unary { position, .. } => *position,
            Expr::Call {
                target: Some(target),
                ..
            } => target.position(),
            Expr::Call { position, .. } => *position,
            Expr::Literal(raw) => raw.position,
            Expr::Member { object, .. } | Expr::Index { object, .. } => object.position(),
            Expr::BinaryOp { left, .. } => left.position(),
        }
    }
}
