use std::fmt;

/// Binary operators of the generic parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Membership
    /// List membership (`in`)
    In,

    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

/// Prefix operators of the generic parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation (`!`)
    Not,
    /// Numeric negation (`-`)
    Negate,
}

/// Operator of a [`ComparisonNode`](crate::ast::ComparisonNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

impl ComparisonOperator {
    /// Upper-case tag used in JSON output and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "EQ",
            ComparisonOperator::Ne => "NE",
            ComparisonOperator::Gt => "GT",
            ComparisonOperator::Ge => "GE",
            ComparisonOperator::Lt => "LT",
            ComparisonOperator::Le => "LE",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::StartsWith => "STARTS_WITH",
            ComparisonOperator::EndsWith => "ENDS_WITH",
            ComparisonOperator::In => "IN",
        }
    }

    /// Method name for the call-style predicates, `None` for infix operators.
    pub fn method_name(&self) -> Option<&'static str> {
        match self {
            ComparisonOperator::Contains => Some("contains"),
            ComparisonOperator::StartsWith => Some("startsWith"),
            ComparisonOperator::EndsWith => Some("endsWith"),
            _ => None,
        }
    }

    /// Resolve a call-style predicate by its method name.
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name {
            "contains" => Some(ComparisonOperator::Contains),
            "startsWith" => Some(ComparisonOperator::StartsWith),
            "endsWith" => Some(ComparisonOperator::EndsWith),
            _ => None,
        }
    }

    /// Infix symbol, `None` for the call-style predicates.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ComparisonOperator::Eq => Some("=="),
            ComparisonOperator::Ne => Some("!="),
            ComparisonOperator::Gt => Some(">"),
            ComparisonOperator::Ge => Some(">="),
            ComparisonOperator::Lt => Some("<"),
            ComparisonOperator::Le => Some("<="),
            ComparisonOperator::In => Some("in"),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator of a [`LogicalNode`](crate::ast::LogicalNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator of a [`UnaryNode`](crate::ast::UnaryNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Neg,
    Has,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT",
            UnaryOperator::Neg => "NEG",
            UnaryOperator::Has => "HAS",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
