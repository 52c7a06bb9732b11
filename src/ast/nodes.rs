use crate::{
    ast::{ComparisonOperator, Constant, LogicalOperator, UnaryOperator},
    lexer::is_identifier,
};
use std::fmt;

/// Typed AST produced by [`convert_to_ast`](crate::convert_to_ast).
///
/// A closed set of node shapes; consumers (query generators, the
/// [`Evaluator`](crate::Evaluator)) match on it exhaustively. Every
/// composite node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    PropertyAccess(PropertyAccessNode),
    Constant(ConstantNode),
    Comparison(ComparisonNode),
    Logical(LogicalNode),
    Unary(UnaryNode),
    Parenthesis(ParenthesisNode),
}

/// Reference to a (possibly nested) record field.
///
/// `path` is never empty. Dotted and bracketed segments are both folded
/// into plain strings, so `labels['team'].name` and `labels.team.name`
/// produce the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyAccessNode {
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    pub value: Constant,
}

/// Right-hand side of a comparison.
///
/// [`ComparisonOperator::In`] always carries a `List`; every other operator
/// carries a `Constant`.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOperand {
    Constant(ConstantNode),
    List(Vec<ConstantNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonNode {
    pub operator: ComparisonOperator,
    pub first_operand: PropertyAccessNode,
    pub second_operand: ComparisonOperand,
}

/// Binary `&&`/`||`. Chains are left-nested.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalNode {
    pub operator: LogicalOperator,
    pub left: Box<AstNode>,
    pub right: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    pub operator: UnaryOperator,
    pub operand: Box<AstNode>,
}

/// Explicit grouping kept only for `!(..)` and `-(..)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesisNode {
    pub expression: Box<AstNode>,
}

impl PropertyAccessNode {
    pub fn new<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        PropertyAccessNode {
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConstantNode {
    pub fn new(value: Constant) -> Self {
        ConstantNode { value }
    }
}

impl ComparisonNode {
    /// Comparison against a single constant. Not valid for `In`.
    pub fn scalar(
        operator: ComparisonOperator,
        first_operand: PropertyAccessNode,
        constant: ConstantNode,
    ) -> Self {
        debug_assert!(operator != ComparisonOperator::In);
        ComparisonNode {
            operator,
            first_operand,
            second_operand: ComparisonOperand::Constant(constant),
        }
    }

    /// `in` membership against a literal list.
    pub fn membership(first_operand: PropertyAccessNode, list: Vec<ConstantNode>) -> Self {
        ComparisonNode {
            operator: ComparisonOperator::In,
            first_operand,
            second_operand: ComparisonOperand::List(list),
        }
    }
}

impl AstNode {
    pub fn property<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        AstNode::PropertyAccess(PropertyAccessNode::new(path))
    }

    pub fn constant(value: Constant) -> Self {
        AstNode::Constant(ConstantNode::new(value))
    }

    pub fn logical(operator: LogicalOperator, left: AstNode, right: AstNode) -> Self {
        AstNode::Logical(LogicalNode {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOperator, operand: AstNode) -> Self {
        AstNode::Unary(UnaryNode {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn parenthesis(expression: AstNode) -> Self {
        AstNode::Parenthesis(ParenthesisNode {
            expression: Box::new(expression),
        })
    }

    /// Name of the node variant, as used in JSON output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::PropertyAccess(_) => "property_access",
            AstNode::Constant(_) => "constant",
            AstNode::Comparison(_) => "comparison",
            AstNode::Logical(_) => "logical",
            AstNode::Unary(_) => "unary",
            AstNode::Parenthesis(_) => "parenthesis",
        }
    }
}

impl fmt::Display for PropertyAccessNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.path.iter().enumerate() {
            if is_identifier(segment) && segment != "in" {
                if i > 0 {
                    f.write_str(".")?;
                }
                f.write_str(segment)?;
            } else {
                write!(f, "[{}]", Constant::String(segment.clone()))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ComparisonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.second_operand, self.operator.method_name()) {
            (ComparisonOperand::Constant(c), Some(method)) => {
                write!(f, "{}.{}({})", self.first_operand, method, c.value)
            }
            (ComparisonOperand::Constant(c), None) => write!(
                f,
                "{} {} {}",
                self.first_operand,
                self.operator.symbol().unwrap_or("=="),
                c.value
            ),
            (ComparisonOperand::List(items), _) => {
                write!(f, "{} in [", self.first_operand)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Renders canonical CEL text; reparsing it yields an equal tree.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::PropertyAccess(p) => write!(f, "{}", p),
            AstNode::Constant(c) => write!(f, "{}", c.value),
            AstNode::Comparison(c) => write!(f, "{}", c),
            AstNode::Logical(l) => {
                // Left operands only need grouping when they bind looser;
                // right operands also need it for the same operator.
                let left_grouped = matches!(
                    &*l.left,
                    AstNode::Logical(inner) if inner.operator == LogicalOperator::Or
                        && l.operator == LogicalOperator::And
                );
                let right_grouped = match &*l.right {
                    AstNode::Logical(inner) => {
                        inner.operator == l.operator || inner.operator == LogicalOperator::Or
                    }
                    _ => false,
                };
                write_operand(f, &l.left, left_grouped)?;
                write!(f, " {} ", l.operator.symbol())?;
                write_operand(f, &l.right, right_grouped)
            }
            AstNode::Unary(u) => match u.operator {
                UnaryOperator::Has => write!(f, "has({})", u.operand),
                UnaryOperator::Not | UnaryOperator::Neg => {
                    f.write_str(if u.operator == UnaryOperator::Not { "!" } else { "-" })?;
                    let grouped = matches!(&*u.operand, AstNode::Logical(_));
                    write_operand(f, &u.operand, grouped)
                }
            },
            AstNode::Parenthesis(p) => write!(f, "({})", p.expression),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &AstNode, grouped: bool) -> fmt::Result {
    if grouped {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}
