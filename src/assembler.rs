use crate::{
    ast::{
        AstNode, BinOp, ComparisonNode, ComparisonOperator, ConstantNode, Expr, LogicalOperator,
        PropertyAccessNode, UnaryOp, UnaryOperator,
    },
    lexer::Position,
    literal::{self, RawLiteral},
    parser::ParseError,
};

/// Convert a generic parse tree into the typed AST.
///
/// Checks structure only: comparisons need a property path on the left and
/// literals on the right. Whether a path names a real field is left to the
/// consumer.
pub fn assemble(expr: Expr) -> Result<AstNode, ParseError> {
    match expr {
        Expr::Ident { .. } | Expr::Member { .. } | Expr::Index { .. } => {
            Ok(AstNode::PropertyAccess(property_operand(expr)?))
        }
        Expr::Literal(raw) => Ok(AstNode::Constant(constant(&raw)?)),
        Expr::List { position, .. } => Err(ParseError::unsupported(
            "list literals are only supported on the right of 'in'",
            position,
        )),
        // Plain grouping carries no meaning once the tree exists
        Expr::Group { inner, .. } => assemble(*inner),
        Expr::Unary { op, operand, .. } => {
            let operator = match op {
                UnaryOp::Not => UnaryOperator::Not,
                UnaryOp::Negate => UnaryOperator::Neg,
            };
            let operand = match *operand {
                Expr::Group { inner, .. } => AstNode::parenthesis(assemble(*inner)?),
                other => assemble(other)?,
            };
            Ok(AstNode::unary(operator, operand))
        }
        Expr::Call {
            target,
            function,
            args,
            position,
        } => assemble_call(target, function, args, position),
        Expr::BinaryOp { op, left, right } => assemble_binary(op, *left, *right),
    }
}

fn assemble_binary(op: BinOp, left: Expr, right: Expr) -> Result<AstNode, ParseError> {
    let operator = match op {
        BinOp::And => {
            return Ok(AstNode::logical(
                LogicalOperator::And,
                assemble(left)?,
                assemble(right)?,
            ));
        }
        BinOp::Or => {
            return Ok(AstNode::logical(
                LogicalOperator::Or,
                assemble(left)?,
                assemble(right)?,
            ));
        }
        BinOp::In => {
            let first = property_operand(left)?;
            let list = list_operand(right)?;
            return Ok(AstNode::Comparison(ComparisonNode::membership(first, list)));
        }
        BinOp::Equal => ComparisonOperator::Eq,
        BinOp::NotEqual => ComparisonOperator::Ne,
        BinOp::LessThan => ComparisonOperator::Lt,
        BinOp::GreaterThan => ComparisonOperator::Gt,
        BinOp::LessEqual => ComparisonOperator::Le,
        BinOp::GreaterEqual => ComparisonOperator::Ge,
    };

    let first = property_operand(left)?;
    let second = constant_operand(right)?;
    Ok(AstNode::Comparison(ComparisonNode::scalar(operator, first, second)))
}

fn assemble_call(
    target: Option<Box<Expr>>,
    function: String,
    mut args: Vec<Expr>,
    position: Position,
) -> Result<AstNode, ParseError> {
    if args.len() != 1 {
        return Err(ParseError::unsupported(
            format!("{}() takes exactly one argument, got {}", function, args.len()),
            position,
        ));
    }
    let arg = args.remove(0);

    match (target, function.as_str()) {
        (None, "has") => {
            let path = property_operand(arg)?;
            Ok(AstNode::unary(UnaryOperator::Has, AstNode::PropertyAccess(path)))
        }
        (Some(target), name) => {
            let operator = ComparisonOperator::from_method_name(name).ok_or_else(|| {
                ParseError::UnknownFunction {
                    name: name.to_string(),
                    position,
                }
            })?;
            let first = property_operand(*target)?;
            let second = constant_operand(arg)?;
            Ok(AstNode::Comparison(ComparisonNode::scalar(operator, first, second)))
        }
        (None, name) => Err(ParseError::UnknownFunction {
            name: name.to_string(),
            position,
        }),
    }
}

/// Flatten nested accessors into a path of string segments.
///
/// # Examples
/// ```text
/// labels['team'].name → ["labels", "team", "name"]
/// tags[0]             → ["tags", "0"]
/// ```
fn property_operand(expr: Expr) -> Result<PropertyAccessNode, ParseError> {
    let mut path = Vec::new();
    extract_path(expr, &mut path)?;
    Ok(PropertyAccessNode { path })
}

fn extract_path(expr: Expr, path: &mut Vec<String>) -> Result<(), ParseError> {
    match expr {
        Expr::Ident { name, .. } => path.push(name),
        Expr::Member { object, field } => {
            extract_path(*object, path)?;
            path.push(field);
        }
        Expr::Index { object, key } => {
            extract_path(*object, path)?;
            path.push(key.text);
        }
        Expr::Group { inner, .. } => extract_path(*inner, path)?,
        other => {
            return Err(ParseError::unsupported(
                "expected a property path here",
                other.position(),
            ));
        }
    }
    Ok(())
}

fn constant(raw: &RawLiteral) -> Result<ConstantNode, ParseError> {
    literal::interpret(raw)
        .map(ConstantNode::new)
        .map_err(|source| ParseError::Literal {
            source,
            position: raw.position,
        })
}

fn constant_operand(expr: Expr) -> Result<ConstantNode, ParseError> {
    match expr {
        Expr::Literal(raw) => constant(&raw),
        Expr::Group { inner, .. } => constant_operand(*inner),
        other => Err(ParseError::unsupported(
            "comparisons must have a literal on the right-hand side",
            other.position(),
        )),
    }
}

fn list_operand(expr: Expr) -> Result<Vec<ConstantNode>, ParseError> {
    match expr {
        Expr::List { elements, .. } => elements.into_iter().map(constant_operand).collect(),
        other => Err(ParseError::unsupported(
            "'in' requires a list literal on the right-hand side",
            other.position(),
        )),
    }
}
