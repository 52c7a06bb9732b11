pub mod assembler;
pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod lexer;
pub mod literal;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{
    AstNode, BinOp, ComparisonNode, ComparisonOperand, ComparisonOperator, Constant, ConstantNode,
    Expr, LogicalNode, LogicalOperator, ParenthesisNode, PropertyAccessNode, Token, UnaryNode,
    UnaryOperator,
};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{DEFAULT_MAX_DEPTH, ErrorKind, ParseConfig, ParseError, Parser};
pub use value::Value;

use log::debug;

/// Convert filter text into a typed AST with the default [`ParseConfig`].
///
/// # Examples
///
/// ```
/// use cel_filter::{convert_to_ast, AstNode, ComparisonOperator};
///
/// let ast = convert_to_ast("labels['team'].name == 'db'").unwrap();
/// match ast {
///     AstNode::Comparison(c) => {
///         assert_eq!(c.operator, ComparisonOperator::Eq);
///         assert_eq!(c.first_operand.path, vec!["labels", "team", "name"]);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn convert_to_ast(text: &str) -> Result<AstNode, ParseError> {
    convert_to_ast_with_config(text, ParseConfig::default())
}

/// Convert filter text into a typed AST.
///
/// Each call owns all of its parsing state, so conversions can run
/// concurrently. On error nothing is returned but the error.
pub fn convert_to_ast_with_config(text: &str, config: ParseConfig) -> Result<AstNode, ParseError> {
    debug!("converting filter: {}", text);

    let mut parser = Parser::with_config(Lexer::new(text), config)?;
    let result = parser.parse().and_then(assembler::assemble);

    match &result {
        Ok(ast) => debug!("converted filter to {} node", ast.kind_name()),
        Err(e) => debug!("filter rejected ({:?}): {}", e.kind(), e),
    }
    result
}
