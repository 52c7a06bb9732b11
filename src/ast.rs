//! # Alert Filter Language - Syntax Trees
//!
//! This module defines both trees used by the filter front end: the generic
//! parse tree built by the parser and the typed AST handed to consumers.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Generic parse tree (raw literals, nested accessors, calls)
//! - **[operators]** - Operator enums for both trees
//! - **[constant]** - Typed literal values
//! - **[nodes]** - The typed AST returned by [`convert_to_ast`](crate::convert_to_ast)
//!
//! ## Quick Start
//!
//! ```text
//! severity == 'critical' && labels['team'].startsWith('db-')
//! ```
//!
//! This filter becomes a `LogicalNode{AND}` whose left side is an `EQ`
//! comparison and whose right side is a `STARTS_WITH` comparison on the
//! path `["labels", "team"]`.
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! Every comparison has a property path on the left and a literal on the
//! right. `in` is the only operator whose right side is a list:
//!
//! ```text
//! status in ['firing', 'pending']
//! ```
//!
//! ### Literal Types
//!
//! Literal types come from surface syntax alone:
//!
//! - `true` / `false` → boolean
//! - `42` → integer, `4.2` → float
//! - `'2025-01-20'` → date, `'2025-01-20T14:35:27.123456'` → datetime
//! - any other quoted text → string (weekday codes like `'MON'` included)
//!
//! ### Grouping
//!
//! Parentheses are dropped from the typed AST except directly under `!` or
//! `-`, where a [`ParenthesisNode`] records them:
//!
//! ```text
//! !(acknowledged)
//! ```
pub mod constant;
pub mod expressions;
pub mod nodes;
pub mod operators;
pub mod tokens;

pub use constant::Constant;
pub use expressions::Expr;
pub use nodes::{
    AstNode, ComparisonNode, ComparisonOperand, ConstantNode, LogicalNode, ParenthesisNode,
    PropertyAccessNode, UnaryNode,
};
pub use operators::{BinOp, ComparisonOperator, LogicalOperator, UnaryOp, UnaryOperator};
pub use tokens::Token;
