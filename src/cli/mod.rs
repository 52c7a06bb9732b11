//! CLI support for cel-filter
//!
//! Provides programmatic access to the `celf` commands for embedding in
//! other tools.

mod check;
mod convert;
mod render;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{json_to_value, value_to_json};
pub use render::{RenderFormat, RenderOptions, execute_render};

use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Filter could not be converted
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Input is neither a record nor a list of records
    #[error("Expected a JSON object or an array of objects, got {0}")]
    InvalidInput(&'static str),
}
