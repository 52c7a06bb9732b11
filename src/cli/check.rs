//! Evaluate filters against JSON records

use super::{CliError, json_to_value, value_to_json};
use crate::{Evaluator, ParseConfig, Value, convert_to_ast_with_config};
use log::debug;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter to apply
    pub filter: String,
    /// JSON input string: one record or an array of records
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Parser limits
    pub config: ParseConfig,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Filter evaluated: `true`/`false` for one record, the matching
    /// records for an array
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let ast = convert_to_ast_with_config(&options.filter, options.config)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;

    let evaluator = Evaluator::new();
    let output = match json_to_value(json_value) {
        record @ Value::Object(_) => serde_json::Value::Bool(evaluator.matches(&ast, &record)?),
        Value::Array(records) => {
            let mut matched = Vec::new();
            for record in records {
                if evaluator.matches(&ast, &record)? {
                    matched.push(value_to_json(record));
                }
            }
            debug!("{} records matched", matched.len());
            serde_json::Value::Array(matched)
        }
        other => return Err(CliError::InvalidInput(other.type_name())),
    };

    Ok(CheckResult::Success(output))
}
