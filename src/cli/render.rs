//! Print parsed filters

use super::CliError;
use crate::{ParseConfig, convert_to_ast_with_config, output};

/// Output shape for a parsed filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// Compact JSON AST
    #[default]
    Json,
    /// Indented JSON AST
    PrettyJson,
    /// Canonical CEL text
    Cel,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub filter: String,
    pub format: RenderFormat,
    pub config: ParseConfig,
}

/// Parse a filter and render the resulting AST
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let ast = convert_to_ast_with_config(&options.filter, options.config)?;
    Ok(match options.format {
        RenderFormat::Json => output::to_json(&ast),
        RenderFormat::PrettyJson => output::to_json_pretty(&ast),
        RenderFormat::Cel => ast.to_string(),
    })
}
