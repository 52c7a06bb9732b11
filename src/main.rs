use cel_filter::{
    DEFAULT_MAX_DEPTH, ParseConfig,
    cli::{self, CheckOptions, CheckResult, CliError, RenderFormat, RenderOptions},
};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "celf")]
#[command(about = "celf - parse and evaluate CEL alert filters")]
#[command(version)]
struct Cli {
    /// Maximum nesting depth of groups and prefix operators
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the AST of a filter as JSON
    Parse {
        /// The filter expression
        filter: String,

        /// Indent the JSON AST
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the canonical form of a filter
    Fmt {
        /// The filter expression
        filter: String,
    },

    /// Validate a filter and evaluate it against JSON records
    Check {
        /// The filter expression
        filter: String,

        /// JSON record or array of records (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Indent the JSON result
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = ParseConfig {
        max_depth: cli.max_depth,
    };

    let result = match cli.command {
        Commands::Parse { filter, pretty } => {
            let format = if pretty {
                RenderFormat::PrettyJson
            } else {
                RenderFormat::Json
            };
            run_render(filter, format, config)
        }
        Commands::Fmt { filter } => run_render(filter, RenderFormat::Cel, config),
        Commands::Check {
            filter,
            input,
            pretty,
            syntax_only,
        } => run_check(filter, input, pretty, syntax_only, config),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_render(filter: String, format: RenderFormat, config: ParseConfig) -> Result<(), CliError> {
    let options = RenderOptions {
        filter,
        format,
        config,
    };
    println!("{}", cli::execute_render(&options)?);
    Ok(())
}

fn run_check(
    filter: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    config: ParseConfig,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        filter,
        input,
        syntax_only,
        config,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("ok"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
