use clap::{Parser as ClapParser, Subcommand};
use query_filter::{
    cli::{self, CheckOptions, CheckResult, CliError, Mode},
    config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TERMS},
    ParseOptions,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "qfilter")]
#[command(about = "qfilter - parse, format and validate query filter expressions")]
#[command(version)]
struct Cli {
    /// Reject filters longer than this many bytes
    #[arg(long, global = true)]
    max_length: Option<usize>,

    /// Maximum nesting of parentheses and negations
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of comparisons in one filter
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TERMS)]
    max_terms: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a filter parses
    Check {
        /// The filter (reads from stdin if not provided)
        filter: Option<String>,
    },

    /// Print a filter in canonical form
    Fmt {
        /// The filter (reads from stdin if not provided)
        filter: Option<String>,

        /// Put spaces around every operator
        #[arg(short, long)]
        spaced: bool,
    },

    /// Print the JSON syntax tree of a filter
    Ast {
        /// The filter (reads from stdin if not provided)
        filter: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a filter and validate it against a schema
    Validate {
        /// The filter
        filter: String,

        /// Schema JSON (reads from stdin if not provided)
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'qfilter docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let parse = ParseOptions {
        max_length: cli.max_length,
        max_depth: cli.max_depth,
        max_terms: cli.max_terms,
    };

    let result = match cli.command {
        Commands::Check { filter } => run(filter, Mode::Check, None, false, false, parse),
        Commands::Fmt { filter, spaced } => run(filter, Mode::Format, None, spaced, false, parse),
        Commands::Ast { filter, pretty } => run(filter, Mode::Ast, None, false, pretty, parse),
        Commands::Validate { filter, schema } => {
            run(Some(filter), Mode::Validate, schema, false, false, parse)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_stdin() -> Result<Option<String>, CliError> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn run(
    filter: Option<String>,
    mode: Mode,
    schema: Option<String>,
    spaced: bool,
    pretty: bool,
    parse: ParseOptions,
) -> Result<(), CliError> {
    // stdin feeds the filter, or the schema when the filter is an argument
    let (filter, schema) = match (filter, mode) {
        (Some(filter), Mode::Validate) if schema.is_none() => (filter, read_stdin()?),
        (Some(filter), _) => (filter, schema),
        (None, _) => (read_stdin()?.ok_or(CliError::NoInput)?, schema),
    };

    let options = CheckOptions {
        filter,
        mode,
        schema,
        spaced,
        parse,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Filter is valid"),
        CheckResult::SchemaValid => println!("Filter is valid for the schema"),
        CheckResult::Formatted(text) => println!("{}", text),
        CheckResult::Ast(json) => {
            let text = if pretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            }?;
            println!("{}", text);
        }
    }
    Ok(())
}
