use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tsqlc::cli::{self, CliError, FormatOptions, LintOptions, SearchOptions};
use tsqlc::search::UsageContext;

#[derive(ClapParser)]
#[command(name = "tsqlc")]
#[command(about = "tsqlc - lex, parse, format and inspect T-SQL")]
#[command(version)]
struct Cli {
    /// SQL input file (reads from stdin if not provided)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every token, one per line
    Tokens,

    /// Parse the input and report how many statements it holds
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-format the input
    Format {
        /// Prefix one-part table names with this schema
        #[arg(long, value_name = "SCHEMA")]
        qualify: Option<String>,
    },

    /// Flag WHERE filters on LEFT JOINed tables
    Lint {
        #[arg(long)]
        json: bool,
    },

    /// Find the statements that use a table
    Search {
        /// Table name, e.g. dbo.orders
        table: String,

        /// Treat TABLE as a regular expression over the dotted name
        #[arg(long)]
        regex: bool,

        /// Only report these usages
        #[arg(long, value_enum, value_delimiter = ',')]
        context: Vec<UsageContext>,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = read_input(cli.input).and_then(|source| run(cli.command, &source));

    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr, filtered by `TSQLC_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("TSQLC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn read_input(path: Option<PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading input file");
            Ok(fs::read_to_string(path)?)
        }
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run(command: Commands, source: &str) -> Result<String, CliError> {
    match command {
        Commands::Tokens => cli::execute_tokens(source),
        Commands::Check { json } => {
            let report = cli::execute_check(source)?;
            if json {
                Ok(format!("{}\n", serde_json::to_string(&report)?))
            } else {
                Ok(format!(
                    "{} statement(s), {} token(s)\n",
                    report.statements, report.tokens
                ))
            }
        }
        Commands::Format { qualify } => cli::execute_format(source, &FormatOptions { qualify }),
        Commands::Lint { json } => cli::execute_lint(source, &LintOptions { json }),
        Commands::Search {
            table,
            regex,
            context,
            json,
        } => cli::execute_search(
            source,
            &SearchOptions {
                table,
                regex,
                contexts: context,
                json,
            },
        ),
    }
}
