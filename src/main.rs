//! oapi-templ CLI
//!
//! Usage:
//!   oapi-templ template [OPTIONS] <TEMPLATE> <OUT>
//!   oapi-templ functions [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!   -v, --verbose        Log every matched file and include call
//!   -h, --help           Print help

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oapi_templ::{assemble_file, AssembleConfig, AssembleError, Config};

#[derive(Parser)]
#[command(name = "oapi-templ")]
#[command(about = "Assemble an OpenAPI document from many files through a template")]
struct Cli {
    /// Configuration file adding include functions (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every matched file and include call
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute TEMPLATE and write the assembled document to OUT
    ///
    /// Include patterns are resolved relative to the working directory. OUT is
    /// overwritten, and only written when the whole template succeeded.
    Template {
        /// Template file
        template: PathBuf,
        /// Output file
        out: PathBuf,
    },

    /// List the include functions available to templates
    Functions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "oapi_templ=debug"
    } else {
        "oapi_templ=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            if let Some(report) = err.query_error().and_then(|q| q.report()) {
                eprint!("{}", report);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AssembleError> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Template { template, out } => assemble_file(template, out, &config),
        Command::Functions => {
            for function in config.registry.iter() {
                println!("{}", function);
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AssembleConfig, AssembleError> {
    match path {
        Some(path) => {
            let config = Config::from_file(path)?;
            Ok(AssembleConfig::from_config(&config)?)
        }
        None => Ok(AssembleConfig::new()),
    }
}
