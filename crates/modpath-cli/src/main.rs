#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modpath")]
#[command(author, version, about = "Rewrite import specifiers through aliases and root directories", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Directory relative paths are anchored on (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve import specifiers as written in a source file
    Resolve {
        /// Specifiers to resolve, e.g. "@utils/helper"
        #[arg(required = true)]
        specifiers: Vec<String>,

        /// The file the imports appear in
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// JSON configuration file (root, alias, extensions, ...)
        #[arg(long, value_name = "PATH", env = "MODPATH_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the configuration that applies to a file
    Options {
        /// The file to normalize the configuration for
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// JSON configuration file
        #[arg(long, value_name = "PATH", env = "MODPATH_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let process_cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let cwd = match cli.cwd {
        Some(dir) => process_cwd.join(dir),
        None => process_cwd,
    };

    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Resolve {
            specifiers,
            file,
            config,
        } => commands::resolve::run(&cwd, &specifiers, &file, config.as_deref(), cli.json),
        Commands::Options { file, config } => {
            commands::options::run(&cwd, &file, config.as_deref())
        }
    }
}
