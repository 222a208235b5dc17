//! buildcfg CLI
//!
//! Reads extended INI configuration files, evaluating conditional section
//! headers against platform and user-supplied globals.

mod cli;
mod commands;
mod error;
mod globals;
mod logging;

use clap::Parser;
use colored::Colorize;

use buildcfg_parser::ParseOptions;
use cli::{Cli, Commands};
use error::Result;
use globals::GlobalsConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging unavailable: {}", "warning".yellow().bold(), e);
    }
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} extended INI configuration reader", "buildcfg".green().bold());
        println!();
        println!("Run {} for available commands.", "buildcfg --help".cyan());
        return Ok(());
    };

    // Globals are validated up front; the provider itself cannot fail.
    let bindings = globals::collect(&GlobalsConfig {
        platform: !cli.no_platform,
        file: cli.globals.as_deref(),
        defines: &cli.defines,
    })?;
    let options = ParseOptions::new().globals(move || bindings.clone());

    execute_command(command, options)
}

fn execute_command(cmd: Commands, options: ParseOptions) -> Result<()> {
    match cmd {
        Commands::Parse { file, format } => {
            let document = commands::load(&file, options)?;
            commands::run_parse(&document, format)
        }
        Commands::Sections { file } => {
            let document = commands::load(&file, options)?;
            commands::run_sections(&document)
        }
        Commands::Get { file, section, key } => {
            let document = commands::load(&file, options)?;
            commands::run_get(&document, &section, key.as_deref())
        }
    }
}
