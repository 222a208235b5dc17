//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// buildcfg - Read extended INI configuration files with conditional sections
#[derive(Parser, Debug)]
#[command(name = "buildcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file whose top-level table supplies header expression globals
    ///
    /// The file and every `--define` are validated before the configuration
    /// is read, so a bad value fails the command even when no header uses it.
    #[arg(long, global = true, value_name = "FILE", env = "BUILDCFG_GLOBALS")]
    pub globals: Option<PathBuf>,

    /// Define a header expression global (repeatable)
    ///
    /// The value is read as an expression literal (`3`, `True`, `['a', 'b']`)
    /// and taken as a plain string when it is not one.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", global = true)]
    pub defines: Vec<String>,

    /// Do not bind `os`, `arch` and `family` from the running platform
    #[arg(long, global = true)]
    pub no_platform: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse a configuration file and print the resulting document
    ///
    /// Examples:
    ///   buildcfg parse buildout.cfg
    ///   buildcfg parse buildout.cfg --format yaml
    ///   cat buildout.cfg | buildcfg parse -
    Parse {
        /// Configuration file, or `-` for stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// List the sections that survive their header conditions
    Sections {
        /// Configuration file, or `-` for stdin
        file: PathBuf,
    },

    /// Print one value, or a whole section as `key = value` lines
    ///
    /// Exits with status 2 when the section or key does not exist.
    Get {
        /// Configuration file, or `-` for stdin
        file: PathBuf,

        /// Section name
        section: String,

        /// Key within the section
        key: Option<String>,
    },
}

/// Output formats for `parse`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["buildcfg"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_parse_command_defaults_to_json() {
        let cli = Cli::parse_from(["buildcfg", "parse", "buildout.cfg"]);
        assert_eq!(
            cli.command,
            Some(Commands::Parse {
                file: PathBuf::from("buildout.cfg"),
                format: Format::Json,
            })
        );
    }

    #[test]
    fn parse_format_flag() {
        let cli = Cli::parse_from(["buildcfg", "parse", "-", "--format", "toml"]);
        assert_eq!(
            cli.command,
            Some(Commands::Parse {
                file: PathBuf::from("-"),
                format: Format::Toml,
            })
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "buildcfg",
            "get",
            "buildout.cfg",
            "buildout",
            "parts",
            "-v",
            "-D",
            "debug=True",
            "--define",
            "tier=prod",
            "--no-platform",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_platform);
        assert_eq!(cli.defines, ["debug=True", "tier=prod"]);
        assert_eq!(
            cli.command,
            Some(Commands::Get {
                file: PathBuf::from("buildout.cfg"),
                section: "buildout".to_string(),
                key: Some("parts".to_string()),
            })
        );
    }

    #[test]
    fn parse_get_without_key() {
        let cli = Cli::parse_from(["buildcfg", "get", "b.cfg", "versions"]);
        assert!(matches!(cli.command, Some(Commands::Get { key: None, .. })));
    }

    #[test]
    fn reject_unknown_format() {
        assert!(Cli::try_parse_from(["buildcfg", "parse", "b.cfg", "--format", "xml"]).is_err());
    }
}
