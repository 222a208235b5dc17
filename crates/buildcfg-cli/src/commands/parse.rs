//! The parse command

use buildcfg_parser::Document;

use crate::cli::Format;
use crate::error::{CliError, Result};

/// Run the parse command
pub fn run_parse(document: &Document, format: Format) -> Result<()> {
    let rendered = render(document, format)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Serialize the whole document, preserving section and key order.
pub fn render(document: &Document, format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(document)
            .map_err(|e| CliError::serialize(format.name(), e)),
        Format::Yaml => {
            serde_yaml::to_string(document).map_err(|e| CliError::serialize(format.name(), e))
        }
        Format::Toml => {
            toml::to_string(document).map_err(|e| CliError::serialize(format.name(), e))
        }
    }
}
