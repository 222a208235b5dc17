//! Command implementations for buildcfg-cli

pub mod get;
pub mod parse;
pub mod sections;

pub use get::run_get;
pub use parse::run_parse;
pub use sections::run_sections;

use std::io;
use std::path::Path;

use buildcfg_parser::{Document, ParseOptions, parse_file, parse_with};

use crate::error::Result;

/// Read a document from `file`, or from stdin when it is `-`.
pub fn load(file: &Path, options: ParseOptions) -> Result<Document> {
    let document = if file == Path::new("-") {
        let options = options.label("<stdin>");
        parse_with(io::stdin().lock(), &options)?
    } else {
        parse_file(file, &options)?
    };
    tracing::debug!(file = %file.display(), sections = document.len(), "Loaded document");
    Ok(document)
}
