//! The sections command

use buildcfg_parser::Document;

use crate::error::Result;

/// Run the sections command
pub fn run_sections(document: &Document) -> Result<()> {
    for name in document.section_names() {
        println!("{name}");
    }
    Ok(())
}
