//! The get command

use buildcfg_parser::{Document, Section};

use crate::error::{CliError, Result};

/// Run the get command
pub fn run_get(document: &Document, section: &str, key: Option<&str>) -> Result<()> {
    let found = document
        .section(section)
        .ok_or_else(|| CliError::not_found(format!("No section '{section}'")))?;

    match key {
        Some(key) => {
            let value = found
                .get(key)
                .ok_or_else(|| CliError::not_found(format!("No key '{key}' in section '{section}'")))?;
            println!("{value}");
        }
        None => print!("{}", render_section(found)),
    }
    Ok(())
}

/// Format a section back into `key = value` lines. Multi-line values are
/// written as indented continuation lines so the output parses again.
pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    for (key, value) in section {
        let mut lines = value.lines();
        match lines.next() {
            Some(first) => out.push_str(&format!("{key} = {first}\n")),
            None => out.push_str(&format!("{key} =\n")),
        }
        for line in lines {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    out
}
