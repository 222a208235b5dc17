//! Multi-line value accumulation.

use crate::line::leading_whitespace;

/// How continuation lines are folded into the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// The key line carried text: continuation lines are trimmed and blank lines dropped.
    Inline,
    /// The key line was empty: indentation relative to the first continuation
    /// line is kept and interior blank lines are preserved.
    Block,
}

/// Collects the lines of one key's value until the next key, header or end of input.
#[derive(Debug)]
pub(crate) struct Accumulator {
    key: String,
    mode: Mode,
    fragments: Vec<String>,
    base_indent: Option<usize>,
}

impl Accumulator {
    pub(crate) fn new(key: impl Into<String>, inline: &str) -> Self {
        let (mode, fragments) = if inline.is_empty() {
            (Mode::Block, Vec::new())
        } else {
            (Mode::Inline, vec![inline.to_string()])
        };
        Self {
            key: key.into(),
            mode,
            fragments,
            base_indent: None,
        }
    }

    pub(crate) fn push_blank(&mut self) {
        if self.mode == Mode::Block {
            self.fragments.push(String::new());
        }
    }

    pub(crate) fn push_continuation(&mut self, line: &str) {
        let text = match self.mode {
            Mode::Inline => line.trim(),
            Mode::Block => {
                let indent = leading_whitespace(line);
                let strip = indent.min(*self.base_indent.get_or_insert(indent));
                let start = line
                    .char_indices()
                    .nth(strip)
                    .map_or(line.len(), |(i, _)| i);
                line[start..].trim_end()
            }
        };
        self.fragments.push(text.to_string());
    }

    /// Join the fragments, dropping blank fragments at either end.
    pub(crate) fn finish(self) -> (String, String) {
        let fragments = &self.fragments;
        let first = fragments.iter().position(|f| !f.is_empty());
        let value = match first {
            Some(first) => {
                let last = fragments.iter().rposition(|f| !f.is_empty()).unwrap_or(first);
                fragments[first..=last].join("\n")
            }
            None => String::new(),
        };
        (self.key, value)
    }
}
