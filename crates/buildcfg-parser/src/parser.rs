//! Document builder: drives classification, header scanning, gating and
//! value accumulation over a line source.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use buildcfg_expr::{Bindings, Interpreter};

use crate::accumulator::Accumulator;
use crate::document::{Document, PART_DEPENDENCIES_KEY};
use crate::error::{Error, Result};
use crate::gate::{Evaluator, Gate, GlobalsProvider};
use crate::header::scan_header;
use crate::line::{LineKind, classify};

/// Options for a parse call.
///
/// Defaults: label `<string>`, the bundled [`Interpreter`] as evaluator, and
/// no globals provider.
pub struct ParseOptions {
    label: String,
    evaluator: Box<dyn Evaluator + Send + Sync>,
    globals: Option<Box<GlobalsProvider>>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            label: "<string>".to_string(),
            evaluator: Box::new(Interpreter::new()),
            globals: None,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("label", &self.label)
            .field("globals", &self.globals.is_some())
            .finish_non_exhaustive()
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in error messages, typically a file name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn evaluator(mut self, evaluator: impl Evaluator + Send + Sync + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Provider of extra bindings for header expressions.
    pub fn globals(mut self, provider: impl Fn() -> Bindings + Send + Sync + 'static) -> Self {
        self.globals = Some(Box::new(provider));
        self
    }
}

enum State {
    /// Before the first header.
    NoSection,
    /// Inside a section whose expression was false.
    Skipping,
    Active {
        section: String,
        pending: Option<Accumulator>,
    },
}

struct Builder<'a> {
    label: &'a str,
    gate: Gate<'a>,
    document: Document,
    state: State,
}

impl<'a> Builder<'a> {
    fn new(options: &'a ParseOptions, label: &'a str) -> Self {
        Self {
            label,
            gate: Gate::new(options.evaluator.as_ref(), options.globals.as_deref()),
            document: Document::new(),
            state: State::NoSection,
        }
    }

    fn flush(&mut self) {
        if let State::Active { section, pending } = &mut self.state {
            if let Some(accumulator) = pending.take() {
                let (key, value) = accumulator.finish();
                self.document.section_entry(section).insert(key, value);
            }
        }
    }

    fn line(&mut self, lineno: usize, line: &str) -> Result<()> {
        let kind = classify(line);
        tracing::trace!(lineno, ?kind, "Classified line");

        match kind {
            LineKind::ZeroIndentComment => Ok(()),
            LineKind::SectionHeader => self.header(lineno, line),
            _ if matches!(self.state, State::Skipping) => Ok(()),
            LineKind::Blank => {
                if let State::Active {
                    pending: Some(accumulator),
                    ..
                } = &mut self.state
                {
                    accumulator.push_blank();
                }
                Ok(())
            }
            LineKind::Directive { value } => self.start_key(lineno, line, PART_DEPENDENCIES_KEY, value),
            LineKind::KeyAssignment { key, value } => self.start_key(lineno, line, key, value),
            LineKind::Continuation => match &mut self.state {
                State::Active {
                    pending: Some(accumulator),
                    ..
                } => {
                    accumulator.push_continuation(line);
                    Ok(())
                }
                State::Active { pending: None, .. } => Err(Error::invalid_line(
                    self.label,
                    lineno,
                    line,
                    "indented line with no key to continue",
                )),
                _ => Err(no_section(self.label, lineno, line)),
            },
            LineKind::Unrecognized => match self.state {
                State::Active { .. } => Err(Error::invalid_line(
                    self.label,
                    lineno,
                    line,
                    "expected 'key = value'",
                )),
                _ => Err(no_section(self.label, lineno, line)),
            },
        }
    }

    fn start_key(&mut self, lineno: usize, line: &str, key: &str, value: &str) -> Result<()> {
        if !matches!(self.state, State::Active { .. }) {
            return Err(no_section(self.label, lineno, line));
        }
        self.flush();
        if let State::Active { pending, .. } = &mut self.state {
            *pending = Some(Accumulator::new(key, value));
        }
        Ok(())
    }

    fn header(&mut self, lineno: usize, line: &str) -> Result<()> {
        let header = match scan_header(line) {
            Ok(header) => header,
            Err(e) if matches!(self.state, State::Skipping) => {
                tracing::debug!(lineno, error = %e, "Ignoring malformed header in skipped section");
                return Ok(());
            }
            Err(e) => {
                return Err(Error::missing_section_header(self.label, lineno, line, e.to_string()));
            }
        };

        self.flush();
        let included = self
            .gate
            .admits(header.expression.as_deref())
            .map_err(Error::Expression)?;

        if included {
            if self.document.contains_section(&header.name) {
                tracing::debug!(section = %header.name, "Merging into existing section");
            } else {
                tracing::debug!(section = %header.name, "Entering section");
            }
            self.document.section_entry(&header.name);
            self.state = State::Active {
                section: header.name,
                pending: None,
            };
        } else {
            tracing::debug!(
                section = %header.name,
                expression = header.expression.as_deref().unwrap_or_default(),
                "Skipping section: condition is false"
            );
            self.state = State::Skipping;
        }
        Ok(())
    }

    fn finish(mut self) -> Document {
        self.flush();
        self.document
    }
}

fn no_section(label: &str, lineno: usize, line: &str) -> Error {
    Error::missing_section_header(label, lineno, line, "no section header before this line")
}

fn run(reader: impl BufRead, options: &ParseOptions, label: &str) -> Result<Document> {
    let mut builder = Builder::new(options, label);
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(label, e))?;
        builder.line(index + 1, &line)?;
    }
    let document = builder.finish();
    tracing::debug!(label, sections = document.len(), "Parsed configuration");
    Ok(document)
}

/// Parse a configuration with default options and the given label.
///
/// # Example
/// ```
/// use buildcfg_parser::parse;
///
/// let doc = parse("[foo]\n=> part1 part2\n".as_bytes(), "example").unwrap();
/// assert_eq!(doc.get("foo", "<part-dependencies>"), Some("part1 part2"));
/// ```
pub fn parse(reader: impl BufRead, label: &str) -> Result<Document> {
    parse_with(reader, &ParseOptions::new().label(label))
}

/// Parse an in-memory string with default options.
pub fn parse_str(text: &str, label: &str) -> Result<Document> {
    parse(text.as_bytes(), label)
}

/// Parse lines from `reader`. Either the whole input is accepted or the
/// first error is returned.
pub fn parse_with(reader: impl BufRead, options: &ParseOptions) -> Result<Document> {
    run(reader, options, &options.label)
}

/// Parse a file. The path replaces the label in `options`.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::io(&label, e))?;
    run(BufReader::new(file), options, &label)
}
