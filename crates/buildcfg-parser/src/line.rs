//! Line classification.
//!
//! Each raw line (without terminator) is put in exactly one class. The
//! checks run in a fixed order: blank, zero-indent comment, header,
//! directive, key assignment, then continuation.

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace only.
    Blank,
    /// `#` or `;` in column 0. Dropped wherever it appears.
    ZeroIndentComment,
    /// First non-whitespace character is `[`; still has to pass the header scanner.
    SectionHeader,
    /// `=> text`, with the trimmed text after the arrow.
    Directive { value: &'a str },
    /// `key = value` starting in column 0, split at the first `=`.
    KeyAssignment { key: &'a str, value: &'a str },
    /// Indented line that may extend the current value.
    Continuation,
    /// Column-0 text that fits no other class.
    Unrecognized,
}

/// Number of leading whitespace characters.
pub fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Classify a raw line.
///
/// # Example
/// ```
/// use buildcfg_parser::line::{LineKind, classify};
///
/// assert_eq!(
///     classify("b    += 1"),
///     LineKind::KeyAssignment { key: "b    +", value: "1" }
/// );
/// assert_eq!(classify("    more"), LineKind::Continuation);
/// ```
pub fn classify(line: &str) -> LineKind<'_> {
    let stripped = line.trim_start();
    if stripped.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(['#', ';']) {
        return LineKind::ZeroIndentComment;
    }
    if stripped.starts_with('[') {
        return LineKind::SectionHeader;
    }
    if let Some(rest) = stripped.strip_prefix("=>") {
        return LineKind::Directive { value: rest.trim() };
    }

    let indented = stripped.len() != line.len();
    if indented {
        return LineKind::Continuation;
    }
    match line.split_once('=') {
        Some((key, value)) if !key.trim_end().is_empty() => LineKind::KeyAssignment {
            key: key.trim_end(),
            value: value.trim(),
        },
        _ => LineKind::Unrecognized,
    }
}
