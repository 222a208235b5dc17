//! Section header scanning.
//!
//! A header is `[name]` or `[name: expression]`, optionally followed by a
//! `#` or `;` comment. The scan is purely lexical: `[ ( {` open and
//! `] ) }` close regardless of quoting, the first `:` at depth 1 splits
//! the name from the expression, and a literal `#` or `;` before the
//! closing bracket makes the header invalid. Expressions spell those two
//! characters as `\x23` and `\x3b`.
//!
//! Brackets inside string literals count too, so a literal holding an
//! unbalanced one must escape it: `\x28` for `(`, `\x29` for `)`, `\x5b`
//! for `[`, `\x5d` for `]`, `\x7b` for `{` and `\x7d` for `}`. Written
//! plainly, `')'` in `[g: ')' in x]` closes the header at that `)` and the
//! line is rejected with trailing text; `[g: '\x29' in x]` is accepted.

/// A successfully scanned header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Section name, trimmed.
    pub name: String,
    /// Condition text after the separator, trimmed.
    pub expression: Option<String>,
}

/// Why a header candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("'{found}' inside header at column {column}; use \\x23 or \\x3b in expressions")]
    CommentCharacter { found: char, column: usize },

    #[error("unbalanced brackets")]
    Unterminated,

    #[error("unexpected text after closing bracket at column {column}")]
    TrailingContent { column: usize },

    #[error("empty section name")]
    EmptyName,
}

/// Scan a header candidate line.
///
/// # Example
/// ```
/// use buildcfg_parser::header::scan_header;
///
/// let header = scan_header("[s: 2 in map(lambda i:i*2, [1])] # note").unwrap();
/// assert_eq!(header.name, "s");
/// assert_eq!(header.expression.as_deref(), Some("2 in map(lambda i:i*2, [1])"));
/// ```
pub fn scan_header(line: &str) -> Result<Header, HeaderError> {
    let offset = line.len() - line.trim_start().len();
    let Some(body) = line[offset..].strip_prefix('[') else {
        return Err(HeaderError::Unterminated);
    };
    // Byte offset of `body` within `line`, for column reporting.
    let body_start = offset + 1;
    let column = |byte: usize| line[..body_start + byte].chars().count();

    let mut depth = 1usize;
    let mut separator = None;
    let mut close = None;
    for (i, c) in body.char_indices() {
        match c {
            '#' | ';' => {
                return Err(HeaderError::CommentCharacter {
                    found: c,
                    column: column(i),
                });
            }
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ':' if depth == 1 && separator.is_none() => separator = Some(i),
            _ => {}
        }
    }
    let close = close.ok_or(HeaderError::Unterminated)?;

    let trailing = &body[close + 1..];
    let comment = trailing.trim_start();
    if !comment.is_empty() && !comment.starts_with(['#', ';']) {
        let at = close + 1 + (trailing.len() - comment.len());
        return Err(HeaderError::TrailingContent { column: column(at) });
    }

    let name = body[..separator.unwrap_or(close)].trim();
    if name.is_empty() {
        return Err(HeaderError::EmptyName);
    }
    let expression = separator.map(|s| body[s + 1..close].trim().to_string());

    Ok(Header {
        name: name.to_string(),
        expression,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, expression: Option<&str>) -> Header {
        Header {
            name: name.to_string(),
            expression: expression.map(str::to_string),
        }
    }

    #[test]
    fn test_plain_header() {
        assert_eq!(scan_header("[s1]"), Ok(header("s1", None)));
        assert_eq!(scan_header("[   s2  ]   # c"), Ok(header("s2", None)));
        assert_eq!(scan_header("[s3]; comment"), Ok(header("s3", None)));
    }

    #[test]
    fn test_expression_header() {
        assert_eq!(
            scan_header("[   s2 : 41 + 1 == 42  ]  # [true]"),
            Ok(header("s2", Some("41 + 1 == 42")))
        );
    }

    #[test]
    fn test_colon_inside_nested_brackets_is_not_separator() {
        assert_eq!(
            scan_header("[a (x:y)]"),
            Ok(header("a (x:y)", None))
        );
    }

    #[test]
    fn test_comment_may_contain_brackets() {
        assert_eq!(scan_header("[ d ]  # ["), Ok(header("d", None)));
        assert_eq!(scan_header("[ f ]  ; ]"), Ok(header("f", None)));
    }

    #[test]
    fn test_unbalanced_bracket_in_literal_needs_escape() {
        assert!(matches!(
            scan_header("[g: ')' in x]"),
            Err(HeaderError::TrailingContent { .. })
        ));
        assert_eq!(
            scan_header(r"[g: '\x29' in x]"),
            Ok(header("g", Some(r"'\x29' in x")))
        );
    }

    #[test]
    fn test_literal_hash_in_expression_is_rejected() {
        assert_eq!(
            scan_header("[a:'#' in '#;']"),
            Err(HeaderError::CommentCharacter {
                found: '#',
                column: 4
            })
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(scan_header("[a: f(1]"), Err(HeaderError::Unterminated));
        assert_eq!(scan_header("[a"), Err(HeaderError::Unterminated));
    }

    #[test]
    fn test_trailing_text() {
        assert_eq!(
            scan_header("[a] b"),
            Err(HeaderError::TrailingContent { column: 4 })
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(scan_header("[ ]"), Err(HeaderError::EmptyName));
        assert_eq!(scan_header("[: True]"), Err(HeaderError::EmptyName));
    }
}
