//! Reader for the extended INI format used by buildcfg.
//!
//! Turns text into an ordered mapping of section name to key/value strings.
//! On top of plain INI the format supports:
//!
//! - multi-line values through indented continuation lines
//! - conditional sections: `[name: expression]` is skipped when the
//!   expression is false, and same-named sections merge
//! - `#`/`;` comments in column 0 and after a header's closing bracket
//! - `=> a b` lines, stored under [`PART_DEPENDENCIES_KEY`]
//!
//! ```
//! use buildcfg_parser::parse_str;
//!
//! let doc = parse_str("[s: 2 + 2 == 5]\nx = 1\n[s: 41 + 1 == 42]\ny = 2\n", "example").unwrap();
//! assert_eq!(doc.get("s", "y"), Some("2"));
//! assert_eq!(doc.get("s", "x"), None);
//! ```

mod accumulator;
pub mod document;
pub mod error;
pub mod gate;
pub mod header;
pub mod line;
pub mod parser;

pub use buildcfg_expr::{Bindings, Interpreter, Value, platform_bindings};
pub use document::{Document, PART_DEPENDENCIES_KEY, Section};
pub use error::{BoxError, Error, Result};
pub use gate::{Evaluator, GlobalsProvider};
pub use header::{Header, HeaderError, scan_header};
pub use line::{LineKind, classify};
pub use parser::{ParseOptions, parse, parse_file, parse_str, parse_with};
