//! Boolean expression engine for buildcfg section headers.
//!
//! Section headers may carry a condition (`[part: os == 'linux']`). This crate
//! evaluates such conditions in a small, side-effect free, Python-flavoured
//! language:
//!
//! - literals: integers, floats, `True`/`False`/`None`, quoted strings with
//!   `\xHH` escapes, lists `[...]` and tuples `(...)`
//! - boolean `and`/`or`/`not`, conditional `a if c else b`
//! - comparisons including `in`, `not in`, `is`, chained `a < b < c`
//! - arithmetic `+ - * / // %`
//! - builtins `len str int float bool any all min max`
//! - indexing and attribute lookup into maps supplied through [`Bindings`]

pub mod ast;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Expr;
pub use env::{Bindings, platform_bindings};
pub use error::{Error, Result};
pub use interpreter::Interpreter;
pub use parser::parse;
pub use value::Value;
