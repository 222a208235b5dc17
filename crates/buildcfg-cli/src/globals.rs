//! Layered header expression globals.
//!
//! Later layers win: platform bindings, then the `--globals` TOML file, then
//! `--define` flags. Every layer is loaded and checked before parsing starts,
//! whether or not the configuration has any header expressions.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use buildcfg_expr::{Bindings, Interpreter, Value, platform_bindings};
use regex::Regex;

use crate::error::{CliError, Result};

static DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=(.*)$").expect("valid regex")
});

/// Sources of globals selected on the command line.
#[derive(Debug, Default)]
pub struct GlobalsConfig<'a> {
    pub platform: bool,
    pub file: Option<&'a Path>,
    pub defines: &'a [String],
}

/// Merge every configured layer into one set of bindings.
pub fn collect(config: &GlobalsConfig<'_>) -> Result<Bindings> {
    let mut bindings = if config.platform {
        platform_bindings()
    } else {
        Bindings::new()
    };

    if let Some(path) = config.file {
        let from_file = load_file(path)?;
        tracing::debug!(path = %path.display(), count = from_file.len(), "Loaded globals file");
        bindings.extend(from_file);
    }

    for define in config.defines {
        let (name, value) = parse_define(define)?;
        tracing::debug!(%name, value = %value.repr(), "Defined global");
        bindings.insert(name, value);
    }

    Ok(bindings)
}

/// Read a TOML file whose top-level table maps names to values.
pub fn load_file(path: &Path) -> Result<Bindings> {
    let text = fs::read_to_string(path).map_err(|e| CliError::GlobalsFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&text).map_err(|e| CliError::GlobalsFile {
        path: path.display().to_string(),
        message: e.message().to_string(),
    })
}

/// Split `NAME=VALUE` and interpret the value.
pub fn parse_define(define: &str) -> Result<(String, Value)> {
    let caps = DEFINE.captures(define).ok_or_else(|| {
        CliError::user(format!(
            "Invalid define '{define}': expected NAME=VALUE with NAME an identifier"
        ))
    })?;
    let raw = caps[2].trim();
    Ok((caps[1].to_string(), define_value(raw)))
}

/// A literal expression keeps its type; anything else is a plain string.
fn define_value(raw: &str) -> Value {
    match Interpreter::new().evaluate(raw, &Bindings::new()) {
        Ok(value) => value,
        Err(e) => {
            tracing::trace!(raw, error = %e, "Define is not a literal, using text");
            Value::Str(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("debug=True", "debug", Value::Bool(true))]
    #[case("jobs = 4", "jobs", Value::Int(4))]
    #[case("ratio=0.5", "ratio", Value::Float(0.5))]
    #[case("tier=prod", "tier", Value::from("prod"))]
    #[case("tier='prod'", "tier", Value::from("prod"))]
    #[case("parts=['app', 'db']", "parts", Value::from(vec!["app", "db"]))]
    #[case("empty=", "empty", Value::from(""))]
    #[case("eq=a=b", "eq", Value::from("a=b"))]
    fn test_parse_define(#[case] define: &str, #[case] name: &str, #[case] value: Value) {
        assert_eq!(parse_define(define).unwrap(), (name.to_string(), value));
    }

    #[rstest]
    #[case("novalue")]
    #[case("1abc=2")]
    #[case("a.b=1")]
    #[case("=1")]
    fn test_parse_define_rejects(#[case] define: &str) {
        assert!(matches!(parse_define(define), Err(CliError::User { .. })));
    }

    #[test]
    fn test_layers_override_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "os = \"plan9\"\ntier = \"dev\"\n\n[python]\nversion = [3, 12]").unwrap();
        let defines = vec!["tier=prod".to_string()];

        let bindings = collect(&GlobalsConfig {
            platform: true,
            file: Some(file.path()),
            defines: &defines,
        })
        .unwrap();

        assert_eq!(bindings.get("os"), Some(&Value::from("plan9")));
        assert_eq!(bindings.get("tier"), Some(&Value::from("prod")));
        assert!(bindings.contains_key("arch"));
        assert!(
            Interpreter::new()
                .is_true("python.version[1] == 12", &bindings)
                .unwrap()
        );
    }

    #[test]
    fn test_no_platform() {
        let bindings = collect(&GlobalsConfig::default()).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_invalid_globals_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [").unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, CliError::GlobalsFile { .. }));
    }
}
