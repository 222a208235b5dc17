//! End-to-end tests over the configuration fixtures
//!
//! Each test parses a file from `test-fixtures/configs` with the bundled
//! expression interpreter and checks the resulting document.

use std::path::PathBuf;

use buildcfg_expr::{Bindings, Value, platform_bindings};
use buildcfg_parser::{Document, Error, ParseOptions, parse_file};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/configs")
        .join(name)
}

fn with_globals(globals: &[(&str, Value)]) -> ParseOptions {
    let bindings: Bindings = globals
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    ParseOptions::new().globals(move || bindings.clone())
}

fn to_json(doc: &Document) -> serde_json::Value {
    serde_json::to_value(doc).unwrap()
}

#[test]
fn test_buildout_production() {
    let options = with_globals(&[("tier", Value::from("prod")), ("debug", Value::Bool(true))]);
    let doc = parse_file(fixture("buildout.cfg"), &options).unwrap();

    assert_eq!(
        to_json(&doc),
        json!({
            "buildout": {
                "parts": "app\ntests",
                "develop": ".",
                "extends": "versions.cfg",
            },
            "versions": {},
            "app": {
                "recipe": "zc.recipe.egg",
                "<part-dependencies>": "base",
                "eggs": "myapp\nrequests",
                "interpreter": "py",
                "workers": "8",
            },
            "tests": {
                "recipe": "zc.recipe.testrunner",
                "eggs": "myapp [test]",
            },
            "scripts": {
                "install": "mkdir -p var/log\n\nif [ -d var/run ]; then\n  rm -rf var/run\nfi",
            },
        })
    );
    assert_eq!(
        doc.section_names().collect::<Vec<_>>(),
        ["buildout", "versions", "app", "tests", "scripts"]
    );
}

#[test]
fn test_buildout_development() {
    let options = with_globals(&[("tier", Value::from("dev")), ("debug", Value::Bool(false))]);
    let doc = parse_file(fixture("buildout.cfg"), &options).unwrap();

    assert_eq!(doc.get("app", "workers"), Some("1"));
    assert!(!doc.contains_section("tests"));
    assert_eq!(doc.section("app").unwrap().part_dependencies(), ["base"]);
}

#[rstest]
#[case("windows", "windows", "C:\\service")]
#[case("linux", "unix", "/srv/service")]
#[case("macos", "unix", "/srv/service")]
#[case("wasi", "wasm", "./service")]
fn test_platform_sections(#[case] os: &str, #[case] family: &str, #[case] root: &str) {
    let options = with_globals(&[("os", Value::from(os)), ("family", Value::from(family))]);
    let doc = parse_file(fixture("platform.cfg"), &options).unwrap();

    assert_eq!(doc.get("paths", "root"), Some(root));
    assert_eq!(doc.get("common", "name"), Some("service"));
}

#[test]
fn test_platform_sections_for_build_target() {
    let bindings = platform_bindings();
    let options = ParseOptions::new().globals(move || bindings.clone());
    let doc = parse_file(fixture("platform.cfg"), &options).unwrap();

    assert_eq!(doc.section("paths").map(|s| s.len()), Some(1));
}

#[test]
fn test_escaped_expressions() {
    let options = with_globals(&[("chr_semicolon", Value::from(";"))]);
    let doc = parse_file(fixture("escapes.cfg"), &options).unwrap();

    assert_eq!(
        to_json(&doc),
        json!({"hash": {"a": "1"}, "semicolon": {"b": "2"}, "nested": {"c": "3"}})
    );
}

#[test]
fn test_missing_global_is_expression_error() {
    let err = parse_file(fixture("escapes.cfg"), &ParseOptions::new()).unwrap_err();
    let Error::Expression(source) = &err else {
        panic!("expected expression error, got {err:?}");
    };
    assert_eq!(
        source.downcast_ref::<buildcfg_expr::Error>(),
        Some(&buildcfg_expr::Error::UnknownName("chr_semicolon".to_string()))
    );
}

#[test]
fn test_malformed_header_reports_file_and_line() {
    let err = parse_file(fixture("malformed.cfg"), &ParseOptions::new()).unwrap_err();

    assert!(matches!(err, Error::MissingSectionHeader { lineno: 4, .. }), "{err}");
    let message = err.to_string();
    assert!(message.contains("malformed.cfg, line 4"), "{message}");
    assert!(message.contains("'#' inside header"), "{message}");
}

#[test]
fn test_skipped_section_hides_bad_lines() {
    let doc = parse_file(fixture("skipped.cfg"), &ParseOptions::new()).unwrap();
    assert_eq!(to_json(&doc), json!({"kept": {"a": "1", "b": "2"}}));
}
