//! Integration tests for schemas declared in TOML files.

use std::io::Write;

use declargs::{Kind, ParseError, Schema, SchemaError, ValueType};
use tempfile::NamedTempFile;

fn load(source: &str) -> Result<Schema, SchemaError> {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();
    Schema::from_toml_file(file.path())
}

const SERVER: &str = r#"
[input]
kind = "positional"
type = "string"

[port]
kind = "key-value"
short = "-p"
long = "--port"
type = "number"
default = 8080

[verbose]
kind = "flag"
short = "-v"
long = "--verbose"

[mode]
kind = "key-value"
long = "--mode"
type = "string"
required = true
"#;

#[test]
fn loads_declarations() {
    let schema = load(SERVER).unwrap();
    let names: Vec<&str> = schema.declarations().iter().map(|d| d.name()).collect();
    assert_eq!(names, ["input", "port", "verbose", "mode"]);

    let port = schema.get("port").unwrap();
    assert_eq!(port.value_type(), ValueType::Number);
    assert!(!port.is_required());
    assert!(matches!(port.kind(), Kind::KeyValue(a) if a.short.as_deref() == Some("-p")));

    assert!(schema.get("input").unwrap().is_required());
    assert!(schema.get("mode").unwrap().is_required());
    assert_eq!(schema.get("verbose").unwrap().value_type(), ValueType::Boolean);
}

#[test]
fn parses_with_loaded_schema() {
    let schema = load(SERVER).unwrap();
    let err = schema
        .parse(["--mode", "fast", "-x", "site", "-v"])
        .unwrap_err();
    assert_eq!(err, ParseError::UnknownToken { token: "-x".into() });

    let parsed = schema.parse(["--mode", "fast", "site", "-V"]).unwrap();
    assert_eq!(parsed.strings("input"), ["site"]);
    assert_eq!(parsed.numbers("port"), [8080.0]);
    assert_eq!(parsed.bools("verbose"), [false]);
    assert_eq!(parsed.get_string("mode"), Some("fast"));
}

#[test]
fn positionals_fill_in_document_order() {
    let schema = load(
        "[source]\nkind = \"positional\"\ntype = \"string\"\n\n\
         [dest]\nkind = \"positional\"\ntype = \"string\"\n",
    )
    .unwrap();
    let names: Vec<&str> = schema.declarations().iter().map(|d| d.name()).collect();
    assert_eq!(names, ["source", "dest"]);

    let parsed = schema.parse(["a.txt", "b.txt"]).unwrap();
    assert_eq!(parsed.strings("source"), ["a.txt"]);
    assert_eq!(parsed.strings("dest"), ["b.txt"]);
}

#[test]
fn rejects_unknown_kind() {
    let err = load("[foo]\nkind = \"option\"\nlong = \"--foo\"\n").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDeclaration { name, .. } if name == "foo"));
}

#[test]
fn rejects_unknown_type() {
    let err = load("[foo]\nkind = \"key-value\"\nlong = \"--foo\"\ntype = \"integer\"\n").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDeclaration { .. }));
}

#[test]
fn rejects_non_table_entry() {
    let err = load("foo = 1\n").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDeclaration { .. }));
}

#[test]
fn validation_applies_to_toml() {
    let err = load("[foo]\nkind = \"key-value\"\ntype = \"string\"\n").unwrap_err();
    assert!(matches!(err, SchemaError::MissingAlias { .. }));

    let err = load("[n]\nkind = \"key-value\"\nlong = \"--n\"\ntype = \"number\"\ndefault = \"x\"\n")
        .unwrap_err();
    assert!(matches!(err, SchemaError::DefaultTypeMismatch { .. }));
}

#[test]
fn missing_file() {
    let err = Schema::from_toml_file("/nonexistent/declargs/schema.toml").unwrap_err();
    assert!(matches!(err, SchemaError::Toml(_)));
}
