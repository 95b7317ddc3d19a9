//! Declarative commandline argument parsing.
//!
//! A [`Schema`] declares positional, flag and key-value arguments. A
//! [`Parser`] bound to it turns a token sequence into [`ParsedArgs`], where
//! every argument resolves to the typed values of its occurrences in the
//! order they were given.
//!
//! ```ignore
//! use declargs::{flag, kv, pos, schema, Parser};
//!
//! let schema = schema()
//!     .arg(flag("verbose").short("-v").long("--verbose"))
//!     .arg(kv("count").short("-n").long("--count").number().default(1))
//!     .arg(pos("files").string())
//!     .build()?;
//!
//! let parsed = Parser::new(&schema).parse(["-v", "a.txt", "-n", "3", "b.txt"])?;
//! assert_eq!(parsed.strings("files"), ["a.txt", "b.txt"]);
//! assert_eq!(parsed.numbers("count"), [3.0]);
//! assert!(parsed.flag("verbose"));
//! ```
mod error;
mod parser;
mod schema;
mod value;

pub use error::{Error, ParseError, Result, SchemaError};
pub use parser::Parser;
pub use schema::{Aliases, Arg, ArgKind, Declaration, Kind, Schema, SchemaBuilder};
pub use stoml::{Array, Table};
pub use value::{Value, ValueType};

use std::collections::HashMap;

impl Schema {
    /// Parse a token sequence with a parser bound to this schema
    pub fn parse<I>(&self, tokens: I) -> std::result::Result<ParsedArgs, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Parser::new(self).parse(tokens)
    }
}

/// The result of parsing arguments
///
/// Every declared argument has an entry, possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    values: HashMap<String, Vec<Value>>,
}

impl ParsedArgs {
    pub(crate) fn new(values: HashMap<String, Vec<Value>>) -> Self {
        Self { values }
    }

    /// Check if an argument resolved to at least one value
    pub fn contains(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Get all values of an argument, `None` if it was never declared
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Get the last value of an argument
    pub fn last(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(|v| v.last())
    }

    /// All string values of an argument
    pub fn strings(&self, name: &str) -> Vec<&str> {
        self.iter_values(name).filter_map(Value::as_str).collect()
    }

    /// All number values of an argument
    pub fn numbers(&self, name: &str) -> Vec<f64> {
        self.iter_values(name).filter_map(Value::as_number).collect()
    }

    /// All boolean values of an argument
    pub fn bools(&self, name: &str) -> Vec<bool> {
        self.iter_values(name).filter_map(Value::as_bool).collect()
    }

    /// Get the last string value
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.last(name).and_then(|v| v.as_str())
    }

    /// Get the last number value
    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.last(name).and_then(|v| v.as_number())
    }

    /// Get the last boolean value
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.last(name).and_then(|v| v.as_bool())
    }

    /// Whether a flag is set: its last occurrence, or false if absent
    pub fn flag(&self, name: &str) -> bool {
        self.get_bool(name).unwrap_or(false)
    }

    /// Iterate over all arguments and their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Get all values as a reference to the internal map
    pub fn values(&self) -> &HashMap<String, Vec<Value>> {
        &self.values
    }

    /// Convert to a Table of arrays (useful for serialization)
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for (name, values) in &self.values {
            let mut array = Array::new();
            for value in values {
                array.push(value.to_toml());
            }
            table.insert(name.clone(), stoml::Value::Array(array));
        }
        table
    }

    fn iter_values(&self, name: &str) -> impl Iterator<Item = &Value> {
        self.values.get(name).into_iter().flatten()
    }
}

/// Convenience function to create a new SchemaBuilder
#[inline]
pub fn schema() -> SchemaBuilder {
    SchemaBuilder::new()
}

/// Convenience function to create a positional Arg
#[inline]
pub fn pos(name: impl Into<String>) -> Arg {
    Arg::positional(name)
}

/// Convenience function to create a flag Arg
#[inline]
pub fn flag(name: impl Into<String>) -> Arg {
    Arg::flag(name)
}

/// Convenience function to create a key-value Arg
#[inline]
pub fn kv(name: impl Into<String>) -> Arg {
    Arg::key_value(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_table_holds_arrays() {
        let schema = schema()
            .arg(kv("port").short("-p").number())
            .arg(flag("tls").long("--tls"))
            .build()
            .unwrap();
        let parsed = schema.parse(["-p", "8080", "--no-tls"]).unwrap();
        let table = parsed.to_table();

        assert!(table.contains_key("port"));
        assert!(table.get("port").and_then(|v| v.as_array()).is_some());
        assert!(table.get("tls").and_then(|v| v.as_array()).is_some());
    }

    #[test]
    fn accessors() {
        let schema = schema()
            .arg(kv("name").long("--name").string())
            .arg(flag("dry-run").long("--dry-run"))
            .build()
            .unwrap();
        let parsed = schema.parse(["--name", "a", "--name", "b"]).unwrap();

        assert!(parsed.contains("name"));
        assert!(!parsed.contains("dry-run"));
        assert!(!parsed.flag("dry-run"));
        assert_eq!(parsed.get_string("name"), Some("b"));
        assert_eq!(parsed.last("name"), Some(&Value::from("b")));
        assert_eq!(parsed.get("missing"), None);
        assert!(parsed.strings("missing").is_empty());
        assert_eq!(parsed.iter().count(), 2);
    }
}
