use thiserror::Error;

use crate::value::ValueType;

/// Result type for schema construction and parsing
pub type Result<T> = std::result::Result<T, Error>;

/// A schema was rejected at construction time
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two declarations share a name
    #[error("argument '{name}' is declared more than once")]
    DuplicateName { name: String },

    /// A flag or key-value declaration has neither a short nor a long alias
    #[error("argument '{name}' needs a short or long alias")]
    MissingAlias { name: String },

    /// An alias (or a flag's negated form) is claimed by two declarations
    #[error("alias '{alias}' of argument '{name}' is already used by '{other}'")]
    DuplicateAlias {
        alias: String,
        name: String,
        other: String,
    },

    /// A positional or key-value declaration has no value type
    #[error("argument '{name}' has no value type")]
    MissingValueType { name: String },

    #[error("short alias '{alias}' of argument '{name}' must be a dash followed by one letter")]
    InvalidShortAlias { name: String, alias: String },

    #[error("long alias '{alias}' of argument '{name}' must be two dashes followed by a name")]
    InvalidLongAlias { name: String, alias: String },

    /// Positional arguments are matched by position only
    #[error("positional argument '{name}' cannot have an alias")]
    PositionalAlias { name: String },

    #[error("flag '{name}' must be boolean, not {value_type}")]
    FlagValueType { name: String, value_type: ValueType },

    #[error("default value of argument '{name}' must be a {expected}, got a {found}")]
    DefaultTypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("required argument '{name}' cannot have a default value")]
    RequiredWithDefault { name: String },

    /// A TOML schema entry is malformed
    #[error("invalid declaration '{name}': {reason}")]
    InvalidDeclaration { name: String, reason: String },

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] stoml::Error),
}

/// A token sequence did not match the schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A dash-prefixed token matched no declared alias
    #[error("unknown argument '{token}'")]
    UnknownToken { token: String },

    /// A key-value alias was the last token
    #[error("argument '{name}' requires a value after '{alias}'")]
    MissingValue { name: String, alias: String },

    /// Coercion of a raw token failed
    #[error("invalid value '{value}' for '{name}': expected {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// A required declaration received no occurrences
    #[error("required argument '{name}' was not provided")]
    MissingRequiredArgument { name: String },

    /// A positional token was given to a schema with no positional arguments
    ///
    /// Never raised when at least one positional is declared, since the last
    /// positional takes every remaining token.
    #[error("unexpected positional argument '{token}'")]
    UnexpectedPositional { token: String },
}

impl ParseError {
    /// The declaration the error is about, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            ParseError::MissingValue { name, .. }
            | ParseError::InvalidValue { name, .. }
            | ParseError::MissingRequiredArgument { name } => Some(name),
            ParseError::UnknownToken { .. } | ParseError::UnexpectedPositional { .. } => None,
        }
    }

    /// The offending token text, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::UnknownToken { token } | ParseError::UnexpectedPositional { token } => {
                Some(token)
            }
            ParseError::MissingValue { alias, .. } => Some(alias),
            ParseError::InvalidValue { value, .. } => Some(value),
            ParseError::MissingRequiredArgument { .. } => None,
        }
    }
}

/// Any error produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Print the error to stderr and exit with status 1
    pub fn exit(&self) -> ! {
        eprintln!("error: {}", self);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = ParseError::InvalidValue {
            name: "port".into(),
            value: "abc".into(),
            expected: ValueType::Number.expected(),
        };
        assert_eq!(err.to_string(), "invalid value 'abc' for 'port': expected a number");
        assert_eq!(err.name(), Some("port"));
        assert_eq!(err.token(), Some("abc"));

        let err = ParseError::UnknownToken {
            token: "--bar".into(),
        };
        assert_eq!(err.to_string(), "unknown argument '--bar'");
        assert_eq!(err.name(), None);
    }

    #[test]
    fn crate_error_is_transparent() {
        let err: Error = SchemaError::DuplicateName {
            name: "foo".into(),
        }
        .into();
        assert_eq!(err.to_string(), "argument 'foo' is declared more than once");
    }
}
