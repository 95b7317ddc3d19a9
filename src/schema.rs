use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use stoml::Table;
use tracing::debug;

use crate::error::SchemaError;
use crate::value::{Value, ValueType};

/// How an argument is matched against the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Matched by position among tokens that are not aliases
    Positional,
    /// Boolean from presence (`-f`, `--foo`) or negation (`-F`, `--no-foo`)
    Flag,
    /// Alias followed by a separate value token
    KeyValue,
}

impl ArgKind {
    /// Parse the name used in TOML schema documents
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "positional" => Some(ArgKind::Positional),
            "flag" => Some(ArgKind::Flag),
            "key-value" => Some(ArgKind::KeyValue),
            _ => None,
        }
    }
}

/// Declaration of a single argument, checked when the schema is built
#[derive(Debug, Clone)]
pub struct Arg {
    /// Key used for lookup in the parsed result
    pub name: String,
    pub kind: ArgKind,
    /// Short alias including its dash (e.g., "-v")
    pub short: Option<String>,
    /// Long alias including its dashes (e.g., "--verbose")
    pub long: Option<String>,
    pub value_type: Option<ValueType>,
    pub required: bool,
    /// Used when the argument never occurs; only for optional arguments
    pub default: Option<Value>,
}

impl Arg {
    fn with_kind(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            short: None,
            long: None,
            value_type: None,
            required: false,
            default: None,
        }
    }

    /// Create a new positional argument (required unless marked optional)
    pub fn positional(name: impl Into<String>) -> Self {
        let mut arg = Self::with_kind(name, ArgKind::Positional);
        arg.required = true;
        arg
    }

    /// Create a new boolean flag
    pub fn flag(name: impl Into<String>) -> Self {
        let mut arg = Self::with_kind(name, ArgKind::Flag);
        arg.value_type = Some(ValueType::Boolean);
        arg
    }

    /// Create a new key-value argument
    pub fn key_value(name: impl Into<String>) -> Self {
        Self::with_kind(name, ArgKind::KeyValue)
    }

    /// Set the short alias (e.g., "-v")
    pub fn short(mut self, alias: impl Into<String>) -> Self {
        self.short = Some(alias.into());
        self
    }

    /// Set the long alias (e.g., "--verbose")
    pub fn long(mut self, alias: impl Into<String>) -> Self {
        self.long = Some(alias.into());
        self
    }

    /// Set the value type
    pub fn value_type(mut self, t: ValueType) -> Self {
        self.value_type = Some(t);
        self
    }

    /// Shorthand for `value_type(ValueType::String)`
    pub fn string(self) -> Self {
        self.value_type(ValueType::String)
    }

    /// Shorthand for `value_type(ValueType::Number)`
    pub fn number(self) -> Self {
        self.value_type(ValueType::Number)
    }

    /// Shorthand for `value_type(ValueType::Boolean)`
    pub fn boolean(self) -> Self {
        self.value_type(ValueType::Boolean)
    }

    /// Set the default value
    pub fn default(mut self, v: impl Into<Value>) -> Self {
        self.default = Some(v.into());
        self
    }

    /// Mark this argument as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark this argument as optional with no default
    ///
    /// An optional argument that never occurs resolves to an empty sequence.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.default = None;
        self
    }
}

/// Aliases of a flag or key-value declaration; at least one is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliases {
    pub short: Option<String>,
    pub long: Option<String>,
}

/// A validated declaration's shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Positional,
    Flag(Aliases),
    KeyValue(Aliases),
}

/// A validated argument declaration
#[derive(Debug, Clone)]
pub struct Declaration {
    name: String,
    kind: Kind,
    value_type: ValueType,
    required: bool,
    default: Option<Value>,
}

impl Declaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// What a matched alias token does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Record a flag occurrence with this value
    Flag(bool),
    /// Consume the next token as the value
    TakeValue,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Route {
    pub index: usize,
    pub action: Action,
}

/// An immutable, validated set of argument declarations
#[derive(Debug, Clone)]
pub struct Schema {
    declarations: Vec<Declaration>,
    /// Map from alias token (including negated flag forms) to its route
    routes: HashMap<String, Route>,
    /// Positional declarations in schema order
    positionals: Vec<usize>,
}

impl Schema {
    /// Validate the declarations and build a schema
    pub fn new(args: impl IntoIterator<Item = Arg>) -> Result<Self, SchemaError> {
        let mut declarations: Vec<Declaration> = Vec::new();
        let mut routes = HashMap::new();
        let mut positionals = Vec::new();

        for arg in args {
            if declarations.iter().any(|d| d.name == arg.name) {
                return Err(SchemaError::DuplicateName { name: arg.name });
            }

            let index = declarations.len();
            let declaration = validate(arg)?;

            match &declaration.kind {
                Kind::Positional => positionals.push(index),
                Kind::Flag(aliases) => {
                    for (token, value) in flag_tokens(aliases) {
                        let route = Route {
                            index,
                            action: Action::Flag(value),
                        };
                        claim(&mut routes, &declarations, &declaration, token, route)?;
                    }
                }
                Kind::KeyValue(aliases) => {
                    for token in aliases.short.iter().chain(aliases.long.iter()) {
                        let route = Route {
                            index,
                            action: Action::TakeValue,
                        };
                        claim(&mut routes, &declarations, &declaration, token.clone(), route)?;
                    }
                }
            }

            declarations.push(declaration);
        }

        debug!(
            declarations = declarations.len(),
            aliases = routes.len(),
            positionals = positionals.len(),
            "schema validated"
        );

        Ok(Self {
            declarations,
            routes,
            positionals,
        })
    }

    /// Load a schema from a TOML file
    ///
    /// Each top-level table declares one argument, keyed by its name:
    ///
    /// ```toml
    /// [count]
    /// kind = "key-value"
    /// short = "-n"
    /// long = "--count"
    /// type = "number"
    /// default = 10
    /// ```
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let table = stoml::parse_file(path)?;
        Self::from_toml_table(&table)
    }

    /// Build a schema from an already parsed TOML table
    ///
    /// Declarations are registered in document order, so positionals are
    /// filled in the order their tables appear.
    pub fn from_toml_table(table: &Table) -> Result<Self, SchemaError> {
        let args = table
            .iter()
            .map(|(key, value)| arg_from_toml(key.to_string(), value))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(args)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Look up a declaration by name
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub(crate) fn route(&self, token: &str) -> Option<Route> {
        self.routes.get(token).copied()
    }

    pub(crate) fn positionals(&self) -> &[usize] {
        &self.positionals
    }
}

/// Builder for creating a schema
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    args: Vec<Arg>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument declaration
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Validate the declarations
    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.args)
    }
}

fn validate(arg: Arg) -> Result<Declaration, SchemaError> {
    let Arg {
        name,
        kind,
        short,
        long,
        value_type,
        required,
        default,
    } = arg;

    if let Some(alias) = &short
        && !is_short_alias(alias)
    {
        return Err(SchemaError::InvalidShortAlias {
            name,
            alias: alias.clone(),
        });
    }
    if let Some(alias) = &long
        && !is_long_alias(alias)
    {
        return Err(SchemaError::InvalidLongAlias {
            name,
            alias: alias.clone(),
        });
    }

    let kind = match kind {
        ArgKind::Positional => {
            if short.is_some() || long.is_some() {
                return Err(SchemaError::PositionalAlias { name });
            }
            Kind::Positional
        }
        ArgKind::Flag | ArgKind::KeyValue => {
            if short.is_none() && long.is_none() {
                return Err(SchemaError::MissingAlias { name });
            }
            let aliases = Aliases { short, long };
            if kind == ArgKind::Flag {
                Kind::Flag(aliases)
            } else {
                Kind::KeyValue(aliases)
            }
        }
    };

    let value_type = match (&kind, value_type) {
        (Kind::Flag(_), None | Some(ValueType::Boolean)) => ValueType::Boolean,
        (Kind::Flag(_), Some(value_type)) => {
            return Err(SchemaError::FlagValueType { name, value_type });
        }
        (_, Some(value_type)) => value_type,
        (_, None) => return Err(SchemaError::MissingValueType { name }),
    };

    if let Some(value) = &default {
        if required {
            return Err(SchemaError::RequiredWithDefault { name });
        }
        if value.value_type() != value_type {
            return Err(SchemaError::DefaultTypeMismatch {
                name,
                expected: value_type,
                found: value.value_type(),
            });
        }
    }

    Ok(Declaration {
        name,
        kind,
        value_type,
        required,
        default,
    })
}

fn is_short_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('-'), Some(c), None) if c.is_ascii_alphabetic()
    )
}

fn is_long_alias(alias: &str) -> bool {
    alias.len() > 2 && alias.starts_with("--")
}

/// Every token a flag answers to, with the value it records
fn flag_tokens(aliases: &Aliases) -> Vec<(String, bool)> {
    let mut tokens = Vec::new();
    if let Some(short) = &aliases.short {
        tokens.push((short.clone(), true));
        // Only a lowercase letter has a negated (uppercase) form
        if let Some(letter) = short[1..].chars().next()
            && letter.is_ascii_lowercase()
        {
            tokens.push((format!("-{}", letter.to_ascii_uppercase()), false));
        }
    }
    if let Some(long) = &aliases.long {
        tokens.push((long.clone(), true));
        tokens.push((format!("--no-{}", &long[2..]), false));
    }
    tokens
}

fn claim(
    routes: &mut HashMap<String, Route>,
    declarations: &[Declaration],
    declaration: &Declaration,
    token: String,
    route: Route,
) -> Result<(), SchemaError> {
    match routes.entry(token) {
        Entry::Occupied(entry) => {
            let other = declarations
                .get(entry.get().index)
                .map_or_else(|| declaration.name.clone(), |d| d.name.clone());
            Err(SchemaError::DuplicateAlias {
                alias: entry.key().clone(),
                name: declaration.name.clone(),
                other,
            })
        }
        Entry::Vacant(entry) => {
            entry.insert(route);
            Ok(())
        }
    }
}

fn arg_from_toml(name: String, value: &stoml::Value) -> Result<Arg, SchemaError> {
    let invalid = |name: &str, reason: String| SchemaError::InvalidDeclaration {
        name: name.to_string(),
        reason,
    };

    let table = value
        .as_table()
        .ok_or_else(|| invalid(&name, "expected a table".to_string()))?;

    let text = |key: &str| -> Result<Option<String>, SchemaError> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| invalid(&name, format!("'{}' must be a string", key))),
        }
    };

    let kind_name = text("kind")?.ok_or_else(|| invalid(&name, "missing 'kind'".to_string()))?;
    let kind = ArgKind::from_name(&kind_name)
        .ok_or_else(|| invalid(&name, format!("unknown kind '{}'", kind_name)))?;

    let value_type = match text("type")? {
        Some(type_name) => Some(
            ValueType::from_name(&type_name)
                .ok_or_else(|| invalid(&name, format!("unknown type '{}'", type_name)))?,
        ),
        None => None,
    };

    let required = match table.get("required") {
        None => kind == ArgKind::Positional,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| invalid(&name, "'required' must be a boolean".to_string()))?,
    };

    let default = match table.get("default") {
        None => None,
        Some(v) => Some(
            Value::from_toml(v)
                .ok_or_else(|| invalid(&name, "'default' must be a scalar".to_string()))?,
        ),
    };

    let short = text("short")?;
    let long = text("long")?;

    Ok(Arg {
        name,
        kind,
        short,
        long,
        value_type,
        required,
        default,
    })
}
