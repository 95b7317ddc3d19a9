use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ParsedArgs;
use crate::error::ParseError;
use crate::schema::{Action, Declaration, Schema};
use crate::value::Value;

/// Matches token sequences against a schema
///
/// A parser holds no state between calls; `parse` can be called any number
/// of times, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    schema: &'a Schema,
}

impl<'a> Parser<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Parse a token sequence, excluding the program name
    pub fn parse<I>(&self, tokens: I) -> Result<ParsedArgs, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let declarations = self.schema.declarations();
        let mut occurrences: Vec<Vec<Value>> = vec![Vec::new(); declarations.len()];
        let mut queued: Vec<String> = Vec::new();
        let mut tokens = tokens.into_iter().map(Into::into);

        debug!(declarations = declarations.len(), "parsing arguments");

        while let Some(token) = tokens.next() {
            match self.schema.route(&token) {
                Some(route) => {
                    let decl = &declarations[route.index];
                    match route.action {
                        Action::Flag(value) => {
                            trace!(token = %token, name = decl.name(), value, "flag");
                            occurrences[route.index].push(Value::Boolean(value));
                        }
                        Action::TakeValue => {
                            let raw = tokens.next().ok_or_else(|| ParseError::MissingValue {
                                name: decl.name().to_string(),
                                alias: token.clone(),
                            })?;
                            trace!(token = %token, name = decl.name(), value = %raw, "key-value");
                            occurrences[route.index].push(coerce(decl, &raw)?);
                        }
                    }
                }
                None if is_option_like(&token) => {
                    return Err(ParseError::UnknownToken { token });
                }
                None => {
                    trace!(token = %token, "queued positional");
                    queued.push(token);
                }
            }
        }

        self.distribute(queued, &mut occurrences)?;

        let mut values = HashMap::with_capacity(declarations.len());
        for (decl, found) in declarations.iter().zip(occurrences) {
            let resolved = if !found.is_empty() {
                found
            } else if decl.is_required() {
                return Err(ParseError::MissingRequiredArgument {
                    name: decl.name().to_string(),
                });
            } else {
                decl.default().cloned().into_iter().collect()
            };
            values.insert(decl.name().to_string(), resolved);
        }

        debug!(resolved = values.len(), "arguments parsed");
        Ok(ParsedArgs::new(values))
    }

    /// Hand queued positional tokens to the positional declarations
    ///
    /// Each positional but the last takes one token in schema order; the last
    /// takes everything that remains, so a lone positional gets every token.
    fn distribute(
        &self,
        queued: Vec<String>,
        occurrences: &mut [Vec<Value>],
    ) -> Result<(), ParseError> {
        let positionals = self.schema.positionals();
        let Some((&last, leading)) = positionals.split_last() else {
            return match queued.into_iter().next() {
                Some(token) => Err(ParseError::UnexpectedPositional { token }),
                None => Ok(()),
            };
        };

        let declarations = self.schema.declarations();
        let mut queued = queued.into_iter();

        for &index in leading {
            match queued.next() {
                Some(raw) => occurrences[index].push(coerce(&declarations[index], &raw)?),
                None => return Ok(()),
            }
        }
        for raw in queued {
            occurrences[last].push(coerce(&declarations[last], &raw)?);
        }

        Ok(())
    }
}

fn coerce(decl: &Declaration, raw: &str) -> Result<Value, ParseError> {
    let value_type = decl.value_type();
    value_type
        .coerce(raw)
        .ok_or_else(|| ParseError::InvalidValue {
            name: decl.name().to_string(),
            value: raw.to_string(),
            expected: value_type.expected(),
        })
}

/// Dash-prefixed tokens are reserved for aliases; a bare "-" is a value
fn is_option_like(token: &str) -> bool {
    token.starts_with('-') && token != "-"
}
