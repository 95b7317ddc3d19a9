use std::fmt;

/// The type a declaration coerces its raw tokens into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Raw token text, unchanged
    String,
    /// A numeric literal
    Number,
    /// The literal text `true` or `false`
    Boolean,
}

impl ValueType {
    /// Parse the name used in TOML schema documents
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ValueType::String),
            "number" => Some(ValueType::Number),
            "boolean" => Some(ValueType::Boolean),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
        }
    }

    /// Description used in `InvalidValue` errors
    pub fn expected(self) -> &'static str {
        match self {
            ValueType::String => "a string",
            ValueType::Number => "a number",
            ValueType::Boolean => "`true` or `false`",
        }
    }

    /// Coerce raw token text, returning `None` if it is not a valid literal
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            ValueType::String => Some(Value::String(raw.to_string())),
            ValueType::Number => parse_number(raw).map(Value::Number),
            ValueType::Boolean => match raw {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value produced by coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Number(_) => ValueType::Number,
            Value::Boolean(_) => ValueType::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert into a stoml value. Integral numbers become TOML integers.
    pub fn to_toml(&self) -> stoml::Value {
        match self {
            Value::String(s) => stoml::Value::String(s.clone()),
            Value::Number(n) => match integral(*n) {
                Some(i) => stoml::Value::Integer(i),
                None => stoml::Value::Float(*n),
            },
            Value::Boolean(b) => stoml::Value::Boolean(*b),
        }
    }

    /// Convert from a stoml scalar, `None` for arrays and tables
    pub fn from_toml(value: &stoml::Value) -> Option<Self> {
        if let Some(s) = value.as_str() {
            Some(Value::String(s.to_string()))
        } else if let Some(i) = value.as_integer() {
            Some(Value::Number(i as f64))
        } else if let Some(f) = value.as_float() {
            Some(Value::Number(f))
        } else {
            value.as_bool().map(Value::Boolean)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None if n.is_infinite() && *n > 0.0 => f.write_str("Infinity"),
                None if n.is_infinite() => f.write_str("-Infinity"),
                None => write!(f, "{}", n),
            },
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

/// `Some(i)` if `n` is a whole number that fits in an i64
fn integral(n: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && n >= -LIMIT && n < LIMIT {
        Some(n as i64)
    } else {
        None
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        // Accumulate in f64 so literals wider than any integer type still coerce
        return digits
            .chars()
            .try_fold(0.0_f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            });
    }

    // f64::from_str also accepts "inf" and "nan", which are not literals here
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_is_identity() {
        assert_eq!(
            ValueType::String.coerce(" -x y "),
            Some(Value::String(" -x y ".into()))
        );
    }

    #[test]
    fn number_literals() {
        let n = |s| ValueType::Number.coerce(s).and_then(|v| v.as_number());
        assert_eq!(n("42"), Some(42.0));
        assert_eq!(n("-1.5"), Some(-1.5));
        assert_eq!(n("+3"), Some(3.0));
        assert_eq!(n("1e3"), Some(1000.0));
        assert_eq!(n(" 7 "), Some(7.0));
        assert_eq!(n("0x1f"), Some(31.0));
        assert_eq!(n("0o17"), Some(15.0));
        assert_eq!(n("0b101"), Some(5.0));
        assert_eq!(n("0x1000000000000000000000000000000000"), Some(2f64.powi(132)));
        assert_eq!(n("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn number_rejects_garbage() {
        for raw in ["", "  ", "abc", "NaN", "nan", "inf", "12px", "0x", "0xzz", "1.2.3"] {
            assert_eq!(ValueType::Number.coerce(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn boolean_is_exact() {
        assert_eq!(ValueType::Boolean.coerce("true"), Some(Value::Boolean(true)));
        assert_eq!(ValueType::Boolean.coerce("false"), Some(Value::Boolean(false)));
        for raw in ["True", "1", "yes", "", " true"] {
            assert_eq!(ValueType::Boolean.coerce(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn display_round_trips_token_text() {
        for raw in ["true", "false"] {
            let value = ValueType::Boolean.coerce(raw).unwrap();
            assert_eq!(value.to_string(), raw);
        }
        assert_eq!(ValueType::Number.coerce("42").unwrap().to_string(), "42");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn type_names() {
        for ty in [ValueType::String, ValueType::Number, ValueType::Boolean] {
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ValueType::from_name("integer"), None);
    }

    #[test]
    fn toml_conversion() {
        assert_eq!(Value::Number(8080.0).to_toml().as_integer(), Some(8080));
        assert_eq!(Value::Number(0.5).to_toml().as_float(), Some(0.5));
        assert_eq!(
            Value::from_toml(&stoml::Value::Integer(7)),
            Some(Value::Number(7.0))
        );
        assert_eq!(
            Value::from_toml(&stoml::Value::Boolean(true)),
            Some(Value::Boolean(true))
        );
    }
}
