//! Text to [`Value`] converters.
//!
//! A [`Converter`] turns one token into a typed value and answers whether a
//! candidate value belongs to the domain it produces. The latter is only
//! used while building commands, to reject defaults of the wrong type.

use std::fmt;
use std::sync::Arc;

use crate::error::{BuildError, MatchError, Result};
use crate::{Value, ValueKind};

/// Conversion of a text token into a typed [`Value`].
pub trait Converter: fmt::Debug + Send + Sync {
    /// Converts `token` into a value.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidValue`] when the token is empty or cannot
    /// be parsed into the converter's domain.
    fn convert(&self, token: &str) -> Result<Value>;

    /// Returns `true` when `value` is compatible with the converter's output.
    fn is_supported(&self, value: &Value) -> bool;

    /// Domain produced by [`convert`](Converter::convert).
    fn kind(&self) -> ValueKind;

    /// Checks the converter's own configuration at build time.
    fn validate(&self) -> std::result::Result<(), BuildError> {
        Ok(())
    }

    /// Extra detail appended to usage legends, e.g. `base: 16`.
    fn detail(&self) -> Option<String> {
        None
    }
}

/// Shared handle to a converter.
pub type SharedConverter = Arc<dyn Converter>;

fn invalid(token: &str, kind: ValueKind) -> MatchError {
    MatchError::InvalidValue {
        token: token.to_string(),
        kind,
    }
}

/// Keeps tokens as they are; rejects empty tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, token: &str) -> Result<Value> {
        if token.is_empty() {
            return Err(invalid(token, ValueKind::String));
        }
        Ok(Value::Str(token.to_string()))
    }

    fn is_supported(&self, value: &Value) -> bool {
        matches!(value, Value::Str(_))
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }
}

/// Parses signed 64-bit integers in a configurable base.
///
/// # Examples
///
/// ```
/// use command_match_core::{Converter, IntegerConverter, Value};
///
/// let hex = IntegerConverter::with_base(16);
/// assert_eq!(hex.convert("7b").unwrap(), Value::Int(123));
/// assert_eq!(IntegerConverter::default().convert("123").unwrap(), Value::Int(123));
/// assert!(hex.convert("").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter {
    /// Input base; 0 means decimal.
    pub base: u32,
}

impl IntegerConverter {
    /// Creates a converter for the given base (0 means decimal).
    pub fn with_base(base: u32) -> Self {
        Self { base }
    }

    /// Base actually used for parsing.
    pub fn radix(&self) -> u32 {
        if self.base == 0 { 10 } else { self.base }
    }
}

impl Converter for IntegerConverter {
    fn convert(&self, token: &str) -> Result<Value> {
        let radix = self.radix();
        if token.is_empty() || !(2..=36).contains(&radix) {
            return Err(invalid(token, ValueKind::Integer));
        }
        i64::from_str_radix(token, radix)
            .map(Value::Int)
            .map_err(|_| invalid(token, ValueKind::Integer))
    }

    fn is_supported(&self, value: &Value) -> bool {
        value.kind().is_numeric()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn validate(&self) -> std::result::Result<(), BuildError> {
        if (2..=36).contains(&self.radix()) {
            Ok(())
        } else {
            Err(BuildError::InvalidBase(self.base))
        }
    }

    fn detail(&self) -> Option<String> {
        Some(format!("base: {}", self.radix()))
    }
}

/// Parses the literals `true` and `false`.
///
/// An empty token converts to `true`, so a bare switch reads as enabled.
///
/// # Examples
///
/// ```
/// use command_match_core::{BooleanConverter, Converter, Value};
///
/// let strict = BooleanConverter::default();
/// assert_eq!(strict.convert("").unwrap(), Value::Bool(true));
/// assert!(strict.convert("TRUE").is_err());
///
/// let relaxed = BooleanConverter { insensitive: true };
/// assert_eq!(relaxed.convert("FaLsE").unwrap(), Value::Bool(false));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter {
    /// Compare literals ignoring ASCII case.
    pub insensitive: bool,
}

impl Converter for BooleanConverter {
    fn convert(&self, token: &str) -> Result<Value> {
        if token.is_empty() {
            return Ok(Value::Bool(true));
        }

        let eq = |literal: &str| {
            if self.insensitive {
                token.eq_ignore_ascii_case(literal)
            } else {
                token == literal
            }
        };

        if eq("true") {
            Ok(Value::Bool(true))
        } else if eq("false") {
            Ok(Value::Bool(false))
        } else {
            Err(invalid(token, ValueKind::Boolean))
        }
    }

    fn is_supported(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Boolean
    }
}

/// Parses 64-bit floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl Converter for FloatConverter {
    fn convert(&self, token: &str) -> Result<Value> {
        if token.is_empty() {
            return Err(invalid(token, ValueKind::Float));
        }
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid(token, ValueKind::Float))
    }

    fn is_supported(&self, value: &Value) -> bool {
        value.kind().is_numeric()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Float
    }
}

/// Returns the stock converter for a value domain.
///
/// Integers use `base`; booleans compare case-insensitively when
/// `insensitive` is set.
pub fn converter_for(kind: ValueKind, base: u32, insensitive: bool) -> SharedConverter {
    match kind {
        ValueKind::String => Arc::new(StringConverter),
        ValueKind::Integer => Arc::new(IntegerConverter::with_base(base)),
        ValueKind::Float => Arc::new(FloatConverter),
        ValueKind::Boolean => Arc::new(BooleanConverter { insensitive }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_rejects_empty() {
        assert_eq!(
            StringConverter.convert(""),
            Err(MatchError::InvalidValue {
                token: String::new(),
                kind: ValueKind::String
            })
        );
        assert_eq!(StringConverter.convert("abc"), Ok(Value::from("abc")));
    }

    #[test]
    fn test_integer_bases() {
        assert_eq!(IntegerConverter::with_base(16).convert("7b"), Ok(Value::Int(123)));
        assert_eq!(IntegerConverter::with_base(10).convert("123"), Ok(Value::Int(123)));
        assert_eq!(IntegerConverter::with_base(2).convert("101"), Ok(Value::Int(5)));
        assert_eq!(IntegerConverter::default().convert("-42"), Ok(Value::Int(-42)));
        assert!(IntegerConverter::default().convert("abc").is_err());
        assert!(IntegerConverter::default().convert("7b").is_err());
    }

    #[test]
    fn test_integer_invalid_base_never_panics() {
        let conv = IntegerConverter::with_base(1);
        assert!(conv.convert("1").is_err());
        assert_eq!(conv.validate(), Err(BuildError::InvalidBase(1)));
        assert_eq!(IntegerConverter::with_base(37).validate(), Err(BuildError::InvalidBase(37)));
        assert!(IntegerConverter::default().validate().is_ok());
    }

    #[test]
    fn test_integer_supports_numeric_values() {
        let conv = IntegerConverter::default();
        assert!(conv.is_supported(&Value::Int(1)));
        assert!(conv.is_supported(&Value::Float(1.0)));
        assert!(!conv.is_supported(&Value::from("1")));
        assert!(!conv.is_supported(&Value::Bool(true)));
    }

    #[test]
    fn test_boolean_literals() {
        let strict = BooleanConverter::default();
        assert_eq!(strict.convert("true"), Ok(Value::Bool(true)));
        assert_eq!(strict.convert("false"), Ok(Value::Bool(false)));
        assert!(strict.convert("False").is_err());
        assert!(strict.convert("123").is_err());

        let relaxed = BooleanConverter { insensitive: true };
        assert_eq!(relaxed.convert("TRUE"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_float() {
        assert_eq!(FloatConverter.convert("1.25"), Ok(Value::Float(1.25)));
        assert!(FloatConverter.convert("").is_err());
        assert!(FloatConverter.convert("x").is_err());
        assert!(FloatConverter.is_supported(&Value::Int(2)));
    }

    #[test]
    fn test_converter_for_kind() {
        assert_eq!(converter_for(ValueKind::Integer, 16, false).convert("ff"), Ok(Value::Int(255)));
        assert_eq!(converter_for(ValueKind::Boolean, 0, true).kind(), ValueKind::Boolean);
    }
}
