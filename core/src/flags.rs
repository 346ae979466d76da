//! Flag sets.
//!
//! A [`FlagSet`] groups the flags declared consecutively on a command and
//! occupies a single position in its argument sequence. Extraction is a
//! small state machine:
//!
//! 1. *Scan*: stop as soon as the next token is not a known flag.
//! 2. *Recognize*: reset the flag to its "found" value (or clear it when it
//!    has none) and consume the flag token.
//! 3. *Lookahead*: when a following token exists and is not flag-like, try
//!    to convert it. Keep it on success, leave it in place on failure.
//!
//! Every declared flag yields exactly one value, in declaration order.
//! Values are tracked in a table local to each extraction, so a compiled
//! flag set is never mutated.

use tracing::trace;

use crate::argument::{legend_line, Argument, Extracted, Extraction, Rejection};
use crate::converter::SharedConverter;
use crate::error::{BuildError, MatchError};
use crate::syntax::{flag_name, is_valid_flag_name, looks_like_flag, render_flag};
use crate::Value;

#[derive(Debug, Clone)]
struct Flag {
    name: String,
    description: String,
    converter: SharedConverter,
    default: Value,
    found: Option<Value>,
}

/// A set of named, order-independent flags.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use command_match_core::{Argument, BooleanConverter, FlagSet, IntegerConverter, Value};
///
/// let mut flags = FlagSet::new();
/// flags.add("n", "count", Arc::new(IntegerConverter::default()), Value::Int(1)).unwrap();
/// flags
///     .add_parameterless("v", "verbose", Arc::new(BooleanConverter::default()), Value::Bool(true), Value::Bool(false))
///     .unwrap();
///
/// let out = flags.extract(&["-v", "-n", "5", "file"]).unwrap();
/// assert_eq!(out.values, vec![Value::Int(5), Value::Bool(true)]);
/// assert_eq!(out.rest, ["file"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag that takes a value; `default` is used when the flag is
    /// not given.
    ///
    /// # Errors
    ///
    /// Fails on an invalid or duplicate name, an invalid converter, or a
    /// default outside the converter's domain.
    pub fn add(
        &mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        default: Value,
    ) -> Result<(), BuildError> {
        self.push(name, description, converter, default, None)
    }

    /// Adds a flag whose presence alone conveys `found`; `missing` is used
    /// when the flag is not given. An explicit value may still follow it.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add), with both values checked.
    pub fn add_parameterless(
        &mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        found: Value,
        missing: Value,
    ) -> Result<(), BuildError> {
        self.push(name, description, converter, missing, Some(found))
    }

    fn push(
        &mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        default: Value,
        found: Option<Value>,
    ) -> Result<(), BuildError> {
        if !is_valid_flag_name(name) {
            return Err(BuildError::InvalidFlagName(name.to_string()));
        }
        if self.position(name).is_some() {
            return Err(BuildError::DuplicateFlag(name.to_string()));
        }
        converter.validate()?;
        for value in std::iter::once(&default).chain(found.as_ref()) {
            if !converter.is_supported(value) {
                return Err(BuildError::UnsupportedDefault {
                    name: name.to_string(),
                    kind: converter.kind(),
                });
            }
        }

        self.flags.push(Flag {
            name: name.to_string(),
            description: description.to_string(),
            converter,
            default,
            found,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Declared flag names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|f| f.name == name)
    }
}

impl Argument for FlagSet {
    fn extract<'a>(&self, tokens: &'a [&'a str]) -> Extraction<'a> {
        let mut current: Vec<Option<Value>> =
            self.flags.iter().map(|f| Some(f.default.clone())).collect();
        let mut rest = tokens;

        while let Some((token, after)) = rest.split_first() {
            let Some(index) = flag_name(token).and_then(|name| self.position(name)) else {
                break;
            };
            let flag = &self.flags[index];
            current[index] = flag.found.clone();
            rest = after;

            if let Some((next, after)) = rest.split_first().filter(|(next, _)| !looks_like_flag(next)) {
                match flag.converter.convert(next) {
                    Ok(value) => {
                        trace!(flag = %flag.name, value = %value, "Flag value consumed");
                        current[index] = Some(value);
                        rest = after;
                        continue;
                    }
                    Err(error) => {
                        trace!(flag = %flag.name, token = %next, error = %error, "Flag value rolled back");
                    }
                }
            }

            // A value flag named without a usable token gets the empty value,
            // when its converter has one.
            if flag.found.is_none() {
                if let Ok(value) = flag.converter.convert("") {
                    trace!(flag = %flag.name, value = %value, "Flag took empty value");
                    current[index] = Some(value);
                }
            }
        }

        let mut values = Vec::with_capacity(self.flags.len());
        for (flag, value) in self.flags.iter().zip(current) {
            match value {
                Some(value) => values.push(value),
                None => {
                    return Err(Rejection::new(
                        rest,
                        MatchError::MissingFlagValue(render_flag(&flag.name)),
                    ));
                }
            }
        }

        Ok(Extracted::new(rest, values))
    }

    fn synopsis(&self) -> String {
        self.flags
            .iter()
            .map(|f| format!("[{}]", render_flag(&f.name)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn legend(&self) -> Vec<String> {
        self.flags
            .iter()
            .map(|f| {
                let mut notes: Vec<String> = f.converter.detail().into_iter().collect();
                notes.push(format!("default: {}", f.default));
                legend_line(&render_flag(&f.name), &f.description, &notes)
            })
            .collect()
    }
}
