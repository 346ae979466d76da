//! Matchable grammar units.
//!
//! An [`Argument`] consumes a prefix of a token list and produces zero or
//! more typed values. The stock arguments are [`Constant`], [`Variable`],
//! [`Variadic`] and [`FlagSet`](crate::FlagSet); custom ones can be added
//! to a command with `add_argument`.

use std::fmt;

use crate::converter::SharedConverter;
use crate::error::MatchError;
use crate::Value;

/// Successful extraction: the unconsumed tokens and the produced values.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<'a> {
    /// Tokens left for the following arguments.
    pub rest: &'a [&'a str],
    /// Values produced by the argument, in order.
    pub values: Vec<Value>,
}

impl<'a> Extracted<'a> {
    pub fn new(rest: &'a [&'a str], values: Vec<Value>) -> Self {
        Self { rest, values }
    }
}

/// Failed extraction.
///
/// `rest` tells how far the argument got before failing, which feeds the
/// command's compatibility degree.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection<'a> {
    /// Tokens not consumed before the failure.
    pub rest: &'a [&'a str],
    /// Why the argument did not match.
    pub error: MatchError,
}

impl<'a> Rejection<'a> {
    pub fn new(rest: &'a [&'a str], error: MatchError) -> Self {
        Self { rest, error }
    }
}

/// Outcome of [`Argument::extract`].
pub type Extraction<'a> = std::result::Result<Extracted<'a>, Rejection<'a>>;

/// One matchable unit of a command grammar.
pub trait Argument: fmt::Debug + Send + Sync {
    /// Consumes a prefix of `tokens`.
    fn extract<'a>(&self, tokens: &'a [&'a str]) -> Extraction<'a>;

    /// Short token used in the command synopsis.
    fn synopsis(&self) -> String;

    /// Description lines for the usage legend.
    fn legend(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the argument consumes every remaining token. Nothing may be
    /// added after a trailing argument.
    fn is_trailing(&self) -> bool {
        false
    }
}

/// A literal keyword.
///
/// # Examples
///
/// ```
/// use command_match_core::{Argument, Constant, MatchError};
///
/// let run = Constant::new("run", true);
/// let out = run.extract(&["RUN", "now"]).unwrap();
/// assert_eq!(out.rest, ["now"]);
/// assert!(out.values.is_empty());
///
/// let err = run.extract(&[]).unwrap_err();
/// assert_eq!(err.error, MatchError::ArgNotFound);
/// ```
#[derive(Debug, Clone)]
pub struct Constant {
    text: String,
    insensitive: bool,
}

impl Constant {
    pub fn new(text: impl Into<String>, insensitive: bool) -> Self {
        Self {
            text: text.into(),
            insensitive,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn matches(&self, token: &str) -> bool {
        if self.insensitive {
            token
                .chars()
                .flat_map(char::to_lowercase)
                .eq(self.text.chars().flat_map(char::to_lowercase))
        } else {
            token == self.text
        }
    }
}

impl Argument for Constant {
    fn extract<'a>(&self, tokens: &'a [&'a str]) -> Extraction<'a> {
        match tokens.split_first() {
            Some((first, rest)) if self.matches(first) => Ok(Extracted::new(rest, Vec::new())),
            _ => Err(Rejection::new(tokens, MatchError::ArgNotFound)),
        }
    }

    fn synopsis(&self) -> String {
        self.text.clone()
    }
}

/// A positional value, required or defaulted.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    description: String,
    converter: SharedConverter,
    default: Option<Value>,
}

impl Variable {
    /// Creates a required variable.
    pub fn required(name: impl Into<String>, description: impl Into<String>, converter: SharedConverter) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            converter,
            default: None,
        }
    }

    /// Creates a variable that yields `default` when no token is left.
    pub fn with_default(
        name: impl Into<String>,
        description: impl Into<String>,
        converter: SharedConverter,
        default: Value,
    ) -> Self {
        Self {
            default: Some(default),
            ..Self::required(name, description, converter)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl Argument for Variable {
    fn extract<'a>(&self, tokens: &'a [&'a str]) -> Extraction<'a> {
        let Some((first, rest)) = tokens.split_first() else {
            return match &self.default {
                Some(def) => Ok(Extracted::new(tokens, vec![def.clone()])),
                None => Err(Rejection::new(tokens, MatchError::ArgNotFound)),
            };
        };

        match self.converter.convert(first) {
            Ok(value) => Ok(Extracted::new(rest, vec![value])),
            Err(error) => Err(Rejection::new(tokens, error)),
        }
    }

    fn synopsis(&self) -> String {
        if self.default.is_some() {
            format!("[{}]", self.name)
        } else {
            format!("<{}>", self.name)
        }
    }

    fn legend(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if let Some(detail) = self.converter.detail() {
            notes.push(detail);
        }
        if let Some(def) = &self.default {
            notes.push(format!("default: {def}"));
        }
        vec![legend_line(&self.name, &self.description, &notes)]
    }
}

/// Zero or more trailing values; must be the last argument of a command.
#[derive(Debug, Clone)]
pub struct Variadic {
    name: String,
    description: String,
    converter: SharedConverter,
}

impl Variadic {
    pub fn new(name: impl Into<String>, description: impl Into<String>, converter: SharedConverter) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            converter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Argument for Variadic {
    fn extract<'a>(&self, tokens: &'a [&'a str]) -> Extraction<'a> {
        let mut values = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            match self.converter.convert(token) {
                Ok(value) => values.push(value),
                Err(error) => return Err(Rejection::new(&tokens[i..], error)),
            }
        }
        Ok(Extracted::new(&[], values))
    }

    fn synopsis(&self) -> String {
        format!("[{}...]", self.name)
    }

    fn is_trailing(&self) -> bool {
        true
    }

    fn legend(&self) -> Vec<String> {
        let notes: Vec<String> = self.converter.detail().into_iter().collect();
        vec![legend_line(&self.name, &self.description, &notes)]
    }
}

pub(crate) fn legend_line(label: &str, description: &str, notes: &[String]) -> String {
    if notes.is_empty() {
        format!("\t{label}\t{description}")
    } else {
        format!("\t{label}\t{description} ({})", notes.join(", "))
    }
}
