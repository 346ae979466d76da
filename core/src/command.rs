//! Compiled commands.
//!
//! A [`Command`] is an ordered sequence of [`Argument`]s built with
//! [`CommandBuilder`](crate::CommandBuilder). Executing it feeds the token
//! list through every argument in declared order, collects the produced
//! values, and binds them to a handler once the whole list matched.

use std::fmt;

use tracing::debug;

use crate::argument::{Argument, Extracted, Rejection};
use crate::builder::CommandBuilder;
use crate::error::{MatchError, Mismatch};
use crate::handler::{Erased, ErasedHandler, Handler};
use crate::Value;

/// An ordered grammar of arguments.
///
/// Compiled commands are immutable; executing one never changes it, so a
/// command can be shared between threads and executed repeatedly.
///
/// # Examples
///
/// ```
/// use command_match_core::{Command, MatchError};
///
/// let greet = Command::builder("say hello")
///     .add_constant("hello", true)
///     .add_bool_flag("loud", "shout it")
///     .add_str_var("name", "who to greet")
///     .must_compile();
///
/// let mut greeting = String::new();
/// let consumed = greet
///     .execute(&["Hello", "--loud", "world"], |loud: bool, name: String| {
///         greeting = if loud { name.to_uppercase() } else { name };
///     })
///     .unwrap();
/// assert_eq!(consumed, 3);
/// assert_eq!(greeting, "WORLD");
///
/// let miss = greet.check(&["hello"]).unwrap_err();
/// assert_eq!(miss.consumed, 1);
/// assert_eq!(miss.error, MatchError::ArgNotFound);
/// ```
#[derive(Debug)]
pub struct Command {
    description: String,
    arguments: Vec<Box<dyn Argument>>,
}

impl Command {
    /// Starts building a command.
    pub fn builder(description: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(description)
    }

    pub(crate) fn new(description: String, arguments: Vec<Box<dyn Argument>>) -> Self {
        Self {
            description,
            arguments,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The compiled argument sequence.
    pub fn arguments(&self) -> &[Box<dyn Argument>] {
        &self.arguments
    }

    /// Matches `tokens` and returns the extracted values.
    ///
    /// # Errors
    ///
    /// Returns a [`Mismatch`] carrying the first argument failure, or
    /// [`MatchError::UnknownArgs`] when tokens remain after the grammar
    /// matched.
    pub fn extract<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Value>, Mismatch> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.extract_tokens(&tokens).map(|(_, values)| values)
    }

    /// Validates `tokens` against the grammar without calling anything.
    ///
    /// Returns the number of consumed tokens.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract).
    pub fn check<S: AsRef<str>>(&self, tokens: &[S]) -> Result<usize, Mismatch> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.extract_tokens(&tokens).map(|(consumed, _)| consumed)
    }

    /// Matches `tokens` and calls `handler` once with the extracted values.
    ///
    /// Returns the number of consumed tokens.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract), plus [`MatchError::Bind`] when
    /// the values do not fit the handler. The handler is only called after
    /// the whole token list matched and the values were bound.
    pub fn execute<S, H, M>(&self, tokens: &[S], handler: H) -> Result<usize, Mismatch>
    where
        S: AsRef<str>,
        H: Handler<M>,
    {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.dispatch(&tokens, &mut Erased::new(handler))
    }

    pub(crate) fn dispatch(
        &self,
        tokens: &[&str],
        handler: &mut (dyn ErasedHandler + '_),
    ) -> Result<usize, Mismatch> {
        let (consumed, values) = self.extract_tokens(tokens)?;
        handler.invoke(values).map_err(|err| Mismatch {
            consumed,
            error: err.into(),
        })?;
        Ok(consumed)
    }

    fn extract_tokens<'a>(&self, tokens: &'a [&'a str]) -> Result<(usize, Vec<Value>), Mismatch> {
        let mut rest = tokens;
        let mut values = Vec::new();

        for (position, argument) in self.arguments.iter().enumerate() {
            match argument.extract(rest) {
                Ok(Extracted { rest: left, values: produced }) => {
                    rest = left;
                    values.extend(produced);
                }
                Err(Rejection { rest: left, error }) => {
                    let consumed = tokens.len() - left.len();
                    debug!(
                        command = %self.description,
                        position,
                        consumed,
                        error = %error,
                        "Argument did not match"
                    );
                    return Err(Mismatch { consumed, error });
                }
            }
        }

        let consumed = tokens.len() - rest.len();
        if !rest.is_empty() {
            debug!(command = %self.description, consumed, trailing = rest.len(), "Unknown trailing arguments");
            return Err(Mismatch {
                consumed,
                error: MatchError::UnknownArgs { count: rest.len() },
            });
        }

        Ok((consumed, values))
    }

    /// One-line synopsis built from every argument's short token.
    pub fn synopsis(&self) -> String {
        self.arguments
            .iter()
            .map(|a| a.synopsis())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str("\t")?;
        } else {
            write!(f, "{}:\t", self.description)?;
        }
        write!(f, "> {}", self.synopsis())?;
        for line in self.arguments.iter().flat_map(|a| a.legend()) {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}
