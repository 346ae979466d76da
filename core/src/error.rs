//! Error types for building and matching commands.
//!
//! Build-time problems are reported as [`BuildError`] wrapped in
//! [`MatchError::Build`] together with the position of the offending
//! argument. Handler binding problems are reported as [`BindError`].

use thiserror::Error;

use crate::ValueKind;

/// Errors that can occur while compiling, matching, or binding a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A command was compiled without any argument.
    #[error("no arguments to compile")]
    NoArguments,

    /// A required token is missing or a constant did not match.
    #[error("argument not found")]
    ArgNotFound,

    /// A token is empty or cannot be converted to the expected domain.
    #[error("invalid {kind} value {token:?}")]
    InvalidValue {
        /// The rejected token.
        token: String,
        /// The domain the token was converted to.
        kind: ValueKind,
    },

    /// The grammar matched but tokens were left over.
    #[error("{count} unknown trailing argument(s)")]
    UnknownArgs {
        /// Number of unconsumed tokens.
        count: usize,
    },

    /// A flag that requires a value was named without a usable one.
    #[error("flag {0} is missing its value")]
    MissingFlagValue(String),

    /// The command builder recorded an error.
    #[error("invalid argument #{index}: {source}")]
    Build {
        /// Position of the argument that failed validation.
        index: usize,
        /// The underlying validation failure.
        source: BuildError,
    },

    /// The extracted values do not fit the handler.
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Validation failures raised while building a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Constant text is empty or made only of dashes and whitespace.
    #[error("invalid constant {0:?}")]
    InvalidConstant(String),

    /// Variable names must match `[A-Za-z0-9_-]+`.
    #[error("invalid variable name {0:?}")]
    InvalidVariableName(String),

    /// Flag names must match `[A-Za-z]+`.
    #[error("invalid flag name {0:?}")]
    InvalidFlagName(String),

    /// The same flag name was declared twice in one flag set.
    #[error("duplicate flag {0:?}")]
    DuplicateFlag(String),

    /// Integer bases must be 0 (decimal) or within 2..=36.
    #[error("invalid base {0}")]
    InvalidBase(u32),

    /// An argument was added after one that consumes every remaining token.
    #[error("no argument may follow {0}")]
    AfterTrailing(String),

    /// A default value is outside the converter's domain.
    #[error("default value for {name:?} is not a valid {kind}")]
    UnsupportedDefault {
        /// Name of the variable or flag.
        name: String,
        /// Domain produced by the converter.
        kind: ValueKind,
    },
}

/// Failures while binding extracted values to a handler's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The number of values does not fit the handler signature.
    #[error("invalid handler params count [{expected}/{found}] (variadic: {variadic})")]
    Arity {
        /// Number of fixed parameters.
        expected: usize,
        /// Whether the handler accepts a variable tail.
        variadic: bool,
        /// Number of extracted values.
        found: usize,
    },

    /// A value cannot be converted to the parameter type.
    #[error("can't convert param #{index} from {found} to {expected}")]
    Incompatible {
        /// Position of the value.
        index: usize,
        /// Name of the parameter type.
        expected: &'static str,
        /// Domain of the extracted value.
        found: ValueKind,
    },

    /// A variable tail parameter appears before the last position.
    #[error("variadic handler parameter must be the last one")]
    RestNotLast,

    /// No handler is stored at the requested group index.
    #[error("no handler at index {0}")]
    NoHandler(usize),
}

/// A failed match together with its compatibility degree.
///
/// `consumed` counts the tokens matched before the failure, so callers can
/// rank near misses across several commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} (after {consumed} matched token(s))")]
pub struct Mismatch {
    /// Tokens successfully consumed before the failure.
    pub consumed: usize,
    /// Why matching stopped.
    #[source]
    pub error: MatchError,
}

/// Convenience alias for results with [`MatchError`].
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message_includes_position() {
        let err = MatchError::Build {
            index: 2,
            source: BuildError::InvalidBase(40),
        };
        assert_eq!(err.to_string(), "invalid argument #2: invalid base 40");
    }

    #[test]
    fn test_arity_message_marks_variadic() {
        let err = BindError::Arity {
            expected: 1,
            variadic: true,
            found: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid handler params count [1/0] (variadic: true)"
        );
    }
}
