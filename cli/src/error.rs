//! Error types for grammar loading.

use command_match_core::MatchError;
use thiserror::Error;

/// Errors raised while loading or compiling a grammar file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The grammar declares no command.
    #[error("grammar defines no commands")]
    NoCommands,

    /// An argument entry appears where the grammar cannot accept it.
    #[error("command '{command}': {argument} cannot follow {after}")]
    Placement {
        command: String,
        argument: &'static str,
        after: &'static str,
    },

    /// The command builder rejected an argument.
    #[error("command '{command}': {source}")]
    Build { command: String, source: MatchError },
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
