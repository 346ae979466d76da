//! YAML grammar files.
//!
//! A grammar file lists commands, each made of an ordered argument list.
//! Argument entries are tagged by `kind`.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! commands:
//!   - name: greet
//!     description: say hello
//!     arguments:
//!       - kind: constant
//!         text: hello
//!         insensitive: true
//!       - kind: switch
//!         name: loud
//!       - kind: flag
//!         name: times
//!         type: integer
//!         default: 1
//!       - kind: variable
//!         name: who
//!         default: world
//!   - name: sum
//!     arguments:
//!       - kind: constant
//!         text: sum
//!       - kind: variadic
//!         name: numbers
//!         type: integer
//!         base: 16
//! ```

use std::cell::RefCell;
use std::io::BufReader;
use std::path::Path;

use command_match_core::{
    ClosingBuilder, Command, CommandBuilder, Compiler, Group, Rest, Value, ValueKind,
    converter_for,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::report::Matched;

fn string_kind() -> ValueKind {
    ValueKind::String
}

fn boolean_kind() -> ValueKind {
    ValueKind::Boolean
}

fn switch_found() -> Value {
    Value::Bool(true)
}

fn switch_missing() -> Value {
    Value::Bool(false)
}

/// One argument entry of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArgumentConfig {
    /// Literal keyword.
    Constant {
        text: String,
        #[serde(default)]
        insensitive: bool,
    },
    /// Positional value; defaulted when `default` is set.
    Variable {
        name: String,
        #[serde(rename = "type", default = "string_kind")]
        value_type: ValueKind,
        #[serde(default)]
        base: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
        #[serde(default)]
        insensitive: bool,
        #[serde(default)]
        description: String,
    },
    /// Named flag that takes a value.
    Flag {
        name: String,
        #[serde(rename = "type", default = "string_kind")]
        value_type: ValueKind,
        #[serde(default)]
        base: u32,
        default: Value,
        #[serde(default)]
        insensitive: bool,
        #[serde(default)]
        description: String,
    },
    /// Named flag whose presence alone yields `found`.
    Switch {
        name: String,
        #[serde(rename = "type", default = "boolean_kind")]
        value_type: ValueKind,
        #[serde(default)]
        base: u32,
        #[serde(default = "switch_found")]
        found: Value,
        #[serde(default = "switch_missing")]
        missing: Value,
        #[serde(default)]
        insensitive: bool,
        #[serde(default)]
        description: String,
    },
    /// Trailing catch-all.
    Variadic {
        name: String,
        #[serde(rename = "type", default = "string_kind")]
        value_type: ValueKind,
        #[serde(default)]
        base: u32,
        #[serde(default)]
        insensitive: bool,
        #[serde(default)]
        description: String,
    },
}

impl ArgumentConfig {
    fn label(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "a constant",
            Self::Variable { default: None, .. } => "a required variable",
            Self::Variable { .. } => "a defaulted variable",
            Self::Flag { .. } => "a flag",
            Self::Switch { .. } => "a switch",
            Self::Variadic { .. } => "a variadic",
        }
    }
}

/// A named command and its argument sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub arguments: Vec<ArgumentConfig>,
}

/// Builder position while an argument list is replayed.
enum Stage {
    Open(CommandBuilder),
    Closing(ClosingBuilder),
    Closed(Compiler),
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Self::Open(_) => "the command start",
            Self::Closing(_) => "a defaulted variable",
            Self::Closed(_) => "a variadic",
        }
    }

    fn push(self, argument: &ArgumentConfig) -> std::result::Result<Self, (&'static str, &'static str)> {
        use ArgumentConfig as A;

        let next = match (self, argument) {
            (Self::Open(b), A::Constant { text, insensitive }) => {
                Self::Open(b.add_constant(text, *insensitive))
            }
            (
                Self::Open(b),
                A::Variable {
                    name,
                    value_type,
                    base,
                    default: None,
                    insensitive,
                    description,
                },
            ) => Self::Open(b.add_variable(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
            )),
            (
                Self::Open(b),
                A::Variable {
                    name,
                    value_type,
                    base,
                    default: Some(default),
                    insensitive,
                    description,
                },
            ) => Self::Closing(b.add_variable_with_default(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
                default.clone(),
            )),
            (
                Self::Closing(b),
                A::Variable {
                    name,
                    value_type,
                    base,
                    default: Some(default),
                    insensitive,
                    description,
                },
            ) => Self::Closing(b.add_variable_with_default(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
                default.clone(),
            )),
            (
                Self::Open(b),
                A::Flag {
                    name,
                    value_type,
                    base,
                    default,
                    insensitive,
                    description,
                },
            ) => Self::Open(b.add_flag(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
                default.clone(),
            )),
            (
                Self::Open(b),
                A::Switch {
                    name,
                    value_type,
                    base,
                    found,
                    missing,
                    insensitive,
                    description,
                },
            ) => Self::Open(b.add_parameterless_flag(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
                found.clone(),
                missing.clone(),
            )),
            (
                Self::Open(b),
                A::Variadic {
                    name,
                    value_type,
                    base,
                    insensitive,
                    description,
                },
            ) => Self::Closed(b.add_variadic(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
            )),
            (
                Self::Closing(b),
                A::Variadic {
                    name,
                    value_type,
                    base,
                    insensitive,
                    description,
                },
            ) => Self::Closed(b.add_variadic(
                name,
                description,
                converter_for(*value_type, *base, *insensitive),
            )),
            (stage, argument) => return Err((argument.label(), stage.label())),
        };
        Ok(next)
    }

    fn compile(self) -> command_match_core::Result<Command> {
        match self {
            Self::Open(b) => b.compile(),
            Self::Closing(b) => b.compile(),
            Self::Closed(b) => b.compile(),
        }
    }
}

impl CommandConfig {
    /// Compiles the argument list into a [`Command`].
    ///
    /// The command's usage label is the description, or the name when the
    /// description is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Placement`] when an entry appears after a
    /// defaulted variable or a variadic that it cannot follow, or
    /// [`ConfigError::Build`] with the builder's error.
    pub fn compile(&self) -> Result<Command> {
        let label = if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        };

        let mut stage = Stage::Open(Command::builder(label.as_str()));
        for argument in &self.arguments {
            stage = stage
                .push(argument)
                .map_err(|(argument, after)| ConfigError::Placement {
                    command: self.name.clone(),
                    argument,
                    after,
                })?;
        }

        stage.compile().map_err(|source| ConfigError::Build {
            command: self.name.clone(),
            source,
        })
    }
}

/// Top-level grammar file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Grammar format version (e.g., `"1.0"`).
    pub version: String,
    pub commands: Vec<CommandConfig>,
}

impl GrammarConfig {
    /// Loads a grammar from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or
    /// [`ConfigError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Compiles every command in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCommands`] for an empty grammar, or the
    /// first command's compile error.
    pub fn compile(&self) -> Result<Vec<Command>> {
        if self.commands.is_empty() {
            return Err(ConfigError::NoCommands);
        }
        self.commands.iter().map(CommandConfig::compile).collect()
    }

    /// Compiles every command into a [`Group`] whose handlers record each
    /// match into `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn build_group<'h>(&self, sink: &'h RefCell<Vec<Matched>>) -> Result<Group<'h>> {
        let mut group = Group::new();
        for (index, (entry, command)) in self.commands.iter().zip(self.compile()?).enumerate() {
            debug!(index, command = %entry.name, synopsis = %command.synopsis(), "Compiled command");
            let name = entry.name.clone();
            group.add(command, move |values: Rest<Value>| {
                sink.borrow_mut().push(Matched {
                    index,
                    command: name.clone(),
                    values: values.into_inner(),
                });
            });
        }
        Ok(group)
    }
}
