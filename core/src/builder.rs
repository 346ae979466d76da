//! Fluent command builders.
//!
//! The builder narrows as arguments are added:
//!
//! - [`CommandBuilder`] accepts every kind of argument.
//! - [`ClosingBuilder`] is returned after a defaulted variable; only more
//!   defaulted variables or a variadic may follow.
//! - [`Compiler`] is returned after a variadic, which is always last.
//!
//! Validation failures are sticky: the first one is recorded together with
//! the argument position, every later call becomes a no-op, and
//! `compile` returns the recorded error.

use std::sync::Arc;

use crate::argument::{Argument, Constant, Variable, Variadic};
use crate::command::Command;
use crate::converter::{BooleanConverter, IntegerConverter, SharedConverter, StringConverter};
use crate::error::{BuildError, MatchError, Result};
use crate::flags::FlagSet;
use crate::group::Group;
use crate::handler::Handler;
use crate::syntax::{is_valid_constant, is_valid_var_name};
use crate::Value;

#[derive(Debug, Default)]
struct Draft {
    description: String,
    arguments: Vec<Box<dyn Argument>>,
    flags: Option<FlagSet>,
    error: Option<MatchError>,
}

impl Draft {
    fn next_index(&self) -> usize {
        self.arguments.len() + self.flags.as_ref().map_or(0, FlagSet::len)
    }

    fn fail(&mut self, source: BuildError) {
        let index = self.next_index();
        self.error = Some(MatchError::Build { index, source });
    }

    fn close_flags(&mut self) {
        if let Some(flags) = self.flags.take() {
            self.arguments.push(Box::new(flags));
        }
    }

    /// Fails when the last argument is trailing; returns whether more
    /// arguments may be added.
    fn accepts_more(&mut self) -> bool {
        let trailing = self
            .arguments
            .last()
            .filter(|a| a.is_trailing())
            .map(|a| a.synopsis());
        match trailing {
            Some(synopsis) => {
                self.fail(BuildError::AfterTrailing(synopsis));
                false
            }
            None => true,
        }
    }

    fn push(&mut self, argument: Box<dyn Argument>) {
        if !self.accepts_more() {
            return;
        }
        self.close_flags();
        self.arguments.push(argument);
    }

    fn constant(&mut self, text: &str, insensitive: bool) {
        if self.error.is_some() {
            return;
        }
        if !is_valid_constant(text) {
            return self.fail(BuildError::InvalidConstant(text.to_string()));
        }
        self.push(Box::new(Constant::new(text.trim(), insensitive)));
    }

    fn check_variable(&self, name: &str, converter: &SharedConverter) -> std::result::Result<(), BuildError> {
        if !is_valid_var_name(name) {
            return Err(BuildError::InvalidVariableName(name.to_string()));
        }
        converter.validate()
    }

    fn variable(&mut self, name: &str, description: &str, converter: SharedConverter, default: Option<Value>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.check_variable(name, &converter) {
            return self.fail(err);
        }
        let variable = match default {
            Some(default) if !converter.is_supported(&default) => {
                return self.fail(BuildError::UnsupportedDefault {
                    name: name.to_string(),
                    kind: converter.kind(),
                });
            }
            Some(default) => Variable::with_default(name, description, converter, default),
            None => Variable::required(name, description, converter),
        };
        self.push(Box::new(variable));
    }

    fn variadic(&mut self, name: &str, description: &str, converter: SharedConverter) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.check_variable(name, &converter) {
            return self.fail(err);
        }
        self.push(Box::new(Variadic::new(name, description, converter)));
    }

    fn flag(
        &mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        default: Value,
        found: Option<Value>,
    ) {
        if self.error.is_some() {
            return;
        }
        if !self.accepts_more() {
            return;
        }
        let mut flags = self.flags.take().unwrap_or_default();
        let added = match found {
            Some(found) => flags.add_parameterless(name, description, converter, found, default),
            None => flags.add(name, description, converter, default),
        };
        let failure = added.err();
        self.flags = Some(flags);
        if let Some(err) = failure {
            self.fail(err);
        }
    }

    fn argument(&mut self, argument: Box<dyn Argument>) {
        if self.error.is_some() {
            return;
        }
        self.push(argument);
    }

    fn compile(mut self) -> Result<Command> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.close_flags();
        if self.arguments.is_empty() {
            return Err(MatchError::NoArguments);
        }
        Ok(Command::new(self.description, self.arguments))
    }
}

macro_rules! defaulted_adders {
    () => {
        /// Adds a positional value that falls back to `default` when no
        /// token is left.
        pub fn add_variable_with_default(
            mut self,
            name: &str,
            description: &str,
            converter: SharedConverter,
            default: impl Into<Value>,
        ) -> ClosingBuilder {
            self.draft.variable(name, description, converter, Some(default.into()));
            ClosingBuilder { draft: self.draft }
        }

        pub fn add_str_var_with_default(self, name: &str, description: &str, default: &str) -> ClosingBuilder {
            self.add_variable_with_default(name, description, Arc::new(StringConverter), default)
        }

        pub fn add_int_var_with_default(
            self,
            name: &str,
            description: &str,
            default: i64,
            base: u32,
        ) -> ClosingBuilder {
            self.add_variable_with_default(name, description, Arc::new(IntegerConverter::with_base(base)), default)
        }

        /// Adds the trailing catch-all; nothing may follow it.
        pub fn add_variadic(mut self, name: &str, description: &str, converter: SharedConverter) -> Compiler {
            self.draft.variadic(name, description, converter);
            Compiler { draft: self.draft }
        }

        pub fn add_str_variadic(self, name: &str, description: &str) -> Compiler {
            self.add_variadic(name, description, Arc::new(StringConverter))
        }

        pub fn add_int_variadic(self, name: &str, description: &str, base: u32) -> Compiler {
            self.add_variadic(name, description, Arc::new(IntegerConverter::with_base(base)))
        }
    };
}

macro_rules! compile_methods {
    () => {
        /// Freezes the argument sequence.
        ///
        /// # Errors
        ///
        /// Returns the first recorded build error, or
        /// [`MatchError::NoArguments`] when nothing was added.
        pub fn compile(self) -> Result<Command> {
            self.draft.compile()
        }

        /// Same as [`compile`](Self::compile) but panics on error; meant for
        /// static command tables.
        ///
        /// # Panics
        ///
        /// Panics when the command failed to build.
        pub fn must_compile(self) -> Command {
            self.compile()
                .unwrap_or_else(|err| panic!("command-match: {err}"))
        }

        /// Compiles and adds the command with its handler to `group`.
        ///
        /// # Errors
        ///
        /// Same as [`compile`](Self::compile); the group is left untouched
        /// on error.
        pub fn to_group<'h, H, M>(self, group: &mut Group<'h>, handler: H) -> Result<()>
        where
            H: Handler<M> + 'h,
            M: 'h,
        {
            group.add(self.compile()?, handler);
            Ok(())
        }
    };
}

/// Builder accepting every kind of argument.
///
/// # Examples
///
/// ```
/// use command_match_core::{BuildError, Command, MatchError};
///
/// let err = Command::builder("broken")
///     .add_constant("run", false)
///     .add_str_var("bad name", "")
///     .add_str_var("ignored", "")
///     .compile()
///     .unwrap_err();
/// assert_eq!(
///     err,
///     MatchError::Build {
///         index: 1,
///         source: BuildError::InvalidVariableName("bad name".into()),
///     }
/// );
/// ```
#[derive(Debug)]
pub struct CommandBuilder {
    draft: Draft,
}

impl CommandBuilder {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            draft: Draft {
                description: description.into(),
                ..Draft::default()
            },
        }
    }

    /// The recorded build error, if any.
    pub fn error(&self) -> Option<&MatchError> {
        self.draft.error.as_ref()
    }

    /// Adds a literal keyword.
    pub fn add_constant(mut self, text: &str, insensitive: bool) -> Self {
        self.draft.constant(text, insensitive);
        self
    }

    /// Adds a required positional value.
    pub fn add_variable(mut self, name: &str, description: &str, converter: SharedConverter) -> Self {
        self.draft.variable(name, description, converter, None);
        self
    }

    pub fn add_str_var(self, name: &str, description: &str) -> Self {
        self.add_variable(name, description, Arc::new(StringConverter))
    }

    pub fn add_int_var(self, name: &str, description: &str, base: u32) -> Self {
        self.add_variable(name, description, Arc::new(IntegerConverter::with_base(base)))
    }

    /// Adds a flag that takes a value. Consecutive flags share one
    /// position in the argument sequence.
    pub fn add_flag(
        mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        default: impl Into<Value>,
    ) -> Self {
        self.draft.flag(name, description, converter, default.into(), None);
        self
    }

    /// Adds a flag whose presence alone yields `found`.
    pub fn add_parameterless_flag(
        mut self,
        name: &str,
        description: &str,
        converter: SharedConverter,
        found: impl Into<Value>,
        missing: impl Into<Value>,
    ) -> Self {
        self.draft
            .flag(name, description, converter, missing.into(), Some(found.into()));
        self
    }

    pub fn add_str_flag(self, name: &str, description: &str, default: &str) -> Self {
        self.add_flag(name, description, Arc::new(StringConverter), default)
    }

    pub fn add_int_flag(self, name: &str, description: &str, default: i64, base: u32) -> Self {
        self.add_flag(name, description, Arc::new(IntegerConverter::with_base(base)), default)
    }

    /// Adds a boolean switch: `true` when present, `false` otherwise, and
    /// an optional explicit `true`/`false` token.
    pub fn add_bool_flag(self, name: &str, description: &str) -> Self {
        self.add_parameterless_flag(name, description, Arc::new(BooleanConverter::default()), true, false)
    }

    /// Adds a custom argument.
    ///
    /// A trailing argument such as [`Variadic`] closes the command: any
    /// argument added after it fails compilation with
    /// [`BuildError::AfterTrailing`].
    pub fn add_argument(mut self, argument: impl Argument + 'static) -> Self {
        self.draft.argument(Box::new(argument));
        self
    }

    defaulted_adders!();
    compile_methods!();
}

/// Builder returned after a defaulted variable.
#[derive(Debug)]
pub struct ClosingBuilder {
    draft: Draft,
}

impl ClosingBuilder {
    pub fn error(&self) -> Option<&MatchError> {
        self.draft.error.as_ref()
    }

    defaulted_adders!();
    compile_methods!();
}

/// Builder returned after a variadic; only compilation remains.
#[derive(Debug)]
pub struct Compiler {
    draft: Draft,
}

impl Compiler {
    pub fn error(&self) -> Option<&MatchError> {
        self.draft.error.as_ref()
    }

    compile_methods!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FloatConverter, ValueKind};

    #[test]
    fn test_empty_command_does_not_compile() {
        assert_eq!(Command::builder("").compile().unwrap_err(), MatchError::NoArguments);
    }

    #[test]
    fn test_first_error_sticks() {
        let builder = Command::builder("")
            .add_constant("--", false)
            .add_int_var("n", "", 1)
            .add_str_var("bad name", "");
        assert_eq!(
            builder.error(),
            Some(&MatchError::Build {
                index: 0,
                source: BuildError::InvalidConstant("--".into())
            })
        );
    }

    #[test]
    fn test_invalid_base() {
        let err = Command::builder("")
            .add_constant("x", false)
            .add_int_var("n", "", 40)
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Build {
                index: 1,
                source: BuildError::InvalidBase(40)
            }
        );
    }

    #[test]
    fn test_default_type_mismatch() {
        let err = Command::builder("")
            .add_variable_with_default("n", "", Arc::new(IntegerConverter::default()), "ten")
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Build {
                index: 0,
                source: BuildError::UnsupportedDefault {
                    name: "n".into(),
                    kind: ValueKind::Integer
                }
            }
        );

        assert!(Command::builder("")
            .add_variable_with_default("f", "", Arc::new(FloatConverter), 3_i64)
            .compile()
            .is_ok());
    }

    #[test]
    fn test_flag_errors_report_position_within_set() {
        let err = Command::builder("")
            .add_constant("go", false)
            .add_bool_flag("a", "")
            .add_bool_flag("b1", "")
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Build {
                index: 2,
                source: BuildError::InvalidFlagName("b1".into())
            }
        );
    }

    #[test]
    fn test_consecutive_flags_share_one_position() {
        let c = Command::builder("")
            .add_bool_flag("a", "")
            .add_bool_flag("b", "")
            .add_str_var("s", "")
            .add_bool_flag("c", "")
            .must_compile();
        assert_eq!(c.arguments().len(), 3);
        assert_eq!(c.synopsis(), "[-a] [-b] <s> [-c]");
    }

    #[test]
    fn test_constant_text_is_trimmed() {
        let c = Command::builder("").add_constant(" run ", false).must_compile();
        assert_eq!(c.check(&["run"]), Ok(1));
    }

    #[test]
    fn test_nothing_follows_custom_variadic() {
        let err = Command::builder("")
            .add_argument(Variadic::new("rest", "", Arc::new(StringConverter)))
            .add_constant("end", false)
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Build {
                index: 1,
                source: BuildError::AfterTrailing("[rest...]".into())
            }
        );

        let err = Command::builder("")
            .add_constant("go", false)
            .add_argument(Variadic::new("rest", "", Arc::new(StringConverter)))
            .add_bool_flag("v", "")
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Build {
                index: 2,
                source: BuildError::AfterTrailing("[rest...]".into())
            }
        );
    }

    #[test]
    #[should_panic(expected = "no arguments")]
    fn test_must_compile_panics() {
        Command::builder("").must_compile();
    }
}
