//! Command grammar matching and typed dispatch.
//!
//! This crate lets a program declare small grammars of accepted token
//! sequences and test runtime token lists against them:
//!
//! - [`Constant`]: a literal keyword, optionally case-insensitive.
//! - [`Variable`]: a required or defaulted positional value.
//! - [`FlagSet`]: named, order-independent flags (`-x`, `--xx`) occupying
//!   one position in the grammar.
//! - [`Variadic`]: a trailing catch-all.
//!
//! Tokens are converted to typed [`Value`]s by [`Converter`]s. A compiled
//! [`Command`] binds the extracted values to a [`Handler`] (any closure over
//! [`Param`] types) and calls it once the whole token list matched. A
//! [`Group`] dispatches one token list over several commands.
//!
//! Every failed match reports how many tokens were consumed before the
//! failure ([`Mismatch::consumed`]), which [`Group::closest`] uses to rank
//! near misses.
//!
//! # Example
//!
//! ```
//! use command_match_core::{Command, Group, Rest};
//!
//! let mut log = Vec::new();
//! {
//!     let mut group = Group::new();
//!     Command::builder("add numbers")
//!         .add_constant("add", false)
//!         .add_int_flag("base", "input base", 10, 0)
//!         .add_str_variadic("nums", "numbers to add")
//!         .to_group(&mut group, |base: u32, nums: Rest<String>| {
//!             let total: i64 = nums
//!                 .iter()
//!                 .filter_map(|n| i64::from_str_radix(n, base).ok())
//!                 .sum();
//!             log.push(total);
//!         })
//!         .unwrap();
//!
//!     assert_eq!(group.execute_first(&["add", "--base", "16", "a", "b"]), Some(0));
//!     assert_eq!(group.execute_first(&["sub", "1"]), None);
//! }
//! assert_eq!(log, vec![21]);
//! ```

mod argument;
mod builder;
mod command;
mod converter;
mod error;
mod flags;
mod group;
mod handler;
mod syntax;
mod value;

pub use argument::{Argument, Constant, Extracted, Extraction, Rejection, Variable, Variadic};
pub use builder::{ClosingBuilder, CommandBuilder, Compiler};
pub use command::Command;
pub use converter::{
    BooleanConverter, Converter, FloatConverter, IntegerConverter, SharedConverter,
    StringConverter, converter_for,
};
pub use error::{BindError, BuildError, MatchError, Mismatch, Result};
pub use flags::FlagSet;
pub use group::Group;
pub use handler::{Bindings, FromValue, Handler, Param, Rest};
pub use syntax::{flag_name, render_flag};
pub use value::{Value, ValueKind};
