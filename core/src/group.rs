//! Groups of commands sharing one input.
//!
//! A [`Group`] holds ordered (command, handler) pairs and dispatches a token
//! list either to every matching pair ([`Group::execute_all`]) or only to
//! the first one ([`Group::execute_first`]). A command that fails to match
//! is simply skipped.

use std::fmt;

use tracing::debug;

use crate::command::Command;
use crate::error::BindError;
use crate::handler::{Erased, ErasedHandler, Handler};
use crate::Value;

struct Pair<'h> {
    command: Command,
    handler: Box<dyn ErasedHandler + 'h>,
}

/// Ordered (command, handler) pairs.
///
/// Duplicate grammars are allowed; with [`execute_all`](Self::execute_all)
/// all of them run.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use command_match_core::{Command, Group};
///
/// let started = Cell::new(false);
/// let stopped = Cell::new(false);
///
/// let mut group = Group::new();
/// Command::builder("start")
///     .add_constant("start", false)
///     .to_group(&mut group, || started.set(true))
///     .unwrap();
/// Command::builder("stop")
///     .add_constant("stop", false)
///     .to_group(&mut group, || stopped.set(true))
///     .unwrap();
///
/// assert_eq!(group.execute_first(&["stop"]), Some(1));
/// assert!(!started.get() && stopped.get());
/// assert_eq!(group.execute_first(&["restart"]), None);
/// ```
#[derive(Default)]
pub struct Group<'h> {
    pairs: Vec<Pair<'h>>,
}

impl<'h> Group<'h> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends a command and its handler.
    pub fn add<H, M>(&mut self, command: Command, handler: H) -> &mut Self
    where
        H: Handler<M> + 'h,
        M: 'h,
    {
        self.pairs.push(Pair {
            command,
            handler: Box::new(Erased::new(handler)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The command stored at `index`.
    pub fn command(&self, index: usize) -> Option<&Command> {
        self.pairs.get(index).map(|p| &p.command)
    }

    /// Calls the handler at `index` directly with `values`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::NoHandler`] for an out-of-range index, or the
    /// handler's binding error.
    pub fn call(&mut self, index: usize, values: Vec<Value>) -> Result<(), BindError> {
        let pair = self
            .pairs
            .get_mut(index)
            .ok_or(BindError::NoHandler(index))?;
        pair.handler.invoke(values)
    }

    /// Runs every pair whose command matches `tokens`.
    ///
    /// Returns the number of handlers called.
    pub fn execute_all<S: AsRef<str>>(&mut self, tokens: &[S]) -> usize {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let mut matched = 0;
        for (index, pair) in self.pairs.iter_mut().enumerate() {
            match pair.command.dispatch(&tokens, pair.handler.as_mut()) {
                Ok(_) => matched += 1,
                Err(miss) => debug!(index, consumed = miss.consumed, error = %miss.error, "Command skipped"),
            }
        }
        matched
    }

    /// Runs the first pair whose command matches `tokens` and returns its
    /// index; later pairs are not tried.
    pub fn execute_first<S: AsRef<str>>(&mut self, tokens: &[S]) -> Option<usize> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        for (index, pair) in self.pairs.iter_mut().enumerate() {
            match pair.command.dispatch(&tokens, pair.handler.as_mut()) {
                Ok(_) => return Some(index),
                Err(miss) => debug!(index, consumed = miss.consumed, error = %miss.error, "Command skipped"),
            }
        }
        None
    }

    /// Finds the command that matched the most tokens, without calling any
    /// handler.
    ///
    /// Returns `(index, consumed)`; ties go to the earlier command. Useful
    /// for pointing at the most likely intended command after a miss.
    pub fn closest<S: AsRef<str>>(&self, tokens: &[S]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (index, pair) in self.pairs.iter().enumerate() {
            let consumed = match pair.command.check(tokens) {
                Ok(consumed) => consumed,
                Err(miss) => miss.consumed,
            };
            if best.is_none_or(|(_, top)| consumed > top) {
                best = Some((index, consumed));
            }
        }
        best
    }

    /// Iterates over the stored commands in order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.pairs.iter().map(|p| &p.command)
    }
}

impl fmt::Debug for Group<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("commands", &self.commands().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Group<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn keyword_group<'h>(hits: &'h [Cell<u32>; 3], keywords: [&str; 3]) -> Group<'h> {
        let mut group = Group::new();
        for (hit, keyword) in hits.iter().zip(keywords) {
            Command::builder("")
                .add_constant(keyword, false)
                .to_group(&mut group, move || hit.set(hit.get() + 1))
                .unwrap();
        }
        group
    }

    fn counts(hits: &[Cell<u32>; 3]) -> [u32; 3] {
        [hits[0].get(), hits[1].get(), hits[2].get()]
    }

    #[test]
    fn test_execute_all_disjoint() {
        let hits = Default::default();
        let mut group = keyword_group(&hits, ["cmd0", "cmd1", "cmd2"]);

        assert_eq!(group.execute_all(&["notcmd"]), 0);
        assert_eq!(counts(&hits), [0, 0, 0]);
        assert_eq!(group.execute_all(&["cmd0"]), 1);
        assert_eq!(counts(&hits), [1, 0, 0]);
        assert_eq!(group.execute_all(&["cmd1"]), 1);
        assert_eq!(group.execute_all(&["cmd2"]), 1);
        assert_eq!(counts(&hits), [1, 1, 1]);
    }

    #[test]
    fn test_execute_all_duplicates() {
        let hits = Default::default();
        let mut group = keyword_group(&hits, ["cmd", "cmd", "cmd"]);

        assert_eq!(group.execute_all(&["notcmd"]), 0);
        assert_eq!(group.execute_all(&["cmd"]), 3);
        assert_eq!(counts(&hits), [1, 1, 1]);
    }

    #[test]
    fn test_execute_first_stops_at_first_match() {
        let hits = Default::default();
        let mut group = keyword_group(&hits, ["cmd0", "cmd", "cmd"]);

        assert_eq!(group.execute_first(&["notcmd"]), None);
        assert_eq!(group.execute_first(&["cmd0"]), Some(0));
        assert_eq!(group.execute_first(&["cmd"]), Some(1));
        assert_eq!(counts(&hits), [1, 1, 0]);
    }

    #[test]
    fn test_closest() {
        let group: Group<'_> = {
            let mut group = Group::new();
            group.add(
                Command::builder("")
                    .add_constant("remote", false)
                    .add_constant("add", false)
                    .add_str_var("name", "")
                    .must_compile(),
                |_name: String| {},
            );
            group.add(
                Command::builder("").add_constant("status", false).must_compile(),
                || {},
            );
            group
        };

        assert_eq!(group.closest(&["remote", "add"]), Some((0, 2)));
        assert_eq!(group.closest(&["status"]), Some((1, 1)));
        assert_eq!(group.closest(&["x"]), Some((0, 0)));
        assert_eq!(Group::new().closest(&["x"]), None);
    }

    #[test]
    fn test_call_binds_values() {
        let got = Cell::new(0);
        let mut group = Group::new();
        group.add(
            Command::builder("").add_int_var("n", "", 10).must_compile(),
            |n: i64| got.set(n),
        );

        group.call(0, vec![Value::Int(42)]).unwrap();
        assert_eq!(got.get(), 42);
        assert_eq!(group.call(3, vec![]), Err(BindError::NoHandler(3)));
        assert!(group.call(0, vec![]).is_err());
    }

    #[test]
    fn test_display_separates_commands() {
        let mut group = Group::new();
        group.add(Command::builder("a").add_constant("a", false).must_compile(), || {});
        group.add(Command::builder("b").add_constant("b", false).must_compile(), || {});
        assert_eq!(group.to_string(), "a:\t> a\n\nb:\t> b");
    }
}
