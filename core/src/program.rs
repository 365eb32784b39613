//! A set of commands dispatched by their first token.
//!
//! The reserved `help` literal is handled here instead of by any command:
//! `help` and `help <command>` dispatch to [`Dispatch::Help`] so a formatting
//! collaborator can render usage from the grammar.
//!
//! # Examples
//!
//! ```
//! use ndargs_core::{CommandSpec, Dispatch, FlagSpec, Program, parse};
//!
//! let program = Program::builder("tool")
//!     .command(
//!         CommandSpec::builder("greet")
//!             .flag(FlagSpec::builder("--name").required().arg("who", parse::strings()))
//!             .callback(|b| Ok(format!("hello {}", b.first("--name", "who").unwrap()))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! match program.dispatch(&["greet", "--name", "ada"]).unwrap() {
//!     Dispatch::Resolved(resolution) => {
//!         assert_eq!(resolution.run().unwrap().as_deref(), Some("hello ada"));
//!     }
//!     Dispatch::Help(_) => unreachable!(),
//! }
//!
//! assert!(matches!(program.dispatch(&["help"]), Ok(Dispatch::Help(None))));
//! ```

use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::resolution::Resolution;
use crate::types::{CommandBuilder, CommandSpec};
use crate::validate::{self, BuildError, RESERVED_NAME};

/// Named collection of commands sharing one result type.
#[derive(Debug)]
pub struct Program<T> {
    name: String,
    commands: Vec<CommandSpec<T>>,
}

/// What an argv dispatched to.
#[derive(Debug)]
pub enum Dispatch<'g, T> {
    /// `help`, optionally naming a command.
    Help(Option<&'g CommandSpec<T>>),
    Resolved(Resolution<'g, T>),
}

impl<T> Program<T> {
    pub fn builder(name: impl Into<String>) -> ProgramBuilder<T> {
        ProgramBuilder {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[CommandSpec<T>] {
        &self.commands
    }

    pub fn command(&self, name: &str) -> Option<&CommandSpec<T>> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Dispatches with default settings.
    ///
    /// # Errors
    ///
    /// See [`dispatch_with`](Self::dispatch_with).
    pub fn dispatch<S: AsRef<str>>(&self, argv: &[S]) -> Result<Dispatch<'_, T>> {
        self.dispatch_with(argv, &ResolverConfig::default())
    }

    /// Selects a command by the first token and resolves the rest.
    ///
    /// # Errors
    ///
    /// [`ResolveError::EmptyInvocation`] for an empty argv,
    /// [`ResolveError::UnknownCommand`] for an unknown first token (including
    /// `help <unknown>`), and anything [`CommandSpec::resolve_with`] returns.
    pub fn dispatch_with<S: AsRef<str>>(
        &self,
        argv: &[S],
        config: &ResolverConfig,
    ) -> Result<Dispatch<'_, T>> {
        let Some((first, rest)) = argv.split_first() else {
            return Err(ResolveError::EmptyInvocation);
        };
        let name = first.as_ref();

        if name == RESERVED_NAME {
            return match rest.first() {
                None => Ok(Dispatch::Help(None)),
                Some(topic) => self
                    .command(topic.as_ref())
                    .map(|command| Dispatch::Help(Some(command)))
                    .ok_or_else(|| ResolveError::UnknownCommand(topic.as_ref().to_string())),
            };
        }

        let command = self
            .command(name)
            .ok_or_else(|| ResolveError::UnknownCommand(name.to_string()))?;
        debug!(program = %self.name, command = name, "Dispatching command");
        command.resolve_with(rest, config).map(Dispatch::Resolved)
    }
}

/// Accumulates commands; validated by [`build`](ProgramBuilder::build).
pub struct ProgramBuilder<T> {
    name: String,
    commands: Vec<CommandBuilder<T>>,
}

impl<T> ProgramBuilder<T> {
    /// Adds a command; a later command with the same name replaces this one.
    pub fn command(mut self, command: CommandBuilder<T>) -> Self {
        self.commands.push(command);
        self
    }

    /// Builds every command.
    ///
    /// # Errors
    ///
    /// Fails on an empty program name or on the first command that fails
    /// its own validation.
    pub fn build(self) -> std::result::Result<Program<T>, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyName { kind: "program" });
        }

        let commands = self
            .commands
            .into_iter()
            .map(|builder| builder.build().map(|c| (c.name().to_string(), c)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Program {
            name: self.name,
            commands: validate::dedup_last_wins(commands)
                .into_iter()
                .map(|(_, command)| command)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::types::FlagSpec;

    fn program() -> Program<i64> {
        Program::builder("calc")
            .command(
                CommandSpec::builder("add")
                    .flag(FlagSpec::builder("--n").required().arg("values 1-", parse::integers()))
                    .callback(|b| {
                        Ok(b.values("--n", "values")
                            .unwrap_or_default()
                            .iter()
                            .filter_map(|v| v.as_int())
                            .sum())
                    }),
            )
            .command(CommandSpec::builder("zero").callback(|_| Ok(0)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_dispatch_resolves_named_command() {
        let program = program();
        let Dispatch::Resolved(resolution) = program.dispatch(&["add", "--n", "1", "2", "3"]).unwrap()
        else {
            panic!("expected a resolution");
        };
        assert_eq!(resolution.command().name(), "add");
        assert_eq!(resolution.run().unwrap(), Some(6));
    }

    #[test]
    fn test_help_topics() {
        let program = program();
        assert!(matches!(program.dispatch(&["help"]), Ok(Dispatch::Help(None))));
        assert!(matches!(
            program.dispatch(&["help", "add"]),
            Ok(Dispatch::Help(Some(c))) if c.name() == "add"
        ));
        assert_eq!(
            program.dispatch(&["help", "nope"]).unwrap_err(),
            ResolveError::UnknownCommand("nope".to_string())
        );
    }

    #[test]
    fn test_unknown_and_empty_invocations() {
        let program = program();
        assert_eq!(
            program.dispatch(&["sub"]).unwrap_err(),
            ResolveError::UnknownCommand("sub".to_string())
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            program.dispatch(&empty).unwrap_err(),
            ResolveError::EmptyInvocation
        );
    }

    #[test]
    fn test_reserved_command_name_rejected() {
        let err = Program::<()>::builder("p")
            .command(CommandSpec::builder("help"))
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ReservedName("help".to_string()));
    }

    #[test]
    fn test_duplicate_commands_last_wins() {
        let program = Program::builder("p")
            .command(CommandSpec::builder("x").callback(|_| Ok(1)))
            .command(CommandSpec::builder("x").callback(|_| Ok(2)))
            .build()
            .unwrap();
        assert_eq!(program.commands().len(), 1);

        let Ok(Dispatch::Resolved(resolution)) = program.dispatch(&["x"]) else {
            panic!("expected a resolution");
        };
        // No flags at all: the empty fallback, so the callback does not run.
        assert!(resolution.is_fallback());
        assert_eq!(resolution.run().unwrap(), None);
    }
}
