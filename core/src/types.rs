//! Grammar model: arguments, flags, and commands.
//!
//! Specs are assembled with builders and validated once on `build()`. A
//! built spec is immutable; resolution only ever borrows it, so one grammar
//! can serve any number of concurrent `resolve` calls.
//!
//! Declarations with a repeated name follow one policy throughout the crate:
//! the last declaration wins and keeps the position of the first.
//!
//! # Examples
//!
//! ```
//! use ndargs_core::{CommandSpec, FlagSpec, parse};
//!
//! let cmd = CommandSpec::<()>::builder("copy")
//!     .flag(FlagSpec::builder("--from").required().arg("src 1-", parse::strings()))
//!     .flag(FlagSpec::builder("--to").required().arg("dest", parse::strings()))
//!     .flag(FlagSpec::builder("--retries").arg("n", parse::integers()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(cmd.name(), "copy");
//! assert_eq!(cmd.flags().len(), 3);
//! assert_eq!(cmd.required_flags().count(), 2);
//! assert_eq!(cmd.flag("--from").unwrap().arguments()[0].arity().max(), None);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::arity::Arity;
use crate::validate::{self, BuildError};
use crate::value::{ArgValues, Bindings, CommandCallback, FlagCallback, ParseFn, Value};

/// One argument of a flag: a name, an arity range, and a parse function.
#[derive(Clone)]
pub struct ArgumentSpec {
    name: String,
    arity: Arity,
    parser: ParseFn,
}

impl ArgumentSpec {
    /// Builds an argument from a declaration such as `"files 1-"`.
    ///
    /// # Errors
    ///
    /// Fails on an empty name or a malformed arity.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndargs_core::{ArgumentSpec, BuildError, parse};
    ///
    /// let arg = ArgumentSpec::new("size 2-5", parse::integers()).unwrap();
    /// assert_eq!(arg.name(), "size");
    /// assert_eq!((arg.arity().min(), arg.arity().max()), (2, Some(5)));
    ///
    /// let err = ArgumentSpec::new("size 5-2", parse::integers()).unwrap_err();
    /// assert_eq!(err, BuildError::ArityOrder { min: 5, max: 2 });
    /// ```
    pub fn new(decl: &str, parser: ParseFn) -> Result<Self, BuildError> {
        let (name, arity) = validate::split_declaration(decl)?;
        Ok(Self {
            name: name.to_string(),
            arity: arity.parse()?,
            parser,
        })
    }

    /// Builds an argument from an already-parsed arity.
    pub fn with_arity(name: &str, arity: Arity, parser: ParseFn) -> Result<Self, BuildError> {
        if name.trim().is_empty() {
            return Err(BuildError::EmptyName { kind: "argument" });
        }
        Ok(Self {
            name: name.to_string(),
            arity,
            parser,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Runs the parse function over a token slice.
    pub fn parse(&self, tokens: &[String]) -> Result<Vec<Value>, String> {
        (self.parser)(tokens)
    }
}

impl fmt::Debug for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A flag literal with its arguments and optional post-processing callback.
#[derive(Clone)]
pub struct FlagSpec {
    name: String,
    required: bool,
    description: Option<String>,
    arguments: Vec<ArgumentSpec>,
    callback: Option<FlagCallback>,
}

impl FlagSpec {
    /// Starts a flag declaration. `name` is matched literally against tokens.
    pub fn builder(name: impl Into<String>) -> FlagBuilder {
        FlagBuilder {
            name: name.into(),
            required: false,
            description: None,
            arguments: Vec::new(),
            callback: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Applies the flag callback, or returns the values unchanged.
    pub fn finish(&self, values: ArgValues) -> Result<ArgValues, String> {
        match &self.callback {
            Some(callback) => callback(values),
            None => Ok(values),
        }
    }
}

impl fmt::Debug for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("arguments", &self.arguments)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

/// Accumulates a flag declaration; validated by [`build`](FlagBuilder::build).
#[derive(Clone)]
pub struct FlagBuilder {
    name: String,
    required: bool,
    description: Option<String>,
    arguments: Vec<ArgumentDecl>,
    callback: Option<FlagCallback>,
}

#[derive(Clone)]
enum ArgumentDecl {
    Pending(String, ParseFn),
    Built(ArgumentSpec),
}

impl FlagBuilder {
    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends an argument declared as `"<name> [arity]"`.
    pub fn arg(mut self, decl: impl Into<String>, parser: ParseFn) -> Self {
        self.arguments.push(ArgumentDecl::Pending(decl.into(), parser));
        self
    }

    /// Appends an already-built argument, e.g. one from [`ArgumentSpec::with_arity`].
    pub fn arg_spec(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(ArgumentDecl::Built(argument));
        self
    }

    /// Sets the post-processing callback applied to the aggregated values.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(ArgValues) -> Result<ArgValues, String> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Validates the declaration.
    ///
    /// # Errors
    ///
    /// Fails on an empty or reserved name, a malformed argument declaration,
    /// or two arguments sharing a name.
    pub fn build(self) -> Result<FlagSpec, BuildError> {
        validate::check_name("flag", &self.name)?;

        let arguments = self
            .arguments
            .into_iter()
            .map(|decl| match decl {
                ArgumentDecl::Pending(decl, parser) => ArgumentSpec::new(&decl, parser),
                ArgumentDecl::Built(argument) => Ok(argument),
            })
            .collect::<Result<Vec<_>, _>>()?;
        validate::check_unique_arguments(&self.name, arguments.iter().map(ArgumentSpec::name))?;

        Ok(FlagSpec {
            name: self.name,
            required: self.required,
            description: self.description,
            arguments,
            callback: self.callback,
        })
    }
}

/// A command: its flags and the callback that consumes their bindings.
///
/// `T` is whatever the callback produces when a resolution is run.
pub struct CommandSpec<T> {
    name: String,
    description: Option<String>,
    flags: Vec<FlagSpec>,
    callback: Option<CommandCallback<T>>,
}

impl<T> Clone for CommandSpec<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            flags: self.flags.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<T> CommandSpec<T> {
    /// Starts a command declaration.
    pub fn builder(name: impl Into<String>) -> CommandBuilder<T> {
        CommandBuilder {
            name: name.into(),
            description: None,
            flags: Vec::new(),
            callback: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared flags, deduplicated, in declaration order.
    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Finds a flag by its literal.
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn required_flags(&self) -> impl Iterator<Item = &FlagSpec> {
        self.flags.iter().filter(|f| f.required)
    }

    /// Runs the command callback; `None` when the command declares none.
    pub(crate) fn invoke(&self, bindings: &Bindings) -> Option<Result<T, String>> {
        self.callback.as_ref().map(|callback| callback(bindings))
    }
}

impl<T> fmt::Debug for CommandSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

/// Accumulates a command declaration; validated by [`build`](CommandBuilder::build).
pub struct CommandBuilder<T> {
    name: String,
    description: Option<String>,
    flags: Vec<FlagDecl>,
    callback: Option<CommandCallback<T>>,
}

enum FlagDecl {
    Pending(FlagBuilder),
    Built(FlagSpec),
}

impl<T> CommandBuilder<T> {
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a flag; a later flag with the same literal replaces this one.
    pub fn flag(mut self, flag: FlagBuilder) -> Self {
        self.flags.push(FlagDecl::Pending(flag));
        self
    }

    /// Adds an already-built flag.
    pub fn flag_spec(mut self, flag: FlagSpec) -> Self {
        self.flags.push(FlagDecl::Built(flag));
        self
    }

    /// Sets the callback run on the winning bindings.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Bindings) -> Result<T, String> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Validates the declaration and every flag in it.
    ///
    /// # Errors
    ///
    /// Fails on an empty or reserved command name, or on the first flag that
    /// fails its own validation.
    pub fn build(self) -> Result<CommandSpec<T>, BuildError> {
        validate::check_name("command", &self.name)?;

        let flags = self
            .flags
            .into_iter()
            .map(|decl| match decl {
                FlagDecl::Pending(builder) => builder.build(),
                FlagDecl::Built(spec) => Ok(spec),
            })
            .map(|flag| flag.map(|f| (f.name.clone(), f)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CommandSpec {
            name: self.name,
            description: self.description,
            flags: validate::dedup_last_wins(flags)
                .into_iter()
                .map(|(_, flag)| flag)
                .collect(),
            callback: self.callback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_flag_builder_parses_argument_declarations() {
        let flag = FlagSpec::builder("--range")
            .required()
            .arg("lo", parse::integers())
            .arg("hi -1", parse::integers())
            .build()
            .unwrap();

        assert!(flag.is_required());
        assert_eq!(flag.arguments().len(), 2);
        assert_eq!(flag.arguments()[0].arity(), Arity::ONE);
        assert_eq!(flag.arguments()[1].arity().min(), 0);
    }

    #[test]
    fn test_flag_builder_rejects_bad_arity() {
        let err = FlagSpec::builder("--x")
            .arg("a 1-2-3", parse::strings())
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MalformedArity("1-2-3".to_string()));
    }

    #[test]
    fn test_prebuilt_argument_spec_joins_flag() {
        let pair = ArgumentSpec::with_arity("pair", Arity::exactly(2), parse::strings()).unwrap();
        let flag = FlagSpec::builder("--kv")
            .arg("key", parse::strings())
            .arg_spec(pair)
            .build()
            .unwrap();

        let names: Vec<_> = flag.arguments().iter().map(ArgumentSpec::name).collect();
        assert_eq!(names, vec!["key", "pair"]);
        assert_eq!(flag.arguments()[1].arity(), Arity::exactly(2));

        let err = FlagSpec::builder("--kv")
            .arg("key", parse::strings())
            .arg_spec(ArgumentSpec::with_arity("key", Arity::at_least(0), parse::strings()).unwrap())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateArgument {
                flag: "--kv".to_string(),
                argument: "key".to_string(),
            }
        );
    }

    #[test]
    fn test_reserved_flag_rejected_through_command() {
        let err = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("help"))
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ReservedName("help".to_string()));
    }

    #[test]
    fn test_duplicate_flags_last_wins() {
        let cmd = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("--a").arg("x", parse::strings()))
            .flag(FlagSpec::builder("--b"))
            .flag(FlagSpec::builder("--a").required())
            .build()
            .unwrap();

        let names: Vec<_> = cmd.flags().iter().map(FlagSpec::name).collect();
        assert_eq!(names, vec!["--a", "--b"]);
        let a = cmd.flag("--a").unwrap();
        assert!(a.is_required());
        assert!(a.arguments().is_empty());
    }

    #[test]
    fn test_flag_callback_defaults_to_identity() {
        let flag = FlagSpec::builder("--x").build().unwrap();
        let mut values = ArgValues::new();
        values.insert("a".to_string(), vec![Value::Int(1)]);
        assert_eq!(flag.finish(values.clone()).unwrap(), values);
    }

    #[test]
    fn test_command_without_callback_invokes_nothing() {
        let cmd = CommandSpec::<i32>::builder("noop").build().unwrap();
        assert!(cmd.invoke(&Bindings::default()).is_none());

        let cmd = CommandSpec::<i32>::builder("one")
            .callback(|_| Ok(1))
            .build()
            .unwrap();
        assert_eq!(cmd.invoke(&Bindings::default()), Some(Ok(1)));
    }
}
