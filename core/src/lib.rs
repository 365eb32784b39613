//! Nondeterministic command-line argument resolution.
//!
//! Given a declarative grammar of commands, flags, and variable-arity
//! arguments, and a flat list of already-split tokens, this crate works out
//! which tokens belong to which flag, parses each flag's arguments with
//! caller-supplied functions, and returns the best interpretation (or all of
//! the interpretations that tie for best).
//!
//! - [`CommandSpec`], [`FlagSpec`] and [`ArgumentSpec`] form the grammar
//!   model, built through validating builders. Argument arity uses a compact
//!   grammar ([`Arity`]): `"files 1-"`, `"pair 2-2"`, `"opt -1"`.
//! - [`CommandSpec::resolve`] locates flag windows, fails fast on missing
//!   required flags, searches candidate token partitions and ranks survivors.
//! - [`Resolution`] holds the best [`Binding`], the tied set and ignorable
//!   [`Diagnostic`]s. [`Resolution::run`] invokes the command callback.
//! - [`Program`] dispatches several commands by name and handles the
//!   reserved `help` literal.
//!
//! Flag boundaries are exact literal matches; tokens that match no flag stay
//! in the window of the flag to their left and may end up unclaimed.
//!
//! # Example
//!
//! ```
//! use ndargs_core::*;
//!
//! let cmd = CommandSpec::builder("sum")
//!     .flag(FlagSpec::builder("--s").arg("n 1-3", parse::integers()))
//!     .callback(|b| {
//!         Ok(b.values("--s", "n")
//!             .unwrap_or_default()
//!             .iter()
//!             .filter_map(Value::as_int)
//!             .sum::<i64>())
//!     })
//!     .build()
//!     .unwrap();
//!
//! // Counts 1, 2, and 3 all parse; the 3-token reading binds the most values.
//! let resolution = cmd.resolve(&["--s", "1", "2", "3"]).unwrap();
//! assert_eq!(resolution.survivors(), 3);
//! assert!(!resolution.is_ambiguous());
//! assert_eq!(resolution.run().unwrap(), Some(6));
//! ```

mod arity;
mod config;
mod error;
mod locate;
mod matcher;
pub mod parse;
mod program;
mod rank;
mod resolution;
mod search;
mod types;
mod validate;
mod value;

pub use arity::Arity;
pub use config::{AmbiguityPolicy, DEFAULT_MAX_BRANCHES, ResolverConfig};
pub use error::{CallbackError, FlagFailure, ResolveError, Result};
pub use locate::{FlagOccurrence, check_required, locate};
pub use matcher::{ArgumentCandidate, FlagOutcome, FlagResult, match_argument};
pub use program::{Dispatch, Program, ProgramBuilder};
pub use rank::Score;
pub use resolution::{Binding, Diagnostic, Resolution};
pub use types::{ArgumentSpec, CommandBuilder, CommandSpec, FlagBuilder, FlagSpec};
pub use validate::{BuildError, RESERVED_NAME};
pub use value::{ArgValues, Bindings, CommandCallback, FlagCallback, ParseFn, Value};
