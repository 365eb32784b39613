//! Build-time grammar validation.
//!
//! Every builder funnels its names and declarations through this module, so
//! empty names, malformed arity strings, and the reserved `help` literal are
//! rejected in one place before any resolution can run.
//!
//! # Examples
//!
//! ```
//! use ndargs_core::{BuildError, CommandSpec, FlagSpec};
//!
//! let err = CommandSpec::<()>::builder("help").build().unwrap_err();
//! assert_eq!(err, BuildError::ReservedName("help".into()));
//!
//! let err = FlagSpec::builder("").build().unwrap_err();
//! assert_eq!(err, BuildError::EmptyName { kind: "flag" });
//! ```

use std::collections::HashSet;

use thiserror::Error;

/// Literal reserved for the help collaborator; never a user command or flag.
pub const RESERVED_NAME: &str = "help";

/// Grammar construction errors.
///
/// Any of these prevents a spec from being built, so no resolution can run
/// against a grammar that produced one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Command, flag, or argument name is empty or whitespace-only.
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },
    /// Arity text does not follow the `min-max` grammar.
    #[error("invalid arity format: {0:?}")]
    MalformedArity(String),
    /// Arity upper bound is below its lower bound.
    #[error("arity max {max} is below min {min}")]
    ArityOrder { min: usize, max: usize },
    /// A command or flag tried to use the reserved `help` literal.
    #[error("name {0:?} is reserved")]
    ReservedName(String),
    /// An argument name appears twice within one flag.
    #[error("duplicate argument {argument:?} in flag {flag:?}")]
    DuplicateArgument { flag: String, argument: String },
}

/// Checks a command or flag name: non-empty and not reserved.
pub(crate) fn check_name(kind: &'static str, name: &str) -> Result<(), BuildError> {
    if name.trim().is_empty() {
        return Err(BuildError::EmptyName { kind });
    }
    if name == RESERVED_NAME {
        return Err(BuildError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Splits an argument declaration into its name and arity text.
///
/// `"files 1-"` yields `("files", "1-")`; `"target"` yields `("target", "")`.
pub(crate) fn split_declaration(decl: &str) -> Result<(&str, &str), BuildError> {
    let mut parts = decl.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(BuildError::EmptyName { kind: "argument" });
    };
    let arity = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(BuildError::MalformedArity(decl.trim().to_string()));
    }
    Ok((name, arity))
}

/// Argument names must be unique within a flag, since they key its value map.
pub(crate) fn check_unique_arguments<'a>(
    flag: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(BuildError::DuplicateArgument {
                flag: flag.to_string(),
                argument: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Deduplicates `(name, item)` pairs, keeping the last declaration of each
/// name at the position of its first appearance.
pub(crate) fn dedup_last_wins<T>(items: Vec<(String, T)>) -> Vec<(String, T)> {
    let mut out: Vec<(String, T)> = Vec::with_capacity(items.len());
    for (name, item) in items {
        match out.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = item,
            None => out.push((name, item)),
        }
    }
    out
}
