//! Error types for resolution.
//!
//! Hard errors ([`ResolveError`]) abort a resolve call and carry no result.
//! Recoverable ones ([`FlagFailure`]) live inside the branch search and only
//! surface as diagnostics on an otherwise usable result.

use serde::Serialize;
use thiserror::Error;

/// Errors that abort a resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A required flag never appears in the token stream.
    #[error("missing required flag {flag:?} for command {command:?}")]
    MissingRequiredFlag { command: String, flag: String },

    /// The live branch pool or a flag's candidate set outgrew the ceiling.
    #[error("branch limit of {limit} exceeded while resolving flag {flag:?}")]
    BranchLimitExceeded { flag: String, limit: usize },

    /// More than one interpretation ranked first under the strict policy.
    #[error("ambiguous invocation of {command:?}: {count} interpretations tie")]
    Ambiguous { command: String, count: usize },

    /// The first token names no declared command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// No command token was supplied.
    #[error("no command given")]
    EmptyInvocation,
}

/// Convenience alias for results with [`ResolveError`].
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Why one flag window produced no usable candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlagFailure {
    /// The window is shorter than the argument's minimum arity.
    #[error("flag {flag:?} argument {argument:?} needs {needed} token(s), {available} available")]
    NotEnoughArguments {
        flag: String,
        argument: String,
        needed: usize,
        available: usize,
    },

    /// The parse function rejected every candidate count.
    #[error("flag {flag:?} argument {argument:?} rejected {count} token(s): {message}")]
    ParseFailed {
        flag: String,
        argument: String,
        count: usize,
        message: String,
    },

    /// The flag callback rejected the parsed values.
    #[error("flag {flag:?} callback failed: {message}")]
    CallbackFailed { flag: String, message: String },
}

impl FlagFailure {
    /// Literal of the flag that failed.
    pub fn flag(&self) -> &str {
        match self {
            Self::NotEnoughArguments { flag, .. }
            | Self::ParseFailed { flag, .. }
            | Self::CallbackFailed { flag, .. } => flag,
        }
    }
}

/// A command callback failed when a resolution was run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command {command:?} failed: {message}")]
pub struct CallbackError {
    pub command: String,
    pub message: String,
}
