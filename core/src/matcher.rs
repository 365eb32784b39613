//! Argument matching within a single flag window.
//!
//! For one argument, every count in its arity range (clipped to the window)
//! is tried as a prefix of the window; each count the parse function accepts
//! becomes a candidate. A flag's arguments consume the window left to right,
//! so a flag's candidates are every in-order chaining of its arguments'
//! candidates that survives the flag callback.

use std::ops::Range;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{FlagFailure, ResolveError};
use crate::locate::FlagOccurrence;
use crate::types::ArgumentSpec;
use crate::value::{ArgValues, Value, value_count};

/// One accepted prefix of an argument's window.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentCandidate {
    /// Number of tokens consumed from the start of the window.
    pub count: usize,
    pub values: Vec<Value>,
}

/// Enumerates every accepted prefix of `window` for one argument.
///
/// Candidates are returned in ascending count order.
///
/// # Errors
///
/// [`FlagFailure::NotEnoughArguments`] when the window is shorter than the
/// minimum arity; otherwise, when no count is accepted, the
/// [`FlagFailure::ParseFailed`] of the largest count tried.
///
/// # Examples
///
/// ```
/// use ndargs_core::{ArgumentSpec, match_argument, parse};
///
/// let spec = ArgumentSpec::new("n 1-3", parse::integers()).unwrap();
/// let window: Vec<String> = ["1", "2", "x"].iter().map(|s| s.to_string()).collect();
/// let counts: Vec<_> = match_argument("--n", &spec, &window)
///     .unwrap()
///     .iter()
///     .map(|c| c.count)
///     .collect();
/// assert_eq!(counts, vec![1, 2]);
/// ```
pub fn match_argument(
    flag: &str,
    spec: &ArgumentSpec,
    window: &[String],
) -> Result<Vec<ArgumentCandidate>, FlagFailure> {
    let arity = spec.arity();
    if window.len() < arity.min() {
        return Err(FlagFailure::NotEnoughArguments {
            flag: flag.to_string(),
            argument: spec.name().to_string(),
            needed: arity.min(),
            available: window.len(),
        });
    }

    let mut candidates = Vec::new();
    let mut last_failure = None;
    for count in arity.counts(window.len()) {
        match spec.parse(&window[..count]) {
            Ok(values) => {
                trace!(flag, argument = spec.name(), count, "Accepted candidate");
                candidates.push(ArgumentCandidate { count, values });
            }
            Err(message) => {
                trace!(flag, argument = spec.name(), count, %message, "Rejected candidate");
                last_failure = Some(FlagFailure::ParseFailed {
                    flag: flag.to_string(),
                    argument: spec.name().to_string(),
                    count,
                    message,
                });
            }
        }
    }

    match last_failure {
        Some(failure) if candidates.is_empty() => Err(failure),
        _ => Ok(candidates),
    }
}

/// Parsed values of one flag occurrence and the tokens they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagResult {
    values: ArgValues,
    consumed: Vec<String>,
    /// Index of the flag literal.
    position: usize,
    #[serde(skip)]
    span: Range<usize>,
}

impl FlagResult {
    /// Argument values keyed by argument name.
    pub fn values(&self) -> &ArgValues {
        &self.values
    }

    /// Raw tokens consumed by the arguments, in order.
    pub fn consumed(&self) -> &[String] {
        &self.consumed
    }

    /// Index of the flag literal in the token stream.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Absolute token range consumed by the arguments.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn value_count(&self) -> usize {
        value_count(&self.values)
    }
}

/// Either every candidate interpretation of a flag window, or why there is none.
pub type FlagOutcome = Result<Vec<FlagResult>, FlagFailure>;

/// Evaluates one flag occurrence into its candidate results.
///
/// `limit` caps the number of partial candidates held at once.
///
/// # Errors
///
/// [`ResolveError::BranchLimitExceeded`] when the candidate set for this
/// flag grows past `limit`. Recoverable failures are returned inside the
/// [`FlagOutcome`].
pub(crate) fn evaluate_flag(
    occurrence: &FlagOccurrence<'_>,
    tokens: &[String],
    limit: usize,
) -> Result<FlagOutcome, ResolveError> {
    let flag = occurrence.flag;
    let window_range = occurrence.window();
    let window = &tokens[window_range.clone()];

    // (tokens consumed so far, values so far)
    let mut partials: Vec<(usize, ArgValues)> = vec![(0, ArgValues::new())];
    let mut last_failure = None;

    for argument in flag.arguments() {
        let mut next = Vec::new();
        for (offset, values) in &partials {
            match match_argument(flag.name(), argument, &window[*offset..]) {
                Ok(candidates) => {
                    if next.len() + candidates.len() > limit {
                        return Err(limit_exceeded(flag.name(), limit));
                    }
                    for candidate in candidates {
                        let mut values = values.clone();
                        values.insert(argument.name().to_string(), candidate.values);
                        next.push((offset + candidate.count, values));
                    }
                }
                Err(failure) => last_failure = Some(failure),
            }
        }

        if next.is_empty() {
            let failure = last_failure.unwrap_or_else(|| FlagFailure::NotEnoughArguments {
                flag: flag.name().to_string(),
                argument: argument.name().to_string(),
                needed: argument.arity().min(),
                available: 0,
            });
            debug!(flag = flag.name(), %failure, "Flag window rejected");
            return Ok(Err(failure));
        }
        partials = next;
    }

    let mut results = Vec::with_capacity(partials.len());
    let mut callback_failure = None;
    for (consumed, values) in partials {
        match flag.finish(values) {
            Ok(values) => {
                let start = window_range.start;
                results.push(FlagResult {
                    values,
                    consumed: window[..consumed].to_vec(),
                    position: occurrence.position,
                    span: start..start + consumed,
                });
            }
            Err(message) => {
                callback_failure = Some(FlagFailure::CallbackFailed {
                    flag: flag.name().to_string(),
                    message,
                });
            }
        }
    }

    debug!(
        flag = flag.name(),
        position = occurrence.position,
        window = window.len(),
        candidates = results.len(),
        "Evaluated flag window"
    );

    match callback_failure {
        Some(failure) if results.is_empty() => Ok(Err(failure)),
        _ => Ok(Ok(results)),
    }
}

pub(crate) fn limit_exceeded(flag: &str, limit: usize) -> ResolveError {
    warn!(flag, limit, "Branch limit exceeded");
    ResolveError::BranchLimitExceeded {
        flag: flag.to_string(),
        limit,
    }
}
