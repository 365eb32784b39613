//! Resolution entry point and its result.
//!
//! [`CommandSpec::resolve`] ties the pipeline together: locate flag windows,
//! fail fast on missing required flags, search branches, rank survivors, and
//! bind the winner. Ignorable conditions travel with the result as
//! [`Diagnostic`]s; only [`ResolveError`]s abort.
//!
//! Parse functions and callbacks are expected to be deterministic and free of
//! side effects. The resolver may call them many times and in an order that
//! is not part of the contract; if they are impure, results are not
//! reproducible.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::{AmbiguityPolicy, ResolverConfig};
use crate::error::{CallbackError, FlagFailure, ResolveError, Result};
use crate::locate::{check_required, locate};
use crate::matcher::FlagResult;
use crate::rank::{self, Score};
use crate::search::{BoundBranch, search};
use crate::types::CommandSpec;
use crate::value::Bindings;

/// A non-fatal condition attached to a usable result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Tokens no bound flag or argument claimed, in input order.
    ExtraArguments { tokens: Vec<String> },
    /// Several interpretations tie for first place.
    Ambiguous { count: usize },
    /// An optional flag occurrence was dropped because it failed.
    FlagRejected { failure: FlagFailure },
    /// Nothing survived; the result is the empty fallback.
    NoInterpretation { failures: Vec<FlagFailure> },
}

/// One ranked interpretation with its bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    #[serde(skip)]
    bindings: Bindings,
    flags: BTreeMap<String, FlagResult>,
    score: Score,
    unclaimed: Vec<String>,
    recovered: Vec<FlagFailure>,
}

impl Binding {
    fn new(score: Score, branch: BoundBranch, tokens: &[String]) -> Self {
        let mut claimed = vec![false; tokens.len()];
        for result in branch.results.values() {
            claimed[result.position()] = true;
            for slot in &mut claimed[result.span()] {
                *slot = true;
            }
        }
        let unclaimed = tokens
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(token, _)| token.clone())
            .collect();

        let mut bindings = Bindings::default();
        for (flag, result) in &branch.results {
            bindings.insert(flag.clone(), result.values().clone());
        }

        Self {
            bindings,
            flags: branch.results,
            score,
            unclaimed,
            recovered: branch.recovered,
        }
    }

    fn empty(tokens: &[String]) -> Self {
        Self::new(Score { flags: 0, values: 0 }, BoundBranch::default(), tokens)
    }

    /// Argument values per bound flag.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Full per-flag results, including consumed tokens.
    pub fn flags(&self) -> &BTreeMap<String, FlagResult> {
        &self.flags
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Tokens left unclaimed by this interpretation.
    pub fn unclaimed(&self) -> &[String] {
        &self.unclaimed
    }

    /// Failures of optional flag occurrences this interpretation dropped.
    pub fn recovered(&self) -> &[FlagFailure] {
        &self.recovered
    }
}

/// Outcome of resolving one command's tokens.
///
/// Always holds at least one [`Binding`]. When several tie, [`best`] is the
/// first discovered and [`tied`] holds all of them, so callers can apply
/// their own disambiguation or reject with [`strict`].
///
/// [`best`]: Resolution::best
/// [`tied`]: Resolution::tied
/// [`strict`]: Resolution::strict
#[derive(Debug)]
pub struct Resolution<'g, T> {
    command: &'g CommandSpec<T>,
    tied: Vec<Binding>,
    survivors: usize,
    fallback: Option<Vec<FlagFailure>>,
}

impl<'g, T> Resolution<'g, T> {
    pub fn command(&self) -> &'g CommandSpec<T> {
        self.command
    }

    /// The top-ranked interpretation.
    pub fn best(&self) -> &Binding {
        &self.tied[0]
    }

    /// Every interpretation tied for first place, in discovery order.
    pub fn tied(&self) -> &[Binding] {
        &self.tied
    }

    /// Number of interpretations that survived pruning.
    pub fn survivors(&self) -> usize {
        self.survivors
    }

    pub fn is_ambiguous(&self) -> bool {
        self.tied.len() > 1
    }

    /// Whether this is the synthesized empty result.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Ignorable diagnostics for the best interpretation.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let best = self.best();
        let mut out = Vec::new();

        if let Some(failures) = &self.fallback {
            out.push(Diagnostic::NoInterpretation {
                failures: failures.clone(),
            });
        }
        if self.is_ambiguous() {
            out.push(Diagnostic::Ambiguous {
                count: self.tied.len(),
            });
        }
        out.extend(best.recovered.iter().map(|failure| Diagnostic::FlagRejected {
            failure: failure.clone(),
        }));
        if !best.unclaimed.is_empty() {
            out.push(Diagnostic::ExtraArguments {
                tokens: best.unclaimed.clone(),
            });
        }

        out
    }

    /// Rejects an ambiguous result.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Ambiguous`] when more than one interpretation ties.
    pub fn strict(self) -> Result<Self> {
        if self.is_ambiguous() {
            return Err(ResolveError::Ambiguous {
                command: self.command.name().to_string(),
                count: self.tied.len(),
            });
        }
        Ok(self)
    }

    /// Runs the command callback on the best interpretation.
    ///
    /// Returns `Ok(None)` for the empty fallback and for commands without a
    /// callback.
    ///
    /// # Errors
    ///
    /// [`CallbackError`] when the command callback fails.
    pub fn run(&self) -> std::result::Result<Option<T>, CallbackError> {
        if self.is_fallback() {
            return Ok(None);
        }
        self.run_binding(self.best())
    }

    /// Runs the command callback on any interpretation, e.g. one of [`tied`](Self::tied).
    ///
    /// # Errors
    ///
    /// [`CallbackError`] when the command callback fails.
    pub fn run_binding(&self, binding: &Binding) -> std::result::Result<Option<T>, CallbackError> {
        self.command
            .invoke(&binding.bindings)
            .transpose()
            .map_err(|message| CallbackError {
                command: self.command.name().to_string(),
                message,
            })
    }
}

impl<T> CommandSpec<T> {
    /// Resolves the tokens that follow the command name with default settings.
    ///
    /// # Errors
    ///
    /// See [`resolve_with`](Self::resolve_with).
    ///
    /// # Examples
    ///
    /// ```
    /// use ndargs_core::{CommandSpec, Diagnostic, FlagSpec, Value, parse};
    ///
    /// let cmd = CommandSpec::builder("set")
    ///     .flag(FlagSpec::builder("--v").required().arg("n", parse::integers()))
    ///     .callback(|b| Ok(b.first("--v", "n").and_then(Value::as_int).unwrap_or(0)))
    ///     .build()
    ///     .unwrap();
    ///
    /// let resolution = cmd.resolve(&["--v", "5", "extra"]).unwrap();
    /// assert_eq!(resolution.run().unwrap(), Some(5));
    /// assert_eq!(
    ///     resolution.diagnostics(),
    ///     vec![Diagnostic::ExtraArguments { tokens: vec!["extra".into()] }]
    /// );
    /// ```
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Resolution<'_, T>> {
        self.resolve_with(tokens, &ResolverConfig::default())
    }

    /// Resolves the tokens that follow the command name.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingRequiredFlag`] before any search when a
    ///   required flag literal is absent.
    /// - [`ResolveError::BranchLimitExceeded`] when the search outgrows
    ///   `config.max_branches`.
    /// - [`ResolveError::Ambiguous`] under [`AmbiguityPolicy::Strict`] when
    ///   interpretations tie.
    pub fn resolve_with<S: AsRef<str>>(
        &self,
        tokens: &[S],
        config: &ResolverConfig,
    ) -> Result<Resolution<'_, T>> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();

        let occurrences = locate(self, &tokens);
        check_required(self, &occurrences)?;

        let outcome = search(self, &occurrences, &tokens, config)?;
        let survivors = outcome.survivors.len();
        let tied: Vec<Binding> = rank::top(rank::rank(outcome.survivors))
            .into_iter()
            .map(|(score, branch)| Binding::new(score, branch, &tokens))
            .collect();

        let resolution = if tied.is_empty() {
            debug!(command = self.name(), "No interpretation survived; using empty fallback");
            Resolution {
                command: self,
                tied: vec![Binding::empty(&tokens)],
                survivors,
                fallback: Some(outcome.failures),
            }
        } else {
            debug!(
                command = self.name(),
                survivors,
                tied = tied.len(),
                "Resolved command"
            );
            Resolution {
                command: self,
                tied,
                survivors,
                fallback: None,
            }
        };

        match config.ambiguity {
            AmbiguityPolicy::Strict => resolution.strict(),
            AmbiguityPolicy::Lenient => Ok(resolution),
        }
    }
}
