//! Branch search over flag candidates.
//!
//! Flag occurrences are folded into a pool of branches, rightmost first.
//! Each branch is one interpretation of the tokens seen so far. A flag with
//! several candidates forks every live branch (by value, never by shared
//! reference), so the pool is the cross product of per-flag candidates minus
//! whatever failed along the way.
//!
//! Merge rules for an existing branch meeting a new flag outcome:
//!
//! | branch  | new flag   | result                                  |
//! |---------|------------|-----------------------------------------|
//! | bound   | candidates | one fork per candidate                  |
//! | bound   | failure    | branch kept, failure noted as recovered |
//! | failed  | candidates | one bound fork per candidate            |
//! | failed  | failure    | single failed branch, newest reason     |

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::{FlagFailure, ResolveError};
use crate::locate::FlagOccurrence;
use crate::matcher::{FlagOutcome, FlagResult, evaluate_flag, limit_exceeded};
use crate::types::CommandSpec;

/// One candidate interpretation of the command's tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Branch {
    Bound(BoundBranch),
    /// No flag has succeeded on this path yet.
    Failed(FlagFailure),
}

/// A branch with at least one successfully bound flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BoundBranch {
    pub(crate) results: BTreeMap<String, FlagResult>,
    /// Failures of flags this branch chose to leave unbound.
    pub(crate) recovered: Vec<FlagFailure>,
}

impl BoundBranch {
    fn seeded(result: FlagResult, flag: &str) -> Self {
        let mut branch = Self::default();
        branch.results.insert(flag.to_string(), result);
        branch
    }

    fn with(&self, flag: &str, result: FlagResult) -> Self {
        let mut fork = self.clone();
        fork.results.insert(flag.to_string(), result);
        fork
    }
}

/// Branches left after pruning, plus every failure seen on the way.
#[derive(Debug, Default)]
pub(crate) struct SearchOutcome {
    pub(crate) survivors: Vec<BoundBranch>,
    pub(crate) failures: Vec<FlagFailure>,
}

/// Runs the search for already-located occurrences.
///
/// `occurrences` must be in right-to-left order and already checked for
/// required flags.
///
/// # Errors
///
/// [`ResolveError::BranchLimitExceeded`] when the pool or a flag's candidate
/// set outgrows `config.max_branches`.
pub(crate) fn search<T>(
    command: &CommandSpec<T>,
    occurrences: &[FlagOccurrence<'_>],
    tokens: &[String],
    config: &ResolverConfig,
) -> Result<SearchOutcome, ResolveError> {
    let mut pool: Vec<Branch> = Vec::new();
    let mut failures: Vec<FlagFailure> = Vec::new();

    for (index, occurrence) in occurrences.iter().enumerate() {
        let flag = occurrence.flag.name();
        let outcome = evaluate_flag(occurrence, tokens, config.max_branches)?;
        if let Err(failure) = &outcome {
            if !failures.contains(failure) {
                failures.push(failure.clone());
            }
        }

        pool = if index == 0 {
            seed(flag, outcome)
        } else {
            merge(pool, flag, &outcome, config.max_branches)?
        };
        debug!(
            command = command.name(),
            flag,
            pool = pool.len(),
            "Merged flag into branch pool"
        );
    }

    let total = pool.len();
    let survivors = prune(command, pool);
    debug!(
        command = command.name(),
        total,
        survivors = survivors.len(),
        "Pruned branch pool"
    );

    Ok(SearchOutcome {
        survivors,
        failures,
    })
}

/// First flag: one branch per candidate, or a single failed branch.
fn seed(flag: &str, outcome: FlagOutcome) -> Vec<Branch> {
    match outcome {
        Ok(results) => results
            .into_iter()
            .map(|result| Branch::Bound(BoundBranch::seeded(result, flag)))
            .collect(),
        Err(failure) => vec![Branch::Failed(failure)],
    }
}

/// Folds one flag outcome into the pool.
///
/// The pool size is checked before every fork, so no more than `limit`
/// branches are ever built.
fn merge(
    pool: Vec<Branch>,
    flag: &str,
    outcome: &FlagOutcome,
    limit: usize,
) -> Result<Vec<Branch>, ResolveError> {
    let forks = match outcome {
        Ok(results) => results.len(),
        Err(_) => 1,
    };
    let mut next = Vec::with_capacity(pool.len().min(limit));

    for branch in pool {
        let grows_by = match &branch {
            Branch::Bound(bound) if bound.results.contains_key(flag) => 1,
            _ => forks,
        };
        if next.len() + grows_by > limit {
            return Err(limit_exceeded(flag, limit));
        }

        match (branch, outcome) {
            // A flag already bound on this path came from an occurrence further
            // right; this earlier occurrence stays unclaimed.
            (Branch::Bound(bound), _) if bound.results.contains_key(flag) => {
                next.push(Branch::Bound(bound));
            }
            (Branch::Bound(bound), Ok(results)) => {
                next.extend(
                    results
                        .iter()
                        .map(|result| Branch::Bound(bound.with(flag, result.clone()))),
                );
            }
            (Branch::Bound(mut bound), Err(failure)) => {
                bound.recovered.push(failure.clone());
                next.push(Branch::Bound(bound));
            }
            (Branch::Failed(previous), Ok(results)) => {
                next.extend(results.iter().map(|result| {
                    let mut bound = BoundBranch::seeded(result.clone(), flag);
                    bound.recovered.push(previous.clone());
                    Branch::Bound(bound)
                }));
            }
            (Branch::Failed(_), Err(failure)) => {
                next.push(Branch::Failed(failure.clone()));
            }
        }
    }

    Ok(next)
}

/// Drops failed branches and branches missing a required flag.
fn prune<T>(command: &CommandSpec<T>, pool: Vec<Branch>) -> Vec<BoundBranch> {
    pool.into_iter()
        .filter_map(|branch| match branch {
            Branch::Bound(bound) => Some(bound),
            Branch::Failed(_) => None,
        })
        .filter(|bound| {
            command
                .required_flags()
                .all(|flag| bound.results.contains_key(flag.name()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_BRANCHES;
    use crate::locate::locate;
    use crate::parse;
    use crate::types::FlagSpec;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(command: &CommandSpec<()>, tokens: &[String]) -> Result<SearchOutcome, ResolveError> {
        let occurrences = locate(command, tokens);
        search(command, &occurrences, tokens, &ResolverConfig::default())
    }

    #[test]
    fn test_ambiguous_flags_cross_multiply() {
        let cmd = CommandSpec::builder("run")
            .flag(FlagSpec::builder("--a").arg("x 1-2", parse::strings()))
            .flag(FlagSpec::builder("--b").arg("y 1-3", parse::strings()))
            .build()
            .unwrap();
        let tokens = toks(&["--a", "1", "2", "--b", "3", "4", "5"]);

        let outcome = run(&cmd, &tokens).unwrap();
        assert_eq!(outcome.survivors.len(), 2 * 3);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_failed_optional_flag_is_recovered() {
        let cmd = CommandSpec::builder("run")
            .flag(FlagSpec::builder("--n").arg("x", parse::integers()))
            .flag(FlagSpec::builder("--s").arg("y", parse::strings()))
            .build()
            .unwrap();
        // --s (rightmost) binds, --n fails to parse
        let tokens = toks(&["--n", "abc", "--s", "ok"]);

        let outcome = run(&cmd, &tokens).unwrap();
        assert_eq!(outcome.survivors.len(), 1);
        let branch = &outcome.survivors[0];
        assert!(branch.results.contains_key("--s"));
        assert!(!branch.results.contains_key("--n"));
        assert_eq!(branch.recovered.len(), 1);
        assert_eq!(branch.recovered[0].flag(), "--n");
    }

    #[test]
    fn test_success_after_failed_seed_replaces_failure() {
        let cmd = CommandSpec::builder("run")
            .flag(FlagSpec::builder("--n").arg("x", parse::integers()))
            .flag(FlagSpec::builder("--s").arg("y", parse::integers()))
            .build()
            .unwrap();
        // --s (rightmost, seeded first) fails, --n succeeds afterwards
        let tokens = toks(&["--n", "1", "--s", "bad"]);

        let outcome = run(&cmd, &tokens).unwrap();
        assert_eq!(outcome.survivors.len(), 1);
        assert!(outcome.survivors[0].results.contains_key("--n"));
        assert_eq!(outcome.survivors[0].recovered[0].flag(), "--s");
    }

    #[test]
    fn test_required_flag_failure_prunes_everything() {
        let cmd = CommandSpec::builder("run")
            .flag(FlagSpec::builder("--n").required().arg("x", parse::integers()))
            .flag(FlagSpec::builder("--s").arg("y", parse::strings()))
            .build()
            .unwrap();
        let tokens = toks(&["--n", "abc", "--s", "ok"]);

        let outcome = run(&cmd, &tokens).unwrap();
        assert!(outcome.survivors.is_empty());
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_all_flags_failing_leave_one_failed_branch() {
        let cmd = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("--n").arg("x", parse::integers()))
            .flag(FlagSpec::builder("--m").arg("y", parse::integers()))
            .build()
            .unwrap();
        let tokens = toks(&["--n", "a", "--m", "b"]);
        let occurrences = locate(&cmd, &tokens);

        let first = evaluate_flag(&occurrences[0], &tokens, 10).unwrap();
        let second = evaluate_flag(&occurrences[1], &tokens, 10).unwrap();
        let pool = merge(seed("--m", first), "--n", &second, 10).unwrap();
        assert_eq!(pool.len(), 1);
        assert!(matches!(&pool[0], Branch::Failed(f) if f.flag() == "--n"));
    }

    #[test]
    fn test_repeated_flag_keeps_rightmost_binding() {
        let cmd = CommandSpec::builder("run")
            .flag(FlagSpec::builder("--v").arg("x", parse::integers()))
            .build()
            .unwrap();
        let tokens = toks(&["--v", "1", "--v", "2"]);

        let outcome = run(&cmd, &tokens).unwrap();
        assert_eq!(outcome.survivors.len(), 1);
        assert_eq!(outcome.survivors[0].results["--v"].position(), 2);
    }

    #[test]
    fn test_pool_limit_is_enforced() {
        let cmd = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("--a").arg("x -", parse::strings()))
            .flag(FlagSpec::builder("--b").arg("y -", parse::strings()))
            .build()
            .unwrap();
        let tokens = toks(&["--a", "1", "2", "3", "--b", "4", "5", "6"]);
        let occurrences = locate(&cmd, &tokens);
        let config = ResolverConfig::default().with_max_branches(8);

        let err = search(&cmd, &occurrences, &tokens, &config).unwrap_err();
        assert_eq!(
            err,
            ResolveError::BranchLimitExceeded {
                flag: "--a".to_string(),
                limit: 8,
            }
        );
    }

    #[test]
    fn test_wide_flag_on_full_pool_fails_without_forking_everything() {
        let cmd = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("--a").arg("x -", parse::strings()))
            .flag(FlagSpec::builder("--b").arg("y -", parse::strings()))
            .flag(FlagSpec::builder("--c").arg("z -", parse::strings()))
            .build()
            .unwrap();
        let filler = |n: usize| (0..n).map(|i| i.to_string()).collect::<Vec<_>>();
        // --a and --b fill the pool to exactly 64 * 64 = 4096 branches.
        let mut tokens = vec!["--c".to_string()];
        tokens.extend(filler(500));
        tokens.push("--b".to_string());
        tokens.extend(filler(63));
        tokens.push("--a".to_string());
        tokens.extend(filler(63));

        let started = std::time::Instant::now();
        let err = run(&cmd, &tokens).unwrap_err();
        assert_eq!(
            err,
            ResolveError::BranchLimitExceeded {
                flag: "--c".to_string(),
                limit: DEFAULT_MAX_BRANCHES,
            }
        );
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_merge_stops_at_limit() {
        let cmd = CommandSpec::<()>::builder("run")
            .flag(FlagSpec::builder("--a").arg("x -", parse::strings()))
            .flag(FlagSpec::builder("--b").arg("y -", parse::strings()))
            .build()
            .unwrap();
        let tokens = toks(&["--a", "1", "2", "--b", "3", "4"]);
        let occurrences = locate(&cmd, &tokens);
        let b = evaluate_flag(&occurrences[0], &tokens, 10).unwrap();
        let a = evaluate_flag(&occurrences[1], &tokens, 10).unwrap();

        assert_eq!(merge(seed("--b", b.clone()), "--a", &a, 9).unwrap().len(), 9);
        assert!(matches!(
            merge(seed("--b", b), "--a", &a, 8),
            Err(ResolveError::BranchLimitExceeded { limit: 8, .. })
        ));
    }
}
