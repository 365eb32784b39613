//! Branch ranking.

use std::cmp::Reverse;

use serde::Serialize;

use crate::search::BoundBranch;

/// Ranking key of a surviving branch; larger is better.
///
/// Compared by bound flag count first, then by total parsed values.
///
/// # Examples
///
/// ```
/// use ndargs_core::Score;
///
/// let more_flags = Score { flags: 2, values: 1 };
/// let more_values = Score { flags: 1, values: 9 };
/// assert!(more_flags > more_values);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Score {
    pub flags: usize,
    pub values: usize,
}

pub(crate) fn score(branch: &BoundBranch) -> Score {
    Score {
        flags: branch.results.len(),
        values: branch.results.values().map(|r| r.value_count()).sum(),
    }
}

/// Sorts branches best-first; equal scores keep discovery order.
pub(crate) fn rank(branches: Vec<BoundBranch>) -> Vec<(Score, BoundBranch)> {
    let mut scored: Vec<_> = branches.into_iter().map(|b| (score(&b), b)).collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));
    scored
}

/// Splits off the branches tied for first place.
pub(crate) fn top(ranked: Vec<(Score, BoundBranch)>) -> Vec<(Score, BoundBranch)> {
    let Some(best) = ranked.first().map(|(score, _)| *score) else {
        return Vec::new();
    };
    ranked.into_iter().take_while(|(score, _)| *score == best).collect()
}
