//! Argument arity ranges and their compact string grammar.
//!
//! An arity is the inclusive `[min, max]` count of raw tokens an argument may
//! consume. The string form is written after the argument name in a
//! declaration such as `"files 1-"`:
//!
//! | text     | range            |
//! |----------|------------------|
//! | *(none)* | `[1, 1]`         |
//! | `2-5`    | `[2, 5]`         |
//! | `2-`     | `[2, unbounded]` |
//! | `-3`     | `[0, 3]`         |
//! | `-`      | `[0, unbounded]` |
//!
//! # Examples
//!
//! ```
//! use ndargs_core::Arity;
//!
//! let arity: Arity = "2-5".parse().unwrap();
//! assert_eq!(arity.min(), 2);
//! assert_eq!(arity.max(), Some(5));
//! assert_eq!(arity.counts(3).collect::<Vec<_>>(), vec![2, 3]);
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::validate::BuildError;

/// Inclusive token-count range for one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    /// Exactly one token.
    pub const ONE: Self = Self {
        min: 1,
        max: Some(1),
    };

    /// Creates a range, rejecting `max < min`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ArityOrder`] when a bounded `max` is below `min`.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, BuildError> {
        if let Some(max) = max {
            if max < min {
                return Err(BuildError::ArityOrder { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Exactly `n` tokens.
    pub fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// At least `min` tokens, no upper bound.
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, or `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Upper bound clipped to the number of available tokens.
    pub fn clipped_max(&self, available: usize) -> usize {
        self.max.map_or(available, |max| max.min(available))
    }

    /// Candidate counts to try against a window of `available` tokens.
    ///
    /// Empty when the window holds fewer than `min` tokens.
    pub fn counts(&self, available: usize) -> RangeInclusive<usize> {
        // An empty range when min > clipped max; `RangeInclusive` handles it.
        self.min..=self.clipped_max(available)
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::ONE
    }
}

impl FromStr for Arity {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Ok(Self::ONE);
        }

        let malformed = || BuildError::MalformedArity(s.to_string());

        if text.matches('-').count() > 1 {
            return Err(malformed());
        }

        let Some((lo, hi)) = text.split_once('-') else {
            // A lone number is not part of the grammar; bounds need a dash.
            return Err(malformed());
        };

        let parse_bound = |part: &str| -> Result<Option<usize>, BuildError> {
            if part.is_empty() {
                return Ok(None);
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<usize>().map(Some).map_err(|_| malformed())
        };

        let min = parse_bound(lo)?.unwrap_or(0);
        let max = parse_bound(hi)?;
        Self::new(min, max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, Some(1)) => Ok(()),
            (0, None) => write!(f, "-"),
            (0, Some(max)) => write!(f, "-{max}"),
            (min, None) => write!(f, "{min}-"),
            (min, Some(max)) => write!(f, "{min}-{max}"),
        }
    }
}
