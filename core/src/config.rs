//! Resolver configuration.
//!
//! Serializable so front ends can load it from a file. Missing fields take
//! their defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! max_branches: 1024
//! ambiguity: strict
//! ```

use serde::{Deserialize, Serialize};

/// Default ceiling on live branches and per-flag candidates.
pub const DEFAULT_MAX_BRANCHES: usize = 4096;

/// What to do when several interpretations tie for first place.
///
/// # Examples
///
/// ```
/// use ndargs_core::AmbiguityPolicy;
///
/// assert_eq!(AmbiguityPolicy::default(), AmbiguityPolicy::Lenient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Return the first-discovered winner plus the tied set and an advisory.
    #[default]
    Lenient,
    /// Fail with [`ResolveError::Ambiguous`](crate::ResolveError::Ambiguous).
    Strict,
}

/// Settings for one resolve call.
///
/// # Examples
///
/// ```
/// use ndargs_core::{AmbiguityPolicy, ResolverConfig};
///
/// let config = ResolverConfig::default()
///     .with_max_branches(16)
///     .with_ambiguity(AmbiguityPolicy::Strict);
/// assert_eq!(config.max_branches, 16);
///
/// let parsed: ResolverConfig = serde_json::from_str(r#"{"ambiguity":"strict"}"#).unwrap();
/// assert_eq!(parsed.max_branches, ndargs_core::DEFAULT_MAX_BRANCHES);
/// assert_eq!(parsed.ambiguity, AmbiguityPolicy::Strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum live branches (and candidates per flag) before giving up.
    pub max_branches: usize,
    /// Tie handling.
    pub ambiguity: AmbiguityPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_branches: DEFAULT_MAX_BRANCHES,
            ambiguity: AmbiguityPolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_max_branches(mut self, max_branches: usize) -> Self {
        self.max_branches = max_branches;
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }
}
