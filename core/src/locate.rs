//! Flag window location.
//!
//! Finds every token that is exactly a declared flag literal and splits the
//! stream into per-flag windows. Occurrences come back right-to-left, the
//! order the branch search consumes them in.

use std::ops::Range;

use tracing::debug;

use crate::error::ResolveError;
use crate::types::{CommandSpec, FlagSpec};

/// One flag literal found in the token stream.
#[derive(Debug, Clone, Copy)]
pub struct FlagOccurrence<'g> {
    /// Index of the flag literal itself.
    pub position: usize,
    /// Exclusive end of the argument window: the next literal or end of stream.
    pub window_end: usize,
    pub flag: &'g FlagSpec,
}

impl FlagOccurrence<'_> {
    /// Argument window: tokens after the literal up to the next boundary.
    pub fn window(&self) -> Range<usize> {
        self.position + 1..self.window_end
    }
}

/// Scans `tokens` for flag literals of `command`, rightmost first.
///
/// Tokens that match no literal are not boundaries; they stay inside the
/// window of the nearest flag to their left, or before the first flag.
pub fn locate<'g, T>(command: &'g CommandSpec<T>, tokens: &[String]) -> Vec<FlagOccurrence<'g>> {
    let mut occurrences = Vec::new();
    let mut boundary = tokens.len();

    for (position, token) in tokens.iter().enumerate().rev() {
        if let Some(flag) = command.flag(token) {
            occurrences.push(FlagOccurrence {
                position,
                window_end: boundary,
                flag,
            });
            boundary = position;
        }
    }

    debug!(
        command = command.name(),
        tokens = tokens.len(),
        occurrences = occurrences.len(),
        "Located flag windows"
    );
    occurrences
}

/// Fails fast when a required flag has no occurrence.
///
/// # Errors
///
/// Returns [`ResolveError::MissingRequiredFlag`] naming the first missing
/// flag in declaration order.
pub fn check_required<T>(
    command: &CommandSpec<T>,
    occurrences: &[FlagOccurrence<'_>],
) -> Result<(), ResolveError> {
    for flag in command.required_flags() {
        if !occurrences.iter().any(|o| o.flag.name() == flag.name()) {
            return Err(ResolveError::MissingRequiredFlag {
                command: command.name().to_string(),
                flag: flag.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn command() -> CommandSpec<()> {
        CommandSpec::builder("run")
            .flag(FlagSpec::builder("--a").required().arg("x -", parse::strings()))
            .flag(FlagSpec::builder("--b").arg("y", parse::strings()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_locate_right_to_left_with_windows() {
        let cmd = command();
        let tokens = toks(&["lead", "--a", "1", "2", "--b", "3"]);
        let found = locate(&cmd, &tokens);

        let summary: Vec<_> = found
            .iter()
            .map(|o| (o.flag.name(), o.position, o.window()))
            .collect();
        assert_eq!(summary, vec![("--b", 4, 5..6), ("--a", 1, 2..4)]);
    }

    #[test]
    fn test_unknown_tokens_are_not_boundaries() {
        let cmd = command();
        let tokens = toks(&["--a", "--zzz", "q"]);
        let found = locate(&cmd, &tokens);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].window(), 1..3);
    }

    #[test]
    fn test_repeated_flag_yields_each_occurrence() {
        let cmd = command();
        let tokens = toks(&["--a", "1", "--a", "2"]);
        let positions: Vec<_> = locate(&cmd, &tokens).iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![2, 0]);
    }

    #[test]
    fn test_check_required_reports_missing_flag() {
        let cmd = command();
        let tokens = toks(&["--b", "x"]);
        let found = locate(&cmd, &tokens);
        assert_eq!(
            check_required(&cmd, &found),
            Err(ResolveError::MissingRequiredFlag {
                command: "run".to_string(),
                flag: "--a".to_string(),
            })
        );
    }
}
