//! Resolver configuration loading.

use std::io::BufReader;
use std::path::Path;

use ndargs_core::{AmbiguityPolicy, ResolverConfig};

/// Command-line overrides applied on top of a config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub strict: bool,
    pub max_branches: Option<usize>,
}

/// Loads a [`ResolverConfig`] from YAML, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ResolverConfig, String> {
    let Some(path) = path else {
        return Ok(ResolverConfig::default());
    };
    let file = std::fs::File::open(path)
        .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
    serde_yaml::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
}

/// Applies command-line overrides; flags win over the file.
pub fn apply(mut config: ResolverConfig, overrides: Overrides) -> ResolverConfig {
    if overrides.strict {
        config.ambiguity = AmbiguityPolicy::Strict;
    }
    if let Some(max) = overrides.max_branches {
        config.max_branches = max;
    }
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), ResolverConfig::default());
    }

    #[test]
    fn test_yaml_config_with_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_branches: 32").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.max_branches, 32);
        assert_eq!(config.ambiguity, AmbiguityPolicy::Lenient);
    }

    #[test]
    fn test_overrides_win() {
        let config = apply(
            ResolverConfig::default(),
            Overrides {
                strict: true,
                max_branches: Some(5),
            },
        );
        assert_eq!(config.ambiguity, AmbiguityPolicy::Strict);
        assert_eq!(config.max_branches, 5);
    }
}
