//! Output formatting for resolutions.

use ndargs_core::{Binding, Diagnostic, Resolution};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Serializable view of a [`Resolution`] plus the callback result.
#[derive(Debug, Serialize)]
pub struct ResolveOutput<'a> {
    pub command: &'a str,
    pub best: &'a Binding,
    #[serde(skip_serializing_if = "no_alternatives")]
    pub tied: &'a [Binding],
    pub survivors: usize,
    pub ambiguous: bool,
    pub fallback: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub result: Option<serde_json::Value>,
}

impl<'a> ResolveOutput<'a> {
    /// Captures a resolution; alternatives are listed only when they tie.
    pub fn new(
        resolution: &'a Resolution<'_, serde_json::Value>,
        result: Option<serde_json::Value>,
    ) -> Self {
        let tied = if resolution.is_ambiguous() {
            resolution.tied()
        } else {
            &[]
        };
        Self {
            command: resolution.command().name(),
            best: resolution.best(),
            tied,
            survivors: resolution.survivors(),
            ambiguous: resolution.is_ambiguous(),
            fallback: resolution.is_fallback(),
            diagnostics: resolution.diagnostics(),
            result,
        }
    }
}

fn no_alternatives(tied: &&[Binding]) -> bool {
    tied.is_empty()
}

/// Formats a resolution in the requested output format.
pub fn format_resolution(output: &ResolveOutput<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(output)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(output).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
