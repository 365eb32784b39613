//! Declarative grammar files.
//!
//! A grammar file lists commands, their flags, and each flag's arguments
//! with a value type. It is read from YAML (`.yaml`/`.yml`) or JSON and
//! turned into a [`Program`] whose command callbacks echo their bindings as
//! JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! name: deploy-tool
//! commands:
//!   - name: deploy
//!     description: Ship a build
//!     flags:
//!       - name: --target
//!         required: true
//!         args:
//!           - decl: env
//!             type: choice
//!             choices: [staging, prod]
//!       - name: --hosts
//!         args:
//!           - decl: names 1-
//!             type: string
//! ```

use std::fs;
use std::path::Path;

use ndargs_core::{CommandSpec, FlagSpec, ParseFn, Program, parse};
use serde::{Deserialize, Serialize};

/// Top-level grammar document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarFile {
    /// Program name used in usage text.
    #[serde(default = "default_program_name")]
    pub name: String,
    pub commands: Vec<CommandDecl>,
}

fn default_program_name() -> String {
    "ndargs".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDecl {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub flags: Vec<FlagDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagDecl {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgDecl {
    /// `"<name> [arity]"`, e.g. `"files 1-"`.
    pub decl: String,
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    /// Allowed literals for [`ValueKind::Choice`].
    #[serde(default)]
    pub choices: Vec<String>,
    /// Separator for [`ValueKind::Joined`].
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    " ".to_string()
}

/// Value type of an argument, selecting its stock parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Float,
    #[default]
    String,
    Bool,
    Choice,
    Joined,
}

impl ArgDecl {
    fn parser(&self) -> ParseFn {
        match self.kind {
            ValueKind::Int => parse::integers(),
            ValueKind::Float => parse::floats(),
            ValueKind::String => parse::strings(),
            ValueKind::Bool => parse::bools(),
            ValueKind::Choice => parse::choice(self.choices.iter().cloned()),
            ValueKind::Joined => parse::joined(self.separator.clone()),
        }
    }
}

impl GrammarFile {
    /// Reads a grammar from disk, picking YAML or JSON by extension.
    ///
    /// Files without a `.json` extension are read as YAML, which also
    /// accepts JSON.
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&raw)
                .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
        } else {
            serde_yaml::from_str(&raw)
                .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
        }
    }

    /// Builds the program, validating every declaration.
    ///
    /// Each command's callback returns its bindings as a JSON object.
    pub fn build(&self) -> Result<Program<serde_json::Value>, String> {
        let mut program = Program::builder(self.name.clone());

        for command in &self.commands {
            let mut builder = CommandSpec::builder(command.name.clone())
                .callback(|bindings| serde_json::to_value(bindings).map_err(|e| e.to_string()));
            if let Some(desc) = &command.description {
                builder = builder.with_description(desc);
            }

            for flag in &command.flags {
                let mut flag_builder = FlagSpec::builder(flag.name.clone());
                if flag.required {
                    flag_builder = flag_builder.required();
                }
                if let Some(desc) = &flag.description {
                    flag_builder = flag_builder.with_description(desc);
                }
                for arg in &flag.args {
                    flag_builder = flag_builder.arg(arg.decl.clone(), arg.parser());
                }
                builder = builder.flag(flag_builder);
            }

            program = program.command(builder);
        }

        program
            .build()
            .map_err(|err| format!("Invalid grammar: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndargs_core::Dispatch;

    const GRAMMAR: &str = r#"
name: tool
commands:
  - name: deploy
    flags:
      - name: --target
        required: true
        args:
          - decl: env
            type: choice
            choices: [staging, prod]
      - name: --replicas
        args:
          - decl: n
            type: int
      - name: --note
        args:
          - decl: text 2-2
            type: joined
"#;

    #[test]
    fn test_yaml_grammar_builds_program() {
        let grammar: GrammarFile = serde_yaml::from_str(GRAMMAR).unwrap();
        let program = grammar.build().unwrap();
        assert_eq!(program.name(), "tool");

        let deploy = program.command("deploy").unwrap();
        assert_eq!(deploy.flags().len(), 3);
        assert!(deploy.flag("--target").unwrap().is_required());
    }

    #[test]
    fn test_callback_echoes_bindings_as_json() {
        let grammar: GrammarFile = serde_yaml::from_str(GRAMMAR).unwrap();
        let program = grammar.build().unwrap();

        let Dispatch::Resolved(resolution) = program
            .dispatch(&["deploy", "--target", "prod", "--note", "ship", "it"])
            .unwrap()
        else {
            panic!("expected a resolution");
        };
        let value = resolution.run().unwrap().unwrap();
        assert_eq!(value["--target"]["env"], serde_json::json!(["prod"]));
        assert_eq!(value["--note"]["text"], serde_json::json!(["ship it"]));
    }

    #[test]
    fn test_invalid_arity_surfaces_build_error() {
        let grammar: GrammarFile = serde_yaml::from_str(
            "commands:\n  - name: x\n    flags:\n      - name: --a\n        args:\n          - decl: v 3-1\n",
        )
        .unwrap();
        let err = grammar.build().unwrap_err();
        assert!(err.contains("arity max 1 is below min 3"), "{err}");
    }

    #[test]
    fn test_arg_type_defaults_to_string() {
        let decl: ArgDecl = serde_yaml::from_str("decl: name").unwrap();
        assert_eq!(decl.kind, ValueKind::String);
        assert_eq!(decl.separator, " ");
    }
}
