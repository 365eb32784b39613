//! Usage text rendered from the grammar model.

use ndargs_core::{CommandSpec, FlagSpec, Program};

/// Program overview: one line per command.
pub fn program_usage<T>(program: &Program<T>) -> String {
    let mut out = format!("Usage: {} <COMMAND> [FLAGS...]\n", program.name());

    if !program.commands().is_empty() {
        out.push_str("\nCommands:\n");
        let width = program
            .commands()
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0)
            .max("help".len());
        for command in program.commands() {
            let summary = command.description().unwrap_or("");
            out.push_str(&format!("  {:width$}  {}\n", command.name(), summary).trim_end());
            out.push('\n');
        }
        out.push_str(&format!("  {:width$}  Show usage for a command\n", "help"));
    }

    out
}

/// Usage for one command: synopsis plus a flag table.
pub fn command_usage<T>(program: &Program<T>, command: &CommandSpec<T>) -> String {
    let synopsis: Vec<String> = command.flags().iter().map(flag_synopsis).collect();
    let mut out = format!(
        "Usage: {} {} {}\n",
        program.name(),
        command.name(),
        synopsis.join(" ")
    );

    if let Some(desc) = command.description() {
        out.push('\n');
        out.push_str(desc.trim_end());
        out.push('\n');
    }

    if !command.flags().is_empty() {
        out.push_str("\nFlags:\n");
        let rows: Vec<(String, &str)> = command
            .flags()
            .iter()
            .map(|f| (flag_left(f), f.description().unwrap_or("")))
            .collect();
        let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
        for (left, help) in rows {
            if help.is_empty() {
                out.push_str(&format!("  {left}\n"));
            } else {
                out.push_str(&format!("  {left:width$}  {help}\n"));
            }
        }
    }

    out
}

fn flag_left(flag: &FlagSpec) -> String {
    let mut left = flag.name().to_string();
    for arg in flag.arguments() {
        let arity = arg.arity().to_string();
        if arity.is_empty() {
            left.push_str(&format!(" <{}>", arg.name()));
        } else {
            left.push_str(&format!(" <{}:{arity}>", arg.name()));
        }
    }
    if flag.is_required() {
        left.push_str(" (required)");
    }
    left
}

fn flag_synopsis(flag: &FlagSpec) -> String {
    let args: String = flag
        .arguments()
        .iter()
        .map(|arg| {
            if arg.arity().min() == 0 {
                format!(" [{}...]", arg.name().to_uppercase())
            } else if arg.arity().max() == Some(1) {
                format!(" <{}>", arg.name().to_uppercase())
            } else {
                format!(" <{}>...", arg.name().to_uppercase())
            }
        })
        .collect();

    if flag.is_required() {
        format!("{}{args}", flag.name())
    } else {
        format!("[{}{args}]", flag.name())
    }
}
