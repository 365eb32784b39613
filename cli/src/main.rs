mod config;
mod grammar;
mod output;
mod usage;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ndargs_core::Dispatch;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Overrides;
use crate::grammar::GrammarFile;
use crate::output::{OutputFormat, ResolveOutput, format_resolution};

#[derive(Debug, Parser)]
#[command(name = "ndargs")]
#[command(about = "Resolve command-line tokens against a declarative grammar")]
#[command(version)]
struct Cli {
    /// Log resolver decisions to stderr (same as RUST_LOG=debug).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve an invocation and print the best interpretation.
    Resolve(ResolveArgs),
    /// Validate a grammar file.
    Check(CheckArgs),
    /// Print usage derived from a grammar file.
    Usage(UsageArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Grammar file (YAML or JSON).
    #[arg(long)]
    grammar: PathBuf,
    /// Resolver config file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fail when several interpretations tie.
    #[arg(long)]
    strict: bool,
    /// Override the branch ceiling.
    #[arg(long)]
    max_branches: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Command name followed by its tokens, after `--`.
    #[arg(last = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Grammar file (YAML or JSON).
    #[arg(long)]
    grammar: PathBuf,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Grammar file (YAML or JSON).
    #[arg(long)]
    grammar: PathBuf,
    /// Show usage for one command only.
    command: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args),
        Command::Usage(args) => run_usage(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let program = GrammarFile::load(&args.grammar)?.build()?;
    let config = config::apply(
        config::load(args.config.as_deref())?,
        Overrides {
            strict: args.strict,
            max_branches: args.max_branches,
        },
    );
    debug!(
        max_branches = config.max_branches,
        ambiguity = ?config.ambiguity,
        "Resolver config"
    );

    let dispatch = program
        .dispatch_with(&args.argv, &config)
        .map_err(|e| e.to_string())?;

    match dispatch {
        Dispatch::Help(None) => print!("{}", usage::program_usage(&program)),
        Dispatch::Help(Some(command)) => print!("{}", usage::command_usage(&program, command)),
        Dispatch::Resolved(resolution) => {
            let result = resolution.run().map_err(|e| e.to_string())?;
            let output = ResolveOutput::new(&resolution, result);
            println!("{}", format_resolution(&output, args.format)?);
        }
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let program = GrammarFile::load(&args.grammar)?.build()?;
    let flags: usize = program.commands().iter().map(|c| c.flags().len()).sum();
    println!(
        "Grammar '{}' is valid: {} command(s), {} flag(s).",
        program.name(),
        program.commands().len(),
        flags
    );
    Ok(())
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let program = GrammarFile::load(&args.grammar)?.build()?;
    match args.command {
        None => print!("{}", usage::program_usage(&program)),
        Some(name) => {
            let command = program
                .command(&name)
                .ok_or_else(|| format!("Unknown command: {name}"))?;
            print!("{}", usage::command_usage(&program, command));
        }
    }
    Ok(())
}
