// src/cli/mod.rs

use clap::Parser;

pub mod args;
pub mod dispatcher;
pub mod handlers;

/// toolswitch: renders typed tool switches into a command line and runs the tool.
///
/// Usage:
///   - `toolswitch render <invocation.toml> [--threshold <n>]`
///   - `toolswitch run <invocation.toml> [--threshold <n>]`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
// Each command parses its own arguments, so clap only collects them here.
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
