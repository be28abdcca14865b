// src/bin/toolswitch.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use toolswitch::{
    cli::{Cli, dispatcher},
    system::executor::ExecutionError,
};

/// The main entry point of the `toolswitch` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // --- Centralized Error Handling ---
        // Clap errors (including --help and --version) know how to print themselves.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }

        // A tool that ran and failed passes its own exit code through.
        let exit_code = e
            .downcast_ref::<ExecutionError>()
            .and_then(ExecutionError::exit_code)
            .filter(|code| *code != 0)
            .unwrap_or(1);
        std::process::exit(exit_code);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    dispatcher::dispatch(cli.args)
}
