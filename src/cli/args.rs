// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Important: the command name has already been consumed.
pub struct RenderArgs {
    /// The invocation file describing the tool and its switches.
    pub file: PathBuf,

    /// Command lines of at least this many characters go through a response file.
    #[arg(long)]
    pub threshold: Option<usize>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// The invocation file describing the tool and its switches.
    pub file: PathBuf,

    /// Command lines of at least this many characters go through a response file.
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Do not echo the command line before running the tool.
    #[arg(long, short)]
    pub quiet: bool,
}
