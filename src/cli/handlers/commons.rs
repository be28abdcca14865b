// src/cli/handlers/commons.rs

// This module contains shared functions used by multiple handlers.

use anyhow::{Context, Result, anyhow};
use std::path::Path;

use crate::{
    constants::MAX_COMMAND_LINE_LENGTH,
    core::{
        config_loader::{self, ToolInvocation},
        diagnostics::DiagnosticSink,
        response_file::CommandLineSession,
    },
};

/// Loads and materializes an invocation file, applying a threshold given on the command line.
pub fn load_invocation(
    file: &Path,
    threshold: Option<usize>,
    sink: &mut dyn DiagnosticSink,
) -> Result<ToolInvocation> {
    let raw = config_loader::load_invocation(file)?;
    let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
    let mut invocation = config_loader::materialize(raw, base_dir, sink)
        .with_context(|| format!("Invalid invocation file '{}'", file.display()))?;

    if let Some(threshold) = threshold {
        if threshold >= MAX_COMMAND_LINE_LENGTH {
            return Err(anyhow!(
                "--threshold must be below {} (got {}).",
                MAX_COMMAND_LINE_LENGTH,
                threshold
            ));
        }
        invocation.threshold = threshold;
    }
    Ok(invocation)
}

/// Opens a session over a copy of the invocation's switches.
pub fn start_session(invocation: &ToolInvocation) -> CommandLineSession<'_> {
    CommandLineSession::new(&invocation.generator, invocation.switches.clone())
        .with_threshold(invocation.threshold)
}
