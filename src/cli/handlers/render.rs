use crate::{
    cli::{args::RenderArgs, handlers::commons},
    core::diagnostics::{DiagnosticSink, LogSink},
};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

/// Main entry point for the 'render' command.
/// Prints the command line an invocation file produces and how it would be passed to the tool.
pub fn handle(args: Vec<String>) -> Result<()> {
    let args = RenderArgs::try_parse_from(&args)?;
    let mut sink = LogSink::new();

    let invocation = commons::load_invocation(&args.file, args.threshold, &mut sink)?;
    let mut session = commons::start_session(&invocation);

    let command_line = session.generate_command_line(&mut sink)?;
    let length = command_line.chars().count();
    let mode = if session.direct_command(&mut sink)?.is_some() {
        "direct".green()
    } else {
        "response file".yellow()
    };

    println!("{}", command_line);
    eprintln!(
        "{}",
        format!(
            "{} chars, threshold {}, passed via {}",
            length,
            session.threshold(),
            mode
        )
        .dimmed()
    );

    if sink.has_errors() {
        return Err(anyhow!(
            "{} configuration error(s) were reported while rendering '{}'.",
            sink.error_count(),
            args.file.display()
        ));
    }
    Ok(())
}
