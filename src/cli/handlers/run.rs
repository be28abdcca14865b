use crate::{
    cli::{args::RunArgs, handlers::commons},
    core::diagnostics::LogSink,
    system::executor::{ToolRunner, parse_acceptable_exit_codes},
};
use anyhow::Result;
use clap::Parser;
use colored::*;

/// Main entry point for the 'run' command.
/// Renders the invocation file and launches the tool with the result.
pub fn handle(args: Vec<String>) -> Result<()> {
    let args = RunArgs::try_parse_from(&args)?;
    let mut sink = LogSink::new();

    let invocation = commons::load_invocation(&args.file, args.threshold, &mut sink)?;
    let acceptable = parse_acceptable_exit_codes(&invocation.acceptable_exit_codes, &mut sink);
    let runner = ToolRunner::new(invocation.tool.clone())
        .with_working_dir(invocation.working_dir.clone())
        .with_acceptable_exit_codes(acceptable);

    let mut session = commons::start_session(&invocation);
    if !args.quiet {
        let command_line = session.generate_command_line(&mut sink)?;
        println!(
            "{} {} {}",
            "→".blue(),
            runner.tool().display().to_string().cyan(),
            command_line.green()
        );
    }

    let exit_code = runner.run(&mut session, &mut sink)?;
    log::debug!("Tool finished with exit code {}.", exit_code);
    Ok(())
}
