// src/system/executor.rs

use crate::{
    constants::ACCESS_DENIED_EXIT_CODE,
    core::{
        commons::split_command_line,
        diagnostics::{Diagnostic, DiagnosticSink},
        generator::GenerationError,
        response_file::CommandLineSession,
    },
    system::response_file_writer::{response_file_argument, write_response_file},
};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command line generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Could not write response file: {0}")]
    ResponseFile(#[source] std::io::Error),
    #[error("Tool '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    #[error("Tool '{tool}' exited with a non-zero error code ({exit_code}).")]
    NonZeroExit { tool: String, exit_code: i32 },
    #[error("{0} configuration error(s) were reported; the tool was not run.")]
    InvalidConfiguration(usize),
}

impl ExecutionError {
    /// The tool's exit code, when the failure came from the tool itself.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Parses string-encoded exit codes. Entries that are not integers are reported and skipped.
pub fn parse_acceptable_exit_codes(codes: &[String], sink: &mut dyn DiagnosticSink) -> Vec<i32> {
    codes
        .iter()
        .filter_map(|code| match code.trim().parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => {
                sink.report(Diagnostic::InvalidExitCode(code.clone()));
                None
            }
        })
        .collect()
}

/// Argument vector ready to launch, plus the response file it may reference.
#[derive(Debug)]
pub struct PreparedCommand {
    pub args: Vec<String>,
    /// The full rendered command line, used in diagnostics.
    pub command_line: String,
    /// Must outlive the tool process.
    pub response_file: Option<NamedTempFile>,
}

/// Launches an external tool with the command line of a `CommandLineSession`.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    tool: PathBuf,
    working_dir: Option<PathBuf>,
    acceptable_exit_codes: Vec<i32>,
}

impl ToolRunner {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            working_dir: None,
            acceptable_exit_codes: Vec::new(),
        }
    }

    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }

    pub fn with_acceptable_exit_codes(mut self, codes: Vec<i32>) -> Self {
        self.acceptable_exit_codes = codes;
        self
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    fn tool_name(&self) -> String {
        self.tool.display().to_string()
    }

    /// Asks the session for a direct command first and falls back to a response file.
    pub fn prepare(
        &self,
        session: &mut CommandLineSession<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PreparedCommand, ExecutionError> {
        let command_line = session.generate_command_line(sink)?;
        let direct = session.direct_command(sink)?;
        let for_file = session.response_file_commands(sink)?;

        // Same splitting rules a tool applies to its response file.
        let mut args = direct.as_deref().map(split_command_line).unwrap_or_default();

        let response_file = match for_file {
            Some(content) => {
                let file = write_response_file(&content).map_err(ExecutionError::ResponseFile)?;
                args.push(response_file_argument(&file));
                Some(file)
            }
            None => None,
        };

        Ok(PreparedCommand {
            args,
            command_line,
            response_file,
        })
    }

    /// Runs the tool to completion and returns its exit code when it counts as a success.
    pub fn run(
        &self,
        session: &mut CommandLineSession<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<i32, ExecutionError> {
        if sink.has_errors() {
            return Err(ExecutionError::InvalidConfiguration(sink.error_count()));
        }

        let prepared = self.prepare(session, sink)?;
        log::debug!("Launching '{}' with {} arguments.", self.tool_name(), prepared.args.len());

        let mut command = StdCommand::new(&self.tool);
        command
            .args(&prepared.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dunce::simplified(dir));
        }

        let status = command
            .status()
            .map_err(|e| ExecutionError::CommandFailed(self.tool_name(), e))?;

        // A process killed by a signal has no exit code.
        let exit_code = status.code().unwrap_or(-1);
        self.check_exit_code(&prepared.command_line, exit_code, sink)?;
        Ok(exit_code)
    }

    /// Accepts zero and the configured exit codes. Anything else is reported and
    /// returned as an error.
    pub fn check_exit_code(
        &self,
        command_line: &str,
        exit_code: i32,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), ExecutionError> {
        if exit_code == 0 {
            return Ok(());
        }
        if self.acceptable_exit_codes.contains(&exit_code) {
            log::info!(
                "Tool '{}' exited with accepted code {}.",
                self.tool_name(),
                exit_code
            );
            return Ok(());
        }

        let diagnostic = if exit_code == ACCESS_DENIED_EXIT_CODE {
            Diagnostic::AccessDenied {
                tool: self.tool_name(),
                command_line: command_line.to_string(),
                exit_code,
            }
        } else {
            Diagnostic::ToolFailed {
                tool: self.tool_name(),
                command_line: command_line.to_string(),
                exit_code,
            }
        };
        sink.report(diagnostic);

        Err(ExecutionError::NonZeroExit {
            tool: self.tool_name(),
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        diagnostics::CollectingSink, generator::CommandLineGenerator, switch_set::ActiveSwitchSet,
    };
    use crate::models::Switch;
    use std::fs;

    #[test]
    fn test_parse_acceptable_exit_codes_skips_invalid_entries() {
        let mut sink = CollectingSink::new();
        let codes = parse_acceptable_exit_codes(
            &["1".to_string(), " -5 ".to_string(), "abc".to_string()],
            &mut sink,
        );
        assert_eq!(codes, vec![1, -5]);
        assert_eq!(sink.codes(), vec!["TS1006"]);
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_check_exit_code() {
        let runner = ToolRunner::new("cl.exe").with_acceptable_exit_codes(vec![1]);
        let mut sink = CollectingSink::new();

        assert!(runner.check_exit_code("/O2", 0, &mut sink).is_ok());
        assert!(runner.check_exit_code("/O2", 1, &mut sink).is_ok());
        assert!(sink.diagnostics.is_empty());

        let err = runner.check_exit_code("/O2", 2, &mut sink).unwrap_err();
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(
            sink.diagnostics,
            vec![Diagnostic::ToolFailed {
                tool: "cl.exe".to_string(),
                command_line: "/O2".to_string(),
                exit_code: 2,
            }]
        );
    }

    #[test]
    fn test_access_denied_gets_its_own_diagnostic() {
        let runner = ToolRunner::new("cl.exe");
        let mut sink = CollectingSink::new();
        assert!(
            runner
                .check_exit_code("/O2", ACCESS_DENIED_EXIT_CODE, &mut sink)
                .is_err()
        );
        assert_eq!(sink.codes(), vec!["TS1005"]);
    }

    #[test]
    fn test_prepare_direct_command_splits_arguments() {
        let generator = CommandLineGenerator::new(["Output"]);
        let switches = ActiveSwitchSet::try_from(vec![
            Switch::string("Output", "/Fo", "out dir/a.obj"),
            Switch::item_array("Sources", "", vec!["a.c".into()]),
        ])
        .unwrap();
        let mut session = CommandLineSession::new(&generator, switches);
        let mut sink = CollectingSink::new();

        let prepared = ToolRunner::new("cl.exe")
            .prepare(&mut session, &mut sink)
            .unwrap();
        assert_eq!(prepared.args, vec!["/Foout dir/a.obj".to_string(), "a.c".to_string()]);
        assert!(prepared.response_file.is_none());
        assert_eq!(prepared.command_line, "/Fo\"out dir/a.obj\" a.c");
    }

    #[test]
    fn test_prepare_direct_command_keeps_backslash_paths() {
        let generator = CommandLineGenerator::new(["Sources", "Output"]);
        let switches = ActiveSwitchSet::try_from(vec![
            Switch::item_array("Sources", "", vec![r"src\main.c".into()]),
            Switch::string("Output", "/Fo", r"C:\out dir\a.obj"),
        ])
        .unwrap();
        let mut session = CommandLineSession::new(&generator, switches);
        let mut sink = CollectingSink::new();

        let prepared = ToolRunner::new("cl.exe")
            .prepare(&mut session, &mut sink)
            .unwrap();
        assert_eq!(prepared.command_line, r#"src\main.c /Fo"C:\out dir\a.obj""#);
        assert_eq!(
            prepared.args,
            vec![r"src\main.c".to_string(), r"/FoC:\out dir\a.obj".to_string()]
        );
    }

    #[test]
    fn test_prepare_long_command_uses_response_file() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let switches =
            ActiveSwitchSet::try_from(vec![Switch::string("Define", "/D", "LONG_NAME")]).unwrap();
        let mut session = CommandLineSession::new(&generator, switches).with_threshold(4);
        let mut sink = CollectingSink::new();

        let prepared = ToolRunner::new("cl.exe")
            .prepare(&mut session, &mut sink)
            .unwrap();
        let file = prepared.response_file.as_ref().unwrap();
        assert_eq!(prepared.args.len(), 1);
        assert!(prepared.args[0].starts_with('@'));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "/DLONG_NAME");
    }

    #[test]
    fn test_run_refuses_after_configuration_errors() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let mut session = CommandLineSession::new(&generator, ActiveSwitchSet::new());
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::UnmappedValue {
            property: "Optimization".to_string(),
            value: "Turbo".to_string(),
        });
        let result = ToolRunner::new("cl.exe").run(&mut session, &mut sink);
        assert!(matches!(result, Err(ExecutionError::InvalidConfiguration(1))));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_non_zero_exit() {
        let generator = CommandLineGenerator::new(Vec::<String>::new())
            .with_additional_options("-c \"exit 3\"");
        let mut session = CommandLineSession::new(&generator, ActiveSwitchSet::new());
        let mut sink = CollectingSink::new();

        let result = ToolRunner::new("sh").run(&mut session, &mut sink);
        assert!(matches!(result, Err(ExecutionError::NonZeroExit { exit_code: 3, .. })));
        assert_eq!(sink.codes(), vec!["TS1004"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_accepts_listed_exit_code() {
        let generator = CommandLineGenerator::new(Vec::<String>::new())
            .with_additional_options("-c \"exit 3\"");
        let mut session = CommandLineSession::new(&generator, ActiveSwitchSet::new());
        let mut sink = CollectingSink::new();

        let exit_code = ToolRunner::new("sh")
            .with_acceptable_exit_codes(vec![3])
            .run(&mut session, &mut sink)
            .unwrap();
        assert_eq!(exit_code, 3);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_tool_is_a_command_failure() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let mut session = CommandLineSession::new(&generator, ActiveSwitchSet::new());
        let result = ToolRunner::new("definitely-not-a-real-tool-name")
            .run(&mut session, &mut CollectingSink::new());
        assert!(matches!(result, Err(ExecutionError::CommandFailed(..))));
    }
}
