//! # Invocation Files
//!
//! Reads a TOML file describing one tool invocation: the tool, its layout (switch
//! order, template, additional options) and the already-materialized switches.
//! `materialize` then runs the integer range and switch map checks, leaving out any
//! switch whose value is rejected so processing can continue.

use crate::{
    constants::{DEFAULT_RESPONSE_FILE_THRESHOLD, MAX_COMMAND_LINE_LENGTH},
    core::{
        diagnostics::DiagnosticSink,
        generator::CommandLineGenerator,
        switch_set::ActiveSwitchSet,
        template::{CommandTemplate, TemplateError},
        validation::{read_switch_map, validate_integer},
    },
    models::{Switch, SwitchError, SwitchKind, SwitchValue},
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read invocation file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid command template: {0}")]
    Template(#[from] TemplateError),
    #[error("Invalid switch: {0}")]
    Switch(#[from] SwitchError),
    #[error("Response file threshold {0} must be below {max}.", max = MAX_COMMAND_LINE_LENGTH)]
    ThresholdTooLarge(usize),
    #[error("Could not expand tool path '{tool}': {message}")]
    ToolPath { tool: String, message: String },
}

/// The on-disk shape of an invocation file.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InvocationFile {
    pub tool: String,
    #[serde(default)]
    pub switch_order: Vec<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub additional_options: String,
    #[serde(default)]
    pub acceptable_exit_codes: Vec<String>,
    #[serde(default)]
    pub response_file_threshold: Option<usize>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default, rename = "switch")]
    pub switches: Vec<Switch>,
}

/// A ready-to-render invocation.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool: PathBuf,
    pub working_dir: Option<PathBuf>,
    pub generator: CommandLineGenerator,
    pub switches: ActiveSwitchSet,
    pub acceptable_exit_codes: Vec<String>,
    pub threshold: usize,
}

/// Parses invocation TOML. `path` is only used for error messages.
pub fn parse_invocation(content: &str, path: &Path) -> Result<InvocationFile, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads and parses an invocation file.
pub fn load_invocation(path: &Path) -> Result<InvocationFile, ConfigError> {
    log::debug!("Loading invocation file '{}'.", path.display());
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_invocation(&content, path)
}

/// Turns an invocation file into a `ToolInvocation`.
///
/// Out-of-range integers and unmapped enumeration values are reported to `sink` and
/// the switch is left out. Structural problems (bad template, duplicate or malformed
/// switches, oversized threshold) are returned as errors.
///
/// A relative `working_dir` is resolved against `base_dir`.
pub fn materialize(
    file: InvocationFile,
    base_dir: &Path,
    sink: &mut dyn DiagnosticSink,
) -> Result<ToolInvocation, ConfigError> {
    let threshold = file
        .response_file_threshold
        .unwrap_or(DEFAULT_RESPONSE_FILE_THRESHOLD);
    if threshold >= MAX_COMMAND_LINE_LENGTH {
        return Err(ConfigError::ThresholdTooLarge(threshold));
    }

    let tool = shellexpand::full(&file.tool)
        .map_err(|e| ConfigError::ToolPath {
            tool: file.tool.clone(),
            message: e.to_string(),
        })?
        .into_owned();

    let mut generator = CommandLineGenerator::new(file.switch_order)
        .with_additional_options(file.additional_options);
    if let Some(template) = file.template.as_deref() {
        generator = generator.with_template(CommandTemplate::parse(template)?);
    }

    let mut switches = ActiveSwitchSet::new();
    for switch in file.switches {
        if let Some(switch) = materialize_switch(switch, sink) {
            switches.insert(switch)?;
        }
    }
    log::debug!("Materialized {} switches for '{}'.", switches.len(), tool);

    let working_dir = file.working_dir.map(|dir| {
        if dir.is_relative() {
            base_dir.join(dir)
        } else {
            dir
        }
    });

    Ok(ToolInvocation {
        tool: PathBuf::from(tool),
        working_dir,
        generator,
        switches,
        acceptable_exit_codes: file.acceptable_exit_codes,
        threshold,
    })
}

/// Applies range checks and switch map lookups. `None` means the switch was rejected.
fn materialize_switch(mut switch: Switch, sink: &mut dyn DiagnosticSink) -> Option<Switch> {
    match (switch.kind, &switch.value) {
        (SwitchKind::Integer, Some(SwitchValue::Number(n))) => {
            let min = switch.min.unwrap_or(i64::MIN);
            let max = switch.max.unwrap_or(i64::MAX);
            if !validate_integer(&switch.name, min, max, *n, sink) {
                log::debug!("Dropping switch '{}': value out of range.", switch.name);
                return None;
            }
        }
        // A logical value always goes through the map; an empty map rejects it.
        (SwitchKind::Enumeration, Some(SwitchValue::Text(value))) => {
            let token = read_switch_map(&switch.name, &switch.map, value, sink);
            if token.is_empty() {
                log::debug!("Dropping switch '{}': value not in switch map.", switch.name);
                return None;
            }
            switch.switch_token = token;
        }
        _ => {}
    }
    Some(switch)
}
