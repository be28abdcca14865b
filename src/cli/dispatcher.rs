use anyhow::{Result, anyhow};

use crate::cli::handlers;

/// Defines a system command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "render",
        aliases: &["show"],
        handler: handlers::render::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["exec"],
        handler: handlers::run::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `<command> [args...]` to the matching handler.
pub fn dispatch(all_args: Vec<String>) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(command_name) = args.next() else {
        return Err(anyhow!(
            "No command given. Available commands: {}.",
            command_names()
        ));
    };

    let command = find_command(&command_name).ok_or_else(|| {
        anyhow!(
            "Unknown command '{}'. Available commands: {}.",
            command_name,
            command_names()
        )
    })?;

    (command.handler)(args.collect())
}

fn command_names() -> String {
    COMMAND_REGISTRY
        .iter()
        .map(|cmd| cmd.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("render").map(|c| c.name), Some("render"));
        assert_eq!(find_command("exec").map(|c| c.name), Some("run"));
        assert!(find_command("compile").is_none());
    }

    #[test]
    fn test_dispatch_rejects_unknown_and_missing_commands() {
        let err = dispatch(vec!["compile".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown command 'compile'"));

        let err = dispatch(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("render, run"));
    }
}
