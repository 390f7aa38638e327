//! Built-in commands present in every registry.

use cmdshell_types::error::Result;

use crate::command::{Command, Environment};

pub const HELP_COMMAND: &str = "help";
pub const CLEAR_COMMAND: &str = "clear";
pub const EXIT_COMMAND: &str = "exit";

/// Names that can never be removed from a registry.
pub const BUILTIN_COMMANDS: [&str; 3] = [HELP_COMMAND, CLEAR_COMMAND, EXIT_COMMAND];

/// The built-ins paired with their registry names, in listing order.
pub(crate) fn builtin_commands() -> Vec<(&'static str, Command)> {
    vec![
        (HELP_COMMAND, help_command()),
        (CLEAR_COMMAND, clear_command()),
        (EXIT_COMMAND, exit_command()),
    ]
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

fn help_command() -> Command {
    Command::new("Displays application command usage.").with_action(|_, env| print_usage(env))
}

/// Render the listing snapshot carried by the environment.
fn print_usage(env: &mut Environment<'_>) -> Result<()> {
    env.console.write_line("Commands and Parameters:")?;
    for cmd in &env.commands {
        env.console
            .write_line(&format!("{} - {}", cmd.name, cmd.description))?;
        for p in &cmd.parameters {
            let marker = if p.is_required { " * " } else { "" };
            env.console
                .write_line(&format!("\t{}{marker} - {}", p.prompt, p.description))?;
        }
    }
    env.console.write_line("")?;
    env.console.write_line("* Required parameter value.")
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

fn clear_command() -> Command {
    Command::new("Clears the console window.").with_action(|_, env| env.console.clear())
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

/// Does nothing itself; the session loop stops once it has been selected.
fn exit_command() -> Command {
    Command::new("Exits the application.")
}
