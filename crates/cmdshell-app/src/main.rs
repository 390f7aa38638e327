//! Hello-world shell: a single `speak` command on top of the built-ins.

use anyhow::Result;

use cmdshell_app::commands::register_speak_command;
use cmdshell_app::console::TerminalConsole;
use cmdshell_app::startup::{init_logging, package_app_info, resolve_config};
use cmdshell_terminal::{CommandRegistry, Session};

fn main() -> Result<()> {
    init_logging();

    let config = resolve_config(package_app_info("Hello World"))?;
    log::info!("Starting {}", config.app.title_line());

    let mut registry = CommandRegistry::new();
    register_speak_command(&mut registry)?;

    Session::new(config).run(&mut registry, &mut TerminalConsole::new())?;
    Ok(())
}
