//! User-management shell: login, logout and account maintenance over an
//! in-memory user list.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use cmdshell_app::commands::register_user_commands;
use cmdshell_app::console::TerminalConsole;
use cmdshell_app::startup::{init_logging, package_app_info, resolve_config};
use cmdshell_app::users::UserService;
use cmdshell_terminal::{CommandRegistry, Session};

fn main() -> Result<()> {
    init_logging();

    let config = resolve_config(package_app_info("Sample Application"))?;
    log::info!("Starting {}", config.app.title_line());

    let service = Rc::new(RefCell::new(UserService::new()));
    let mut registry = CommandRegistry::new();
    register_user_commands(&mut registry, &service)?;

    Session::new(config).run(&mut registry, &mut TerminalConsole::new())?;
    Ok(())
}
