//! Demo commands registered by the binaries.

use std::cell::RefCell;
use std::rc::Rc;

use cmdshell_terminal::{Command, CommandRegistry, Parameter, not_blank};
use cmdshell_types::error::{Result, ShellError};

use crate::users::{User, UserService};

const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const FULLNAME: &str = "fullname";

const NOT_LOGGED_IN: &str = "Not logged in.";

/// Register the hello-world `speak` command.
pub fn register_speak_command(reg: &mut CommandRegistry) -> Result<()> {
    reg.add_command(
        "speak",
        Command::new("Outputs the word parameter to the console window.")
            .with_action(|c, env| env.console.write_line(c.value("word").unwrap_or_default())),
    )?
    .add_parameter(
        "word",
        Parameter::new("Word")
            .with_description("The word to output to the console window.")
            .with_validator(not_blank)
            .with_failure_message("Word cannot be null or whitespace."),
    )?;
    Ok(())
}

fn required_text(prompt: &str, description: &str) -> Parameter {
    Parameter::new(prompt)
        .with_description(description)
        .with_validator(not_blank)
        .with_failure_message(&format!("{prompt} cannot be null or whitespace."))
}

fn value<'c>(c: &'c Command, name: &str) -> &'c str {
    c.value(name).unwrap_or_default()
}

/// Register the user-management commands against a shared service.
pub fn register_user_commands(
    reg: &mut CommandRegistry,
    service: &Rc<RefCell<UserService>>,
) -> Result<()> {
    // login
    let guard_svc = Rc::clone(service);
    let svc = Rc::clone(service);
    reg.add_command(
        "login",
        Command::new("Authenticates a user using a username and password.")
            .with_guard(move || Ok(!guard_svc.borrow().is_logged_in()))
            .with_cannot_execute_message("Already logged in.")
            .with_action(move |c, env| {
                let username = value(c, USERNAME);
                if svc.borrow_mut().login(username, value(c, PASSWORD)) {
                    env.console.write_line(&format!("Logged in with {username}."))
                } else {
                    env.console
                        .write_line("Invalid username or password.  Please try again.")
                }
            }),
    )?
    .add_parameter(USERNAME, required_text("Username", "Username to login with."))?
    .add_parameter(
        PASSWORD,
        required_text("Password", "Password to login with.").password(),
    )?;

    // logout
    let svc = Rc::clone(service);
    reg.add_command(
        "logout",
        logged_in_command("Logs out a user.", service).with_action(move |_, env| {
            svc.borrow_mut().logout();
            env.console.write_line("Logged out.")
        }),
    )?;

    // adduser
    let svc = Rc::clone(service);
    reg.add_command(
        "adduser",
        logged_in_command("Add a new user.", service).with_action(move |c, env| {
            let user = User::new(value(c, USERNAME), value(c, PASSWORD), value(c, FULLNAME))
                .map_err(|e| ShellError::Command(e.to_string()))?;
            let username = user.username.clone();
            svc.borrow_mut().add_user(user);
            env.console
                .write_line(&format!("'{username}' was successfully added."))
        }),
    )?
    .add_parameter(USERNAME, required_text("Username", "Username of the new user."))?
    .add_parameter(
        PASSWORD,
        required_text("Password", "Password of the new user.").password(),
    )?
    .add_parameter(FULLNAME, required_text("Full Name", "Full name of the new user."))?;

    // deluser
    let svc = Rc::clone(service);
    reg.add_command(
        "deluser",
        logged_in_command("Remove an existing user.", service).with_action(move |c, env| {
            let username = value(c, USERNAME);
            let message = match svc.borrow_mut().delete_user(username) {
                Ok(true) => format!("'{username}' was successfully removed."),
                Ok(false) => format!("'{username}' does not exist."),
                Err(e) => e.to_string(),
            };
            env.console.write_line(&message)
        }),
    )?
    .add_parameter(
        USERNAME,
        required_text("Username", "Username of an existing user."),
    )?;

    // listusers
    let svc = Rc::clone(service);
    reg.add_command(
        "listusers",
        logged_in_command("Displays available users.", service).with_action(move |_, env| {
            env.console.write_line("Username | Password | Full Name")?;
            for user in svc.borrow().users() {
                env.console.write_line(&format!(
                    "{} | {} | {}",
                    user.username, user.password, user.fullname
                ))?;
            }
            Ok(())
        }),
    )?;

    Ok(())
}

/// Command guarded by an active login.
fn logged_in_command(description: &str, service: &Rc<RefCell<UserService>>) -> Command {
    let svc = Rc::clone(service);
    Command::new(description)
        .with_guard(move || Ok(svc.borrow().is_logged_in()))
        .with_cannot_execute_message(NOT_LOGGED_IN)
}
