//! The interactive read-validate-execute loop.
//!
//! Each turn reads one line, resolves it against the registry, checks the
//! command's guard, prompts for every parameter, validates, and either runs
//! the command or reports the failing parameters. Handler errors are reported
//! and the loop carries on; only `exit` (or the end of input) stops it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use cmdshell_types::config::SessionConfig;
use cmdshell_types::error::Result;

use crate::builtins::{EXIT_COMMAND, HELP_COMMAND};
use crate::command::Environment;
use crate::console::Console;
use crate::masked::read_masked;
use crate::registry::CommandRegistry;

const INVALID_PARAMETERS: &str = "Invalid command parameter values detected.  Please try again.";
const EXITING: &str = "Exiting.";

fn usage_hint() -> String {
    format!("Type '{HELP_COMMAND}' to list available commands.  Commands are case sensitive.")
}

/// Text carried by a panic payload, as produced by `panic!` or `unwrap`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Runs turns against a registry until `exit` is selected.
///
/// A guard, validator or action that fails, by `Err` or by panicking, is
/// reported as an unexpected error and the session carries on.
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Print the banner and loop until `exit` has been selected and run.
    ///
    /// The loop condition looks at the last matched command, so `exit`'s own
    /// guard and action still run before the session ends. Exhausted input
    /// ends the session the same way.
    pub fn run(&self, registry: &mut CommandRegistry, console: &mut dyn Console) -> Result<()> {
        self.print_banner(console)?;
        log::info!(
            "Session started with {} commands registered",
            registry.len()
        );

        let mut selected: Option<String> = None;
        while selected.as_deref() != Some(EXIT_COMMAND) {
            console.write(&self.config.prompt)?;
            let Some(input) = console.read_line()? else {
                log::info!("Input closed; ending session");
                break;
            };
            if input.trim().is_empty() {
                continue;
            }
            if registry.get_command(&input).is_none() {
                log::debug!("Unrecognized input ({} chars)", input.chars().count());
                console.write_line(&format!("Invalid command.  {}", usage_hint()))?;
                console.write_line("")?;
                continue;
            }

            let turn = panic::catch_unwind(AssertUnwindSafe(|| {
                self.run_command(registry, &input, &mut *console)
            }));
            let failure = match turn {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            if let Some(details) = failure {
                log::warn!("Command '{input}' failed: {details}");
                console.write_line(&format!("Unexpected error.  Details: {details}"))?;
                console.write_line("")?;
            }
            selected = Some(input);
        }

        console.write_line(EXITING)?;
        log::info!("Session ended");
        Ok(())
    }

    fn print_banner(&self, console: &mut dyn Console) -> Result<()> {
        console.write_line(&self.config.app.title_line())?;
        console.write_line(&self.config.app.copyright_line())?;
        console.write_line("")?;
        console.write_line(&usage_hint())?;
        console.write_line("")
    }

    /// One turn for a recognized command: guard, collect, validate, execute.
    fn run_command(
        &self,
        registry: &mut CommandRegistry,
        name: &str,
        console: &mut dyn Console,
    ) -> Result<()> {
        // Snapshot before borrowing the command so actions never observe a
        // table that is being edited.
        let commands = registry.summaries();
        let Some(command) = registry.get_command_mut(name) else {
            return Ok(());
        };

        if !command.can_execute()? {
            log::info!("Command '{name}' refused by its guard");
            console.write_line(&format!(
                "This command is not valid in the current state.  Reason: {}",
                command.cannot_execute_message
            ))?;
            return console.write_line("");
        }

        for parameter in command.parameters_mut() {
            console.write(&parameter.display_prompt())?;
            parameter.value = if parameter.is_password {
                read_masked(console, self.config.mask)?
            } else {
                console.read_line()?.unwrap_or_default()
            };
        }

        let failed = command.failed_parameters()?;
        if failed.is_empty() {
            log::debug!("Executing '{name}'");
            let mut env = Environment {
                console: &mut *console,
                commands,
            };
            command.execute(&mut env)?;
        } else {
            log::info!(
                "Command '{name}' rejected: {} invalid parameter(s)",
                failed.len()
            );
            console.write_line(INVALID_PARAMETERS)?;
            for parameter in failed {
                console.write_line(&format!("* {}", parameter.failure_message))?;
            }
        }
        console.write_line("")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::parameter::{Parameter, not_blank};
    use crate::test_utils::{MockConsole, OutputCall};
    use cmdshell_types::config::AppInfo;
    use cmdshell_types::error::ShellError;
    use std::cell::Cell;
    use std::rc::Rc;

    const INVALID_COMMAND: &str =
        "Invalid command.  Type 'help' to list available commands.  Commands are case sensitive.";

    fn speak_registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "speak",
            Command::new("Outputs the phrase.").with_action(|c, env| {
                env.console.write_line(c.value("phrase").unwrap_or_default())
            }),
        )
        .unwrap()
        .add_parameter(
            "phrase",
            Parameter::new("Phrase")
                .with_description("What to say.")
                .with_validator(not_blank)
                .with_failure_message("Phrase cannot be null or whitespace."),
        )
        .unwrap();
        reg
    }

    fn run(reg: &mut CommandRegistry, console: &mut MockConsole) {
        Session::default().run(reg, console).unwrap();
    }

    fn prompt_count(console: &MockConsole) -> usize {
        console
            .calls
            .iter()
            .filter(|c| **c == OutputCall::Text("> ".into()))
            .count()
    }

    #[test]
    fn banner_is_printed_first() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["exit"]);
        let config = SessionConfig::new(AppInfo::new("Demo", "1.2.3", "Acme").with_year(2026));
        Session::new(config).run(&mut reg, &mut console).unwrap();
        let lines = console.output_lines();
        assert_eq!(lines[0], "Demo Command Line Interface (CLI) Version 1.2.3");
        assert_eq!(lines[1], "Copyright © 2026 by Acme.  All rights reserved.");
        assert_eq!(lines[2], "");
        assert_eq!(
            lines[3],
            "Type 'help' to list available commands.  Commands are case sensitive."
        );
        assert_eq!(lines[4], "");
    }

    #[test]
    fn speak_outputs_phrase() {
        let mut reg = speak_registry();
        let mut console = MockConsole::with_lines(&["speak", "hello", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("> Phrase*: hello\n\n> "), "{transcript}");
        assert!(!transcript.contains(INVALID_PARAMETERS));
        assert_eq!(prompt_count(&console), 2);
        assert!(transcript.ends_with("Exiting.\n"));
    }

    #[test]
    fn blank_phrase_is_rejected_without_executing() {
        let executed = Rc::new(Cell::new(false));
        let executed_in = Rc::clone(&executed);
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "speak",
            Command::new("Outputs the phrase.").with_action(move |_, _| {
                executed_in.set(true);
                Ok(())
            }),
        )
        .unwrap()
        .add_parameter(
            "phrase",
            Parameter::new("Phrase")
                .with_validator(not_blank)
                .with_failure_message("Phrase cannot be null or whitespace."),
        )
        .unwrap();

        let mut console = MockConsole::with_lines(&["speak", "", "exit"]);
        run(&mut reg, &mut console);
        assert!(!executed.get());
        let lines = console.output_lines();
        let idx = lines
            .iter()
            .position(|l| l.ends_with(INVALID_PARAMETERS))
            .expect("validation message");
        assert_eq!(lines[idx + 1], "* Phrase cannot be null or whitespace.");
        assert_eq!(lines[idx + 2], "");
    }

    #[test]
    fn only_failing_parameters_are_reported() {
        let mut reg = CommandRegistry::new();
        let cmd = reg.add_command("pair", Command::default()).unwrap();
        cmd.add_parameter(
            "a",
            Parameter::new("A")
                .with_validator(not_blank)
                .with_failure_message("A is required."),
        )
        .unwrap();
        cmd.add_parameter(
            "b",
            Parameter::new("B")
                .with_validator(not_blank)
                .with_failure_message("B is required."),
        )
        .unwrap();
        let mut console = MockConsole::with_lines(&["pair", "x", " ", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("* B is required."));
        assert!(!transcript.contains("* A is required."));
    }

    #[test]
    fn exit_first_terminates() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["exit", "help"]);
        run(&mut reg, &mut console);
        assert_eq!(prompt_count(&console), 1);
        assert_eq!(console.remaining_lines(), 1);
        assert!(console.transcript().ends_with("> \nExiting.\n"));
    }

    #[test]
    fn exit_action_runs_before_termination() {
        let ran = Rc::new(Cell::new(false));
        let ran_in = Rc::clone(&ran);
        let mut reg = CommandRegistry::new();
        let exit = reg.get_command_mut(EXIT_COMMAND).unwrap();
        *exit = std::mem::take(exit).with_action(move |_, env| {
            ran_in.set(true);
            env.console.write_line("Goodbye.")
        });
        let mut console = MockConsole::with_lines(&["exit"]);
        run(&mut reg, &mut console);
        assert!(ran.get());
        assert!(console.transcript().ends_with("Goodbye.\n\nExiting.\n"));
    }

    #[test]
    fn exit_terminates_even_when_its_guard_refuses() {
        let mut reg = CommandRegistry::new();
        let exit = reg.get_command_mut(EXIT_COMMAND).unwrap();
        *exit = std::mem::take(exit)
            .with_guard(|| Ok(false))
            .with_cannot_execute_message("Busy.");
        let mut console = MockConsole::with_lines(&["exit", "help"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("This command is not valid in the current state.  Reason: Busy."));
        assert!(transcript.ends_with("Exiting.\n"));
        assert_eq!(console.remaining_lines(), 1);
    }

    #[test]
    fn unknown_input_reports_and_continues() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["foo", "exit"]);
        run(&mut reg, &mut console);
        let lines = console.output_lines();
        let hits = lines.iter().filter(|l| l.ends_with(INVALID_COMMAND)).count();
        assert_eq!(hits, 1);
        assert_eq!(reg.len(), 3);
        assert_eq!(prompt_count(&console), 2);
    }

    #[test]
    fn command_names_are_case_sensitive() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["EXIT", "exit"]);
        run(&mut reg, &mut console);
        assert!(console.transcript().contains(INVALID_COMMAND));
        assert_eq!(prompt_count(&console), 2);
    }

    #[test]
    fn blank_input_is_silent() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["", "   ", "\t", "exit"]);
        run(&mut reg, &mut console);
        assert_eq!(prompt_count(&console), 4);
        assert!(!console.transcript().contains("Invalid"));
    }

    #[test]
    fn guard_refusal_skips_parameters() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "logout",
            Command::new("Logs out.")
                .with_guard(|| Ok(false))
                .with_cannot_execute_message("Not logged in."),
        )
        .unwrap()
        .add_parameter("confirm", Parameter::new("Confirm"))
        .unwrap();
        let mut console = MockConsole::with_lines(&["logout", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains(
            "This command is not valid in the current state.  Reason: Not logged in.\n\n"
        ));
        assert!(!transcript.contains("Confirm*: "));
        assert!(transcript.ends_with("Exiting.\n"));
    }

    #[test]
    fn action_error_is_reported_and_loop_continues() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "boom",
            Command::default().with_action(|_, _| Err(ShellError::Command("kaboom".into()))),
        )
        .unwrap();
        let mut console = MockConsole::with_lines(&["boom", "boom", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        let hits = transcript
            .matches("Unexpected error.  Details: command error: kaboom\n\n")
            .count();
        assert_eq!(hits, 2);
        assert!(transcript.ends_with("Exiting.\n"));
    }

    #[test]
    fn guard_error_is_reported() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "check",
            Command::default().with_guard(|| Err(ShellError::Command("state unavailable".into()))),
        )
        .unwrap();
        let mut console = MockConsole::with_lines(&["check", "exit"]);
        run(&mut reg, &mut console);
        assert!(console
            .transcript()
            .contains("Unexpected error.  Details: command error: state unavailable"));
    }

    #[test]
    fn validator_error_is_reported() {
        let mut reg = CommandRegistry::new();
        reg.add_command("lookup", Command::default())
            .unwrap()
            .add_parameter(
                "id",
                Parameter::new("Id").with_validator(|_| Err(ShellError::Command("db down".into()))),
            )
            .unwrap();
        let mut console = MockConsole::with_lines(&["lookup", "42", "exit"]);
        run(&mut reg, &mut console);
        assert!(console
            .transcript()
            .contains("Unexpected error.  Details: command error: db down"));
    }

    #[test]
    fn password_parameter_uses_masked_entry() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "login",
            Command::default().with_action(|c, env| {
                env.console.write_line(&format!(
                    "{}:{}",
                    c.value("user").unwrap_or_default(),
                    c.value("pass").unwrap_or_default()
                ))
            }),
        )
        .unwrap()
        .add_parameter("user", Parameter::new("Username"))
        .unwrap()
        .add_parameter("pass", Parameter::new("Password").password())
        .unwrap();
        let mut console = MockConsole::with_lines(&["login", "me", "exit"]);
        console.push_keys("12\u{8}23\r");
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("Password*: **"), "{transcript}");
        assert!(transcript.contains("me:123\n"));
        assert!(!transcript.contains("Password*: 123"));
    }

    #[test]
    fn optional_parameter_prompt_has_no_marker() {
        let mut reg = CommandRegistry::new();
        reg.add_command("note", Command::default())
            .unwrap()
            .add_parameter("text", Parameter::new("Text").optional())
            .unwrap();
        let mut console = MockConsole::with_lines(&["note", "", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("> Text: "));
        assert!(!transcript.contains(INVALID_PARAMETERS));
    }

    #[test]
    fn parameters_prompted_in_registration_order() {
        let mut reg = CommandRegistry::new();
        let cmd = reg.add_command("order", Command::default()).unwrap();
        for (name, prompt) in [("z", "Zulu"), ("a", "Alpha"), ("m", "Mike")] {
            cmd.add_parameter(name, Parameter::new(prompt)).unwrap();
        }
        let mut console = MockConsole::with_lines(&["order", "1", "2", "3", "exit"]);
        run(&mut reg, &mut console);
        let cmd = reg.get_command("order").unwrap();
        assert_eq!(cmd.value("z"), Some("1"));
        assert_eq!(cmd.value("a"), Some("2"));
        assert_eq!(cmd.value("m"), Some("3"));
        assert!(console.transcript().contains("Zulu*: Alpha*: Mike*: "));
    }

    #[test]
    fn help_lists_registered_commands() {
        let mut reg = speak_registry();
        let mut console = MockConsole::with_lines(&["help", "exit"]);
        run(&mut reg, &mut console);
        let lines = console.output_lines();
        assert!(lines.iter().any(|l| l.ends_with("Commands and Parameters:")));
        assert!(lines.iter().any(|l| l == "help - Displays application command usage."));
        assert!(lines.iter().any(|l| l == "clear - Clears the console window."));
        assert!(lines.iter().any(|l| l == "exit - Exits the application."));
        assert!(lines.iter().any(|l| l == "speak - Outputs the phrase."));
        assert!(lines.iter().any(|l| l == "\tPhrase *  - What to say."));
        assert!(lines.iter().any(|l| l == "* Required parameter value."));
    }

    #[test]
    fn clear_clears_display() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["clear", "exit"]);
        run(&mut reg, &mut console);
        assert_eq!(console.clear_count(), 1);
    }

    #[test]
    fn end_of_input_ends_session() {
        let mut reg = CommandRegistry::new();
        let mut console = MockConsole::with_lines(&["help"]);
        run(&mut reg, &mut console);
        assert!(console.transcript().ends_with("Exiting.\n"));
        assert_eq!(prompt_count(&console), 2);
    }

    #[test]
    fn end_of_input_during_parameters_collects_empty_value() {
        let mut reg = speak_registry();
        let mut console = MockConsole::with_lines(&["speak"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains(INVALID_PARAMETERS));
        assert!(transcript.ends_with("Exiting.\n"));
        assert_eq!(reg.get_command("speak").unwrap().value("phrase"), Some(""));
    }

    #[test]
    fn custom_prompt_and_mask() {
        let mut reg = CommandRegistry::new();
        reg.add_command("pin", Command::default())
            .unwrap()
            .add_parameter("pin", Parameter::new("Pin").password())
            .unwrap();
        let config = SessionConfig {
            prompt: "$ ".into(),
            mask: '#',
            ..SessionConfig::default()
        };
        let mut console = MockConsole::with_lines(&["pin", "exit"]);
        console.push_keys("42\r");
        Session::new(config).run(&mut reg, &mut console).unwrap();
        let transcript = console.transcript();
        assert!(transcript.contains("$ Pin*: ##\n"));
        assert!(!transcript.contains("> "));
    }

    #[test]
    fn registry_unchanged_after_session() {
        let mut reg = speak_registry();
        let before: Vec<String> = reg.summaries().into_iter().map(|s| s.name).collect();
        let mut console = MockConsole::with_lines(&["foo", "help", "speak", "hi", "exit"]);
        run(&mut reg, &mut console);
        let after: Vec<String> = reg.summaries().into_iter().map(|s| s.name).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn panicking_action_is_reported_and_loop_continues() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "bad",
            Command::default().with_action(|c, env| {
                env.console.write_line(c.value("missing").unwrap())
            }),
        )
        .unwrap();
        let mut console = MockConsole::with_lines(&["bad", "help", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains(
            "Unexpected error.  Details: called `Option::unwrap()` on a `None` value\n\n"
        ));
        assert!(transcript.contains("Commands and Parameters:"));
        assert!(transcript.ends_with("Exiting.\n"));
        assert_eq!(console.remaining_lines(), 0);
    }

    #[test]
    fn panicking_guard_and_validator_are_reported() {
        let mut reg = CommandRegistry::new();
        reg.add_command(
            "guarded",
            Command::default().with_guard(|| panic!("guard exploded")),
        )
        .unwrap();
        reg.add_command("checked", Command::default())
            .unwrap()
            .add_parameter(
                "id",
                Parameter::new("Id").with_validator(|v| panic!("bad id {v}")),
            )
            .unwrap();
        let mut console = MockConsole::with_lines(&["guarded", "checked", "7", "exit"]);
        run(&mut reg, &mut console);
        let transcript = console.transcript();
        assert!(transcript.contains("Unexpected error.  Details: guard exploded\n"));
        assert!(transcript.contains("Unexpected error.  Details: bad id 7\n"));
        assert!(transcript.ends_with("Exiting.\n"));
    }

    #[test]
    fn panic_payload_text() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "handler panicked");
    }

    mod logging {
        use super::*;
        use std::sync::Mutex;

        static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());

        struct CaptureLogger;

        impl log::Log for CaptureLogger {
            fn enabled(&self, _: &log::Metadata<'_>) -> bool {
                true
            }

            fn log(&self, record: &log::Record<'_>) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        static LOGGER: CaptureLogger = CaptureLogger;

        #[test]
        fn unrecognized_input_is_not_logged_verbatim() {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);

            let mut reg = CommandRegistry::new();
            let mut console = MockConsole::with_lines(&["hunter2-secret", "exit"]);
            run(&mut reg, &mut console);

            let records = RECORDS.lock().unwrap();
            assert!(records.iter().any(|r| r.starts_with("Unrecognized input")));
            assert!(!records.iter().any(|r| r.contains("hunter2-secret")));
        }
    }
}
