//! Interactive command session.
//!
//! Commands are registered by name in a [`CommandRegistry`], each owning a
//! list of [`Parameter`]s. A [`Session`] reads a command name, checks the
//! command's guard, prompts for every parameter (masked for passwords),
//! validates them, and executes the command, until `exit` is selected.

mod builtins;
mod command;
mod console;
mod masked;
mod parameter;
mod registry;
mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Names of the built-in commands.
pub use builtins::{BUILTIN_COMMANDS, CLEAR_COMMAND, EXIT_COMMAND, HELP_COMMAND};
/// A named unit of work with guard, parameters and action.
pub use command::{Action, ActionFn, Command, CommandSummary, Environment, Guard, ParameterSummary};
/// Line and keystroke I/O surface driven by a session.
pub use console::Console;
/// Masked keystroke entry.
pub use masked::read_masked;
/// A validated input slot.
pub use parameter::{Parameter, Validator, not_blank};
/// Name-keyed command table.
pub use registry::CommandRegistry;
/// The read-validate-execute loop.
pub use session::Session;
