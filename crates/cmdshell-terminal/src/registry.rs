//! Command table owned by a session.

use cmdshell_types::error::{Result, ShellError};

use crate::builtins::{BUILTIN_COMMANDS, builtin_commands};
use crate::command::{Command, CommandSummary};

/// Registry of available commands, keyed by name.
///
/// Always holds the `help`, `clear` and `exit` built-ins, which cannot be
/// removed. Commands are listed in registration order. Names live only in
/// the registry, so a command reached through
/// [`get_command_mut`](Self::get_command_mut) can be edited or even replaced
/// without losing its name.
pub struct CommandRegistry {
    commands: Vec<(String, Command)>,
}

impl CommandRegistry {
    /// Create a registry holding only the built-in commands.
    pub fn new() -> Self {
        let commands = builtin_commands()
            .into_iter()
            .map(|(name, cmd)| (name.to_string(), cmd))
            .collect();
        Self { commands }
    }

    /// Whether `name` is one of the non-removable built-ins.
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_COMMANDS.contains(&name)
    }

    /// Register `command` under `name` and return it for further setup.
    ///
    /// Fails with [`ShellError::DuplicateName`] if the name is taken; the
    /// registry is left unchanged in that case.
    pub fn add_command(&mut self, name: &str, command: Command) -> Result<&mut Command> {
        if self.position(name).is_some() {
            return Err(ShellError::DuplicateName(name.to_string()));
        }
        self.commands.push((name.to_string(), command));
        log::debug!("Registered command '{name}'");
        let last = self.commands.len() - 1;
        Ok(&mut self.commands[last].1)
    }

    /// Remove and return the command called `name`.
    ///
    /// Built-ins are never removed; asking for one returns `None`.
    pub fn remove_command(&mut self, name: &str) -> Option<Command> {
        if Self::is_builtin(name) {
            log::warn!("Refusing to remove built-in command '{name}'");
            return None;
        }
        let idx = self.position(name)?;
        log::debug!("Removed command '{name}'");
        Some(self.commands.remove(idx).1)
    }

    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.position(name).map(|idx| &self.commands[idx].1)
    }

    pub fn get_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        let idx = self.position(name)?;
        Some(&mut self.commands[idx].1)
    }

    /// Commands with their names, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(name, cmd)| (name.as_str(), cmd))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always `false`: the built-ins are permanent.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Copy of the listing, safe to hold while the table changes.
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands
            .iter()
            .map(|(name, cmd)| cmd.summary(name))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|(key, _)| key == name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
