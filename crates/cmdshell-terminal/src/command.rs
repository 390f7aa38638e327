//! Commands: named units of work with a guard, parameters and an action.

use std::fmt;

use cmdshell_types::error::{Result, ShellError};

use crate::console::Console;
use crate::parameter::Parameter;

/// Executability check evaluated before any parameter is collected.
///
/// Defaults to [`Guard::Always`].
#[derive(Default)]
pub enum Guard {
    #[default]
    Always,
    /// Executable while the predicate returns `Ok(true)`.
    When(Box<dyn Fn() -> Result<bool>>),
}

impl Guard {
    pub fn check(&self) -> Result<bool> {
        match self {
            Self::Always => Ok(true),
            Self::When(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Signature of a command action.
pub type ActionFn = dyn Fn(&Command, &mut Environment<'_>) -> Result<()>;

/// What a command does once its parameters validate.
///
/// Defaults to [`Action::Nothing`].
#[derive(Default)]
pub enum Action {
    #[default]
    Nothing,
    Run(Box<ActionFn>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => f.write_str("Nothing"),
            Self::Run(_) => f.write_str("Run(..)"),
        }
    }
}

/// Listing entry for one parameter, copied out of its command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSummary {
    pub prompt: String,
    pub description: String,
    pub is_required: bool,
}

/// Listing entry for one command, copied out of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSummary>,
}

/// Context handed to a running action.
pub struct Environment<'a> {
    /// Where the action writes its output.
    pub console: &'a mut dyn Console,
    /// Snapshot of the registry taken before the action started.
    pub commands: Vec<CommandSummary>,
}

impl<'a> Environment<'a> {
    /// Environment with an empty command listing.
    pub fn new(console: &'a mut dyn Console) -> Self {
        Self {
            console,
            commands: Vec::new(),
        }
    }
}

/// A user-invokable unit of work. The owning registry keys it by name.
#[derive(Debug, Default)]
pub struct Command {
    /// One-line description for `help`.
    pub description: String,
    pub guard: Guard,
    /// Shown when the guard refuses execution.
    pub cannot_execute_message: String,
    pub action: Action,
    parameters: Vec<(String, Parameter)>,
}

impl Command {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_guard(mut self, predicate: impl Fn() -> Result<bool> + 'static) -> Self {
        self.guard = Guard::When(Box::new(predicate));
        self
    }

    pub fn with_cannot_execute_message(mut self, message: &str) -> Self {
        self.cannot_execute_message = message.to_string();
        self
    }

    pub fn with_action(
        mut self,
        action: impl Fn(&Command, &mut Environment<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.action = Action::Run(Box::new(action));
        self
    }

    /// Consuming form of [`add_parameter`](Self::add_parameter).
    pub fn with_parameter(mut self, name: &str, parameter: Parameter) -> Result<Self> {
        self.add_parameter(name, parameter)?;
        Ok(self)
    }

    /// Add a parameter under `name`.
    ///
    /// Fails with [`ShellError::DuplicateName`] if the name is taken; the
    /// command is left unchanged in that case. The name is fixed from here
    /// on: editing or replacing the parameter through
    /// [`get_parameter_mut`](Self::get_parameter_mut) keeps its key.
    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) -> Result<&mut Self> {
        if self.position(name).is_some() {
            return Err(ShellError::DuplicateName(name.to_string()));
        }
        self.parameters.push((name.to_string(), parameter));
        Ok(self)
    }

    /// Remove and return the parameter called `name`, if present.
    pub fn remove_parameter(&mut self, name: &str) -> Option<Parameter> {
        let idx = self.position(name)?;
        Some(self.parameters.remove(idx).1)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, p)| p)
    }

    pub fn get_parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, p)| p)
    }

    /// Current value of the parameter called `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get_parameter(name).map(|p| p.value.as_str())
    }

    /// Parameters with their names, in the order they were added.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = (&str, &Parameter)> {
        self.parameters.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub(crate) fn parameters_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.parameters.iter_mut().map(|(_, p)| p)
    }

    pub fn can_execute(&self) -> Result<bool> {
        self.guard.check()
    }

    /// Validate every parameter. Returns `true` only if all of them pass.
    ///
    /// Every predicate runs, even after the first failure.
    pub fn validate(&self) -> Result<bool> {
        let mut success = true;
        for (_, parameter) in &self.parameters {
            success &= parameter.validate()?;
        }
        Ok(success)
    }

    /// Validate every parameter once and return the ones that failed.
    pub fn failed_parameters(&self) -> Result<Vec<&Parameter>> {
        let mut failed = Vec::new();
        for (_, parameter) in &self.parameters {
            if !parameter.validate()? {
                failed.push(parameter);
            }
        }
        Ok(failed)
    }

    /// Run the action, passing this command. A command without an action
    /// succeeds without effect.
    pub fn execute(&self, env: &mut Environment<'_>) -> Result<()> {
        match &self.action {
            Action::Nothing => Ok(()),
            Action::Run(action) => action(self, env),
        }
    }

    /// Listing entry for this command registered as `name`.
    pub fn summary(&self, name: &str) -> CommandSummary {
        CommandSummary {
            name: name.to_string(),
            description: self.description.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|(_, p)| ParameterSummary {
                    prompt: p.prompt.clone(),
                    description: p.description.clone(),
                    is_required: p.is_required,
                })
                .collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|(key, _)| key == name)
    }
}
