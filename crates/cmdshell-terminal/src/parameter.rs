//! Named, validated input slots collected before a command runs.

use std::fmt;

use cmdshell_types::error::Result;

/// Validation strategy for a parameter value.
///
/// Defaults to [`Validator::Always`], which accepts any value.
#[derive(Default)]
pub enum Validator {
    #[default]
    Always,
    /// Accept the value when the predicate returns `Ok(true)`.
    Predicate(Box<dyn Fn(&str) -> Result<bool>>),
}

impl Validator {
    /// Run the strategy against a value.
    pub fn check(&self, value: &str) -> Result<bool> {
        match self {
            Self::Always => Ok(true),
            Self::Predicate(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Predicate that rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<bool> {
    Ok(!value.trim().is_empty())
}

/// A single input slot owned by a [`Command`](crate::Command), which keys
/// it by name.
#[derive(Debug)]
pub struct Parameter {
    /// Text shown when asking for the value.
    pub prompt: String,
    /// One-line description for `help`.
    pub description: String,
    /// Marks the prompt as required. Advisory; validation decides acceptance.
    pub is_required: bool,
    /// Collect the value with masked keystroke entry.
    pub is_password: bool,
    /// Last collected value. Setting it never triggers validation.
    pub value: String,
    pub validator: Validator,
    /// Shown to the user when the validator rejects the value.
    pub failure_message: String,
}

impl Parameter {
    /// Create a required, plain-text parameter with the given prompt.
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Mark the parameter as not required.
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Collect the value with masked entry.
    pub fn password(mut self) -> Self {
        self.is_password = true;
        self
    }

    pub fn with_validator(mut self, predicate: impl Fn(&str) -> Result<bool> + 'static) -> Self {
        self.validator = Validator::Predicate(Box::new(predicate));
        self
    }

    pub fn with_failure_message(mut self, message: &str) -> Self {
        self.failure_message = message.to_string();
        self
    }

    /// Check the current value. Has no side effects beyond the predicate.
    pub fn validate(&self) -> Result<bool> {
        self.validator.check(&self.value)
    }

    /// Prompt text as shown to the user, e.g. `Username*: `.
    pub fn display_prompt(&self) -> String {
        let marker = if self.is_required { "*" } else { "" };
        format!("{}{marker}: ", self.prompt)
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            description: String::new(),
            is_required: true,
            is_password: false,
            value: String::new(),
            validator: Validator::Always,
            failure_message: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdshell_types::error::ShellError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn defaults() {
        let p = Parameter::default();
        assert!(p.is_required);
        assert!(!p.is_password);
        assert!(p.prompt.is_empty());
        assert!(p.description.is_empty());
        assert!(p.failure_message.is_empty());
        assert!(p.value.is_empty());
        assert!(matches!(p.validator, Validator::Always));
        assert!(p.validate().unwrap());
    }

    #[test]
    fn builder_sets_fields() {
        let p = Parameter::new("Test")
            .with_description("Test Parameter")
            .optional()
            .password()
            .with_failure_message("Bad Parameter");
        assert_eq!(p.prompt, "Test");
        assert_eq!(p.description, "Test Parameter");
        assert!(!p.is_required);
        assert!(p.is_password);
        assert_eq!(p.failure_message, "Bad Parameter");
    }

    #[test]
    fn validator_receives_current_value() {
        let seen = Rc::new(RefCell::new(None));
        let seen_in = Rc::clone(&seen);
        let mut p = Parameter::new("Test").with_validator(move |v| {
            *seen_in.borrow_mut() = Some(v.to_string());
            Ok(true)
        });
        p.value = "value".to_string();
        assert!(p.validate().unwrap());
        assert_eq!(seen.borrow().as_deref(), Some("value"));
    }

    #[test]
    fn setting_value_does_not_validate() {
        let calls = Rc::new(RefCell::new(0));
        let calls_in = Rc::clone(&calls);
        let mut p = Parameter::new("Test").with_validator(move |_| {
            *calls_in.borrow_mut() += 1;
            Ok(true)
        });
        p.value = "a".to_string();
        p.value.push('b');
        assert_eq!(*calls.borrow(), 0);
        p.validate().unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn rejecting_validator() {
        let p = Parameter::new("Test").with_validator(|_| Ok(false));
        assert!(!p.validate().unwrap());
    }

    #[test]
    fn validator_error_propagates() {
        let p = Parameter::new("Test")
            .with_validator(|_| Err(ShellError::Command("lookup failed".into())));
        assert!(p.validate().is_err());
    }

    #[test]
    fn not_blank_predicate() {
        assert!(not_blank("hello").unwrap());
        assert!(!not_blank("").unwrap());
        assert!(!not_blank("  \t ").unwrap());
    }

    #[test]
    fn display_prompt_marks_required() {
        assert_eq!(Parameter::new("Username").display_prompt(), "Username*: ");
        assert_eq!(
            Parameter::new("Nickname").optional().display_prompt(),
            "Nickname: "
        );
    }

    #[test]
    fn validator_debug() {
        assert_eq!(format!("{:?}", Validator::Always), "Always");
        let v = Validator::Predicate(Box::new(|_| Ok(true)));
        assert_eq!(format!("{v:?}"), "Predicate(..)");
    }
}
