//! Error types for cmdshell.

use std::io;

/// Errors produced by the cmdshell framework.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// A command or parameter was registered under a name its owner already holds.
    #[error("the command or parameter named '{0}' already exists")]
    DuplicateName(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("console error: {0}")]
    Console(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
