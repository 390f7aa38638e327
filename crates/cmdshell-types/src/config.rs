//! Session configuration loaded from TOML.
//!
//! ```toml
//! prompt = "> "
//! mask = "*"
//!
//! [app]
//! title = "Acme Admin"
//! version = "2.1.0"
//! company = "Acme Corporation"
//! year = 2026
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Banner values supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub company: String,
    /// Copyright year. Omitted from the banner when unset.
    #[serde(default)]
    pub year: Option<u16>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl AppInfo {
    pub fn new(title: &str, version: &str, company: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            company: company.to_string(),
            year: None,
        }
    }

    /// Set the copyright year shown in the banner.
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// First banner line.
    pub fn title_line(&self) -> String {
        format!(
            "{} Command Line Interface (CLI) Version {}",
            self.title, self.version
        )
    }

    /// Second banner line.
    pub fn copyright_line(&self) -> String {
        match self.year {
            Some(year) => format!(
                "Copyright © {year} by {}.  All rights reserved.",
                self.company
            ),
            None => format!("Copyright © by {}.  All rights reserved.", self.company),
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            version: default_version(),
            company: String::new(),
            year: None,
        }
    }
}

/// Everything a session needs besides its command table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub app: AppInfo,
    /// Text written before each command line is read.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Character echoed for each masked keystroke.
    #[serde(default = "default_mask")]
    pub mask: char,
}

fn default_prompt() -> String {
    "> ".to_string()
}
fn default_mask() -> char {
    '*'
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app: AppInfo::default(),
            prompt: default_prompt(),
            mask: default_mask(),
        }
    }
}

impl SessionConfig {
    /// Build a config around the given banner values.
    pub fn new(app: AppInfo) -> Self {
        Self {
            app,
            ..Self::default()
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ShellError::Config(format!("session config: {e}")))
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| ShellError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded session config from {}", path.display());
        Ok(config)
    }
}
