//! Logger setup and session config resolution shared by the binaries.

use std::path::Path;

use chrono::Datelike;

use cmdshell_types::config::{AppInfo, SessionConfig};
use cmdshell_types::error::Result;

/// Environment variable naming a session config file.
pub const CONFIG_ENV: &str = "CMDSHELL_CONFIG";

/// Install `env_logger` on stderr.
///
/// Defaults to `warn` because stderr shares the terminal with the session.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Resolve the session config from the first CLI argument or
/// [`CONFIG_ENV`], falling back to defaults around `app`.
pub fn resolve_config(app: AppInfo) -> Result<SessionConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());
    match path {
        Some(path) => load_config(Path::new(&path), app),
        None => Ok(SessionConfig::new(app)),
    }
}

/// Load `path`, keeping the built-in banner unless the file sets `[app]`.
pub fn load_config(path: &Path, app: AppInfo) -> Result<SessionConfig> {
    let mut config = SessionConfig::load(path)?;
    if config.app == AppInfo::default() {
        config.app = app;
    }
    log::info!("Using session config {}", path.display());
    Ok(config)
}

/// Banner values for a binary of this package, stamped with the current
/// local year.
pub fn package_app_info(title: &str) -> AppInfo {
    let app = AppInfo::new(title, env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));
    match u16::try_from(chrono::Local::now().year()) {
        Ok(year) => app.with_year(year),
        Err(_) => app,
    }
}
