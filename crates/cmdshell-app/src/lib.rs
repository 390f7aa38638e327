//! Terminal entry points for cmdshell.
//!
//! Hosts the crossterm-backed [`console::TerminalConsole`], the startup
//! helpers shared by both binaries, and the demo commands they register.

pub mod commands;
pub mod console;
pub mod startup;
pub mod users;
