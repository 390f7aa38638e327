//! Foundation types for cmdshell.
//!
//! This crate contains the types shared by every cmdshell crate: the error
//! enum, keystroke classification for masked input, and session
//! configuration.

pub mod config;
pub mod error;
pub mod input;
