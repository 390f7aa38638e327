//! Shared test utilities for cmdshell-terminal tests.
//!
//! Provides a [`MockConsole`] that replays scripted input and records every
//! output call for assertion.

use std::collections::VecDeque;

use cmdshell_types::error::{Result, ShellError};
use cmdshell_types::input::Keystroke;

use crate::console::Console;

/// A recorded output call from the mock console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    Line(String),
    Text(String),
    Clear,
}

/// A console that reads from scripted queues and records all output.
pub struct MockConsole {
    pub calls: Vec<OutputCall>,
    lines: VecDeque<String>,
    keys: VecDeque<Keystroke>,
    /// Number of `read_line` calls made so far.
    pub line_reads: usize,
}

impl MockConsole {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            lines: VecDeque::new(),
            keys: VecDeque::new(),
            line_reads: 0,
        }
    }

    /// Console that will answer `read_line` with `lines`, in order.
    pub fn with_lines(lines: &[&str]) -> Self {
        let mut console = Self::new();
        console.lines = lines.iter().map(|l| l.to_string()).collect();
        console
    }

    /// Queue raw keystrokes; each character is classified with
    /// [`Keystroke::from_char`].
    pub fn push_keys(&mut self, raw: &str) {
        self.keys.extend(raw.chars().map(Keystroke::from_char));
    }

    /// Everything written, with `write_line` calls terminated by `\n`.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for call in &self.calls {
            match call {
                OutputCall::Line(text) => {
                    out.push_str(text);
                    out.push('\n');
                },
                OutputCall::Text(text) => out.push_str(text),
                OutputCall::Clear => {},
            }
        }
        out
    }

    /// Transcript split into lines.
    pub fn output_lines(&self) -> Vec<String> {
        self.transcript().lines().map(str::to_string).collect()
    }

    /// Count of `clear` calls.
    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutputCall::Clear))
            .count()
    }

    /// Scripted lines not yet consumed.
    pub fn remaining_lines(&self) -> usize {
        self.lines.len()
    }
}

impl Default for MockConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for MockConsole {
    fn write_line(&mut self, text: &str) -> Result<()> {
        self.calls.push(OutputCall::Line(text.to_string()));
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.calls.push(OutputCall::Text(text.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.calls.push(OutputCall::Clear);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.line_reads += 1;
        Ok(self.lines.pop_front())
    }

    fn read_key(&mut self) -> Result<Keystroke> {
        self.keys
            .pop_front()
            .ok_or_else(|| ShellError::Console("no scripted keystrokes left".to_string()))
    }
}
