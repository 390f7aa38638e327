//! [`Console`] backed by the process terminal.
//!
//! Lines go through stdin/stdout; masked entry switches the terminal into
//! raw mode for exactly one key press at a time.

use std::io::{self, BufRead, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};

use cmdshell_terminal::Console;
use cmdshell_types::error::{Result, ShellError};
use cmdshell_types::input::Keystroke;

/// Console over the real stdin/stdout.
pub struct TerminalConsole {
    stdout: io::Stdout,
    stdin: io::Stdin,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            stdin: io::stdin(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Leaves raw mode when dropped, even if reading the key failed.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Failed to leave raw mode: {e}");
        }
    }
}

/// Map a crossterm key event onto a keystroke.
///
/// Returns `Ok(None)` for events that are not key presses (releases and
/// repeats on platforms that report them).
pub fn map_key(key: KeyEvent) -> Result<Option<Keystroke>> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let stroke = match key.code {
        KeyCode::Enter => Keystroke::Enter,
        KeyCode::Backspace if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
            Keystroke::KillLine
        },
        KeyCode::Backspace => Keystroke::Backspace,
        KeyCode::Char('c') if ctrl => {
            return Err(ShellError::Console("input interrupted".to_string()));
        },
        KeyCode::Char('u') if ctrl => Keystroke::KillLine,
        KeyCode::Char('h') if ctrl => Keystroke::Backspace,
        KeyCode::Char(_) if ctrl => Keystroke::Ignored,
        KeyCode::Char(ch) => Keystroke::from_char(ch),
        _ => Keystroke::Ignored,
    };
    Ok(Some(stroke))
}

impl Console for TerminalConsole {
    fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.stdout, "{text}")?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        write!(self.stdout, "{text}")?;
        self.stdout.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn read_key(&mut self) -> Result<Keystroke> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(stroke) = map_key(key)? {
                    return Ok(stroke);
                }
            }
        }
    }
}
