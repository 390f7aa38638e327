//! Platform-agnostic keystroke types.
//!
//! Every console backend maps its native key events to [`Keystroke`]. The
//! masked input reader never sees raw platform input.

/// Carriage return; terminates masked entry.
pub const ENTER_KEY: char = '\r';
/// Deletes the last masked character.
pub const BACKSPACE_KEY: char = '\u{8}';
/// Deletes every masked character entered so far.
pub const KILL_LINE_KEY: char = '\u{7f}';
/// Control characters dropped without echo: null, escape, tab, line feed.
pub const FILTERED_KEYS: [char; 4] = ['\0', '\u{1b}', '\t', '\n'];

/// A single key press read without echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keystroke {
    /// A character to append to the buffer.
    Char(char),
    /// Finish entry.
    Enter,
    /// Delete one character.
    Backspace,
    /// Delete the whole buffer.
    KillLine,
    /// A control key that is neither buffered nor echoed.
    Ignored,
}

impl Keystroke {
    /// Classify a raw character code.
    pub fn from_char(ch: char) -> Self {
        match ch {
            ENTER_KEY => Self::Enter,
            BACKSPACE_KEY => Self::Backspace,
            KILL_LINE_KEY => Self::KillLine,
            c if FILTERED_KEYS.contains(&c) => Self::Ignored,
            c => Self::Char(c),
        }
    }
}

impl From<char> for Keystroke {
    fn from(ch: char) -> Self {
        Self::from_char(ch)
    }
}
