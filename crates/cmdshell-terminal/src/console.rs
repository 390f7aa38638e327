//! The I/O surface a session talks to.

use cmdshell_types::error::Result;
use cmdshell_types::input::Keystroke;

/// Line-oriented output sink plus line and keystroke input sources.
///
/// Backends own the terminal; the session only issues calls.
pub trait Console {
    /// Write text followed by a newline.
    fn write_line(&mut self, text: &str) -> Result<()>;

    /// Write text without a trailing newline.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Clear the display.
    fn clear(&mut self) -> Result<()>;

    /// Read one line of input, without its terminator.
    ///
    /// Returns `None` once the input source is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Read a single key press without echoing it.
    fn read_key(&mut self) -> Result<Keystroke>;
}
