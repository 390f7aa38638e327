//! Masked keystroke entry for password parameters.

use cmdshell_types::error::Result;
use cmdshell_types::input::Keystroke;

use crate::console::Console;

/// Moves back over one mask character, blanks it, and moves back again.
const ERASE: &str = "\u{8} \u{8}";

/// Read keystrokes until Enter, echoing `mask` for every buffered character.
///
/// Backspace drops the last character, kill-line drops all of them, and
/// ignored control keys are neither buffered nor echoed. Returns the
/// characters in the order they were typed.
pub fn read_masked(console: &mut dyn Console, mask: char) -> Result<String> {
    let mut buffer: Vec<char> = Vec::new();
    let echo = mask.to_string();
    loop {
        match console.read_key()? {
            Keystroke::Enter => break,
            Keystroke::Backspace => {
                if buffer.pop().is_some() {
                    console.write(ERASE)?;
                }
            },
            Keystroke::KillLine => {
                while buffer.pop().is_some() {
                    console.write(ERASE)?;
                }
            },
            Keystroke::Ignored => {},
            Keystroke::Char(ch) => {
                buffer.push(ch);
                console.write(&echo)?;
            },
        }
    }
    console.write_line("")?;
    Ok(buffer.into_iter().collect())
}
