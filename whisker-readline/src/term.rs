//! Escape sequences understood by the host terminal, plus the raw-mode
//! guard used around interactive reads.

use crate::error;

/// Marks the start of a primary prompt.
pub const PROMPT_MARK_PRIMARY: &str = "\x1b]133;A\x1b\\";
/// Marks the start of a continuation prompt.
pub const PROMPT_MARK_CONTINUATION: &str = "\x1b]133;A;k=s\x1b\\";
/// Marks the end of the prompt region / start of command output.
pub const PROMPT_MARK_END: &str = "\x1b]133;C\x1b\\";

/// Enables bracketed paste reporting.
pub const BRACKETED_PASTE_ON: &str = "\x1b[?2004h";
/// Disables bracketed paste reporting.
pub const BRACKETED_PASTE_OFF: &str = "\x1b[?2004l";

/// Begins an atomic screen update (synchronized output, mode 2026).
pub const ATOMIC_UPDATE_START: &str = "\x1b[?2026h";
/// Ends an atomic screen update.
pub const ATOMIC_UPDATE_END: &str = "\x1b[?2026l";

/// Selects a bar-shaped cursor.
pub const CURSOR_SHAPE_BAR: &str = "\x1b[5 q";
/// Selects a block-shaped cursor.
pub const CURSOR_SHAPE_BLOCK: &str = "\x1b[1 q";
/// Restores the terminal's default cursor shape.
pub const CURSOR_SHAPE_DEFAULT: &str = "\x1b[0 q";

/// Saves private mode state on the terminal.
pub const SAVE_PRIVATE_MODES: &str = "\x1b[?s";
/// Restores previously saved private mode state.
pub const RESTORE_PRIVATE_MODES: &str = "\x1b[?r";
/// Saves the terminal color table.
pub const SAVE_COLORS: &str = "\x1b[#P";
/// Restores the saved terminal color table.
pub const RESTORE_COLORS: &str = "\x1b[#Q";

/// The terminal bell.
pub const BELL: &str = "\x07";
/// Clears from the cursor to the end of the screen.
pub const CLEAR_TO_END_OF_SCREEN: &str = "\x1b[J";

/// Enables raw mode for the lifetime of the guard.
#[derive(Debug)]
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    /// Puts the terminal into raw mode.
    pub fn new() -> Result<Self, error::Error> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self { enabled: true })
    }

    /// Leaves raw mode early.
    pub fn release(mut self) -> Result<(), error::Error> {
        self.enabled = false;
        crossterm::terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

/// The terminal width in columns, defaulting to 80 when unknown.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| usize::from(w))
        .unwrap_or(80)
}
