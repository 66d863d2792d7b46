//! The editor's action vocabulary, dispatched through the shortcut map.

/// Everything a key binding can do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// Erase the cell before the cursor.
    Backspace,
    /// Erase the cell at the cursor.
    Delete,

    /// Move to the start of the current line.
    MoveToStartOfLine,
    /// Move to the end of the current line.
    MoveToEndOfLine,
    /// Move left to the start of the current or previous word.
    MoveToStartOfWord,
    /// Move right to the end of the current or next word.
    MoveToEndOfWord,
    /// Move to the very start of the buffer.
    MoveToStartOfDocument,
    /// Move to the very end of the buffer.
    MoveToEndOfDocument,

    /// Move the cursor one cell left.
    CursorLeft,
    /// Move the cursor one cell right.
    CursorRight,
    /// Move the cursor up one screen line; on the top line, browse
    /// history backward instead.
    CursorUp,
    /// Move the cursor down one screen line; on the bottom line, browse
    /// history forward instead.
    CursorDown,

    /// Select the previous matching history item.
    HistoryPrevious,
    /// Select the next matching history item.
    HistoryNext,
    /// Select the oldest matching history item.
    HistoryFirst,
    /// Select back to the current input.
    HistoryLast,
    /// Begin (or continue) incremental search toward newer items.
    HistoryIncrementalSearchForward,
    /// Begin (or continue) incremental search toward older items.
    HistoryIncrementalSearchBackward,
    /// Leave incremental search, restoring the pre-search input.
    TerminateHistorySearchAndRestore,
    /// Leave incremental search, keeping the selected item.
    TerminateHistorySearchAndApply,

    /// Kill to the end of the current line.
    KillToEndOfLine,
    /// Kill to the start of the current line.
    KillToStartOfLine,
    /// Kill to the end of the next word.
    KillNextWord,
    /// Kill to the start of the previous word.
    KillPreviousWord,
    /// Kill to the start of the previous whitespace-delimited word.
    KillPreviousSpaceWord,
    /// Insert the most recently killed text.
    Yank,
    /// After a yank, replace it with the next ring entry.
    PopYank,

    /// Abandon the current input line.
    AbortCurrentLine,
    /// Clear the screen and redraw the input at the top.
    ClearScreen,
    /// Accept the input and hand it to the caller.
    AcceptInput,
    /// End input: end-of-file on an empty buffer, else delete forward.
    EndInput,

    /// Select the next completion (or start completing).
    CompleteForward,
    /// Select the previous completion (or start completing).
    CompleteBackward,

    /// Append a digit to the pending numeric argument.
    NumericArgumentDigit(u8),
    /// Negate the pending numeric argument.
    NumericArgumentMinus,

    /// Insert literal text.
    AddText(String),
}

impl Action {
    /// Whether this action erases text into the kill ring.
    pub const fn is_kill(&self) -> bool {
        matches!(
            self,
            Self::KillToEndOfLine
                | Self::KillToStartOfLine
                | Self::KillNextWord
                | Self::KillPreviousWord
                | Self::KillPreviousSpaceWord
        )
    }

    /// Whether this action inserts from the kill ring.
    pub const fn is_yank(&self) -> bool {
        matches!(self, Self::Yank | Self::PopYank)
    }

    /// Whether this action cycles completions.
    pub const fn is_completion(&self) -> bool {
        matches!(self, Self::CompleteForward | Self::CompleteBackward)
    }

    /// Whether this action only contributes to the numeric argument
    /// (and must not consume or reset it).
    pub const fn is_numeric_argument(&self) -> bool {
        matches!(
            self,
            Self::NumericArgumentDigit(_) | Self::NumericArgumentMinus
        )
    }
}
