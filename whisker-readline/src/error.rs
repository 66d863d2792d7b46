//! Error facilities for the line editor.

/// Unified error type for this crate.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the kind of this error.
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Whether this is the internal "action not applicable" sentinel,
    /// which translates to a terminal bell and never reaches callers.
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self.kind, ErrorKind::NotApplicable)
    }

    /// Whether this is the user-cancel sentinel.
    pub const fn is_interrupted(&self) -> bool {
        matches!(self.kind, ErrorKind::Interrupted)
    }
}

/// Monolithic error type for the line editor.
#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    /// The dispatched action has no effect in the current state.
    #[error("action not applicable")]
    NotApplicable,

    /// The user canceled the current input.
    #[error("interrupted")]
    Interrupted,

    /// The input stream ended.
    #[error("end of input")]
    Eof,

    /// The process was killed by a signal; carries the signal name.
    #[error("killed by signal {0}")]
    KilledBySignal(String),

    /// An I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// The history file held something other than a history array.
    #[error("history format error: {0}")]
    HistoryFormat(#[from] serde_json::Error),

    /// The history file could not be locked.
    #[cfg(unix)]
    #[error("file lock error: {0}")]
    LockError(nix::errno::Errno),

    /// A shortcut insertion conflicted with an existing binding.
    #[error("shortcut conflict on '{keys}': already bound to {existing}")]
    ShortcutConflict {
        /// The chord being inserted.
        keys: String,
        /// Debug rendering of the action already present.
        existing: String,
    },
}

impl<T> From<T> for Error
where
    ErrorKind: From<T>,
{
    fn from(convertible_to_kind: T) -> Self {
        Self {
            kind: convertible_to_kind.into(),
        }
    }
}
