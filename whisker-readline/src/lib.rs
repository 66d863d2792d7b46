//! Interactive line-editing core for whisker: a multi-line input buffer
//! with grapheme-cell cursor math, a kill ring, persistent history with
//! prefix browsing and incremental search, a trie-based shortcut map
//! with chords and numeric arguments, and a width-aware redraw engine —
//! all bound together by an event-driven controller.

#![deny(missing_docs)]

pub mod actions;
pub mod buffer;
pub mod editor;
pub mod error;
pub mod history;
pub mod killring;
pub mod render;
pub mod shortcuts;
pub mod term;
pub mod trace_categories;

pub use actions::Action;
pub use buffer::{InputBuffer, Position};
pub use editor::{Completer, Editor, EditorOptions, ReadResult};
pub use error::{Error, ErrorKind};
pub use history::{History, HistoryItem, HistoryMatches, HistorySearch};
pub use killring::KillRing;
pub use render::{Layout, Prompt, ScreenLine};
pub use shortcuts::{Resolution, ShortcutMap, ShortcutStack};
