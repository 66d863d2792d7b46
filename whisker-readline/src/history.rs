//! Facilities for tracking and persisting the editor's input history,
//! including prefix browsing and incremental search state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    io::{Read, Seek, Write},
    path::PathBuf,
};

use crate::{error, trace_categories};

/// One remembered input.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HistoryItem {
    /// The input text. Items are keyed (and deduplicated) by this.
    pub cmd: String,
    /// The working directory the input was accepted in.
    pub cwd: String,
    /// When the input was accepted.
    pub timestamp: DateTime<Utc>,
    /// How long the input was being edited, in seconds.
    pub duration: f64,
    /// The exit code of whatever consumed the input.
    pub exit_code: i32,
}

/// Persistent, ordered, deduplicated input history.
///
/// Items are kept in ascending timestamp order, at most `max_items` of
/// them. The on-disk form is a pretty-printed JSON array, shared across
/// processes via advisory file locking: writers re-read and merge under
/// an exclusive lock, so concurrent appends are never lost.
#[derive(Debug)]
pub struct History {
    items: Vec<HistoryItem>,
    cmd_index: HashMap<String, usize>,
    file_path: Option<PathBuf>,
    max_items: usize,
}

impl History {
    /// Constructs a history, populated from `file_path` when given. A
    /// missing or unreadable file simply yields an empty history.
    pub fn new(file_path: Option<PathBuf>, max_items: usize) -> Self {
        let mut history = Self {
            items: Vec::new(),
            cmd_index: HashMap::new(),
            file_path,
            max_items,
        };
        if let Err(err) = history.reload() {
            tracing::debug!(target: trace_categories::HISTORY, "ignoring history file: {err}");
        }
        history
    }

    /// The items, oldest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one item, merging by `cmd`.
    pub fn add(&mut self, item: HistoryItem) {
        self.merge(vec![item]);
    }

    /// Merges a batch of items into memory: items sharing a `cmd` keep
    /// the later timestamp; the result is re-sorted and truncated from
    /// the front to `max_items`.
    pub fn merge(&mut self, incoming: Vec<HistoryItem>) {
        for item in incoming {
            match self.cmd_index.get(&item.cmd) {
                Some(&index) if self.items[index].timestamp >= item.timestamp => {}
                Some(&index) => self.items[index] = item,
                None => {
                    self.cmd_index.insert(item.cmd.clone(), self.items.len());
                    self.items.push(item);
                }
            }
        }

        self.items.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        if self.items.len() > self.max_items {
            let excess = self.items.len() - self.max_items;
            self.items.drain(..excess);
        }
        self.rebuild_index();
    }

    /// Re-reads the history file (shared lock) and merges its contents.
    /// Files that cannot be parsed are ignored, not overwritten.
    pub fn reload(&mut self) -> Result<(), error::Error> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let file = std::fs::File::open(&path)?;
        let contents = with_locked_file(file, false, |file| {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            Ok(contents)
        })?;

        let parsed: Vec<HistoryItem> = serde_json::from_str(&contents)?;
        self.merge(parsed);
        Ok(())
    }

    /// Writes the history to its file: under an exclusive lock, the
    /// on-disk items are re-read and merged (so updates from concurrent
    /// writers survive), then the file is truncated and rewritten as
    /// sorted, pretty-printed JSON. The file is created mode 0600.
    pub fn write(&mut self) -> Result<(), error::Error> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };

        let mut open_options = std::fs::OpenOptions::new();
        open_options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            open_options.mode(0o600);
        }
        let file = open_options.open(&path)?;

        let items = with_locked_file(file, true, |file| {
            // Merge whatever landed on disk since we last read it.
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            if let Ok(on_disk) = serde_json::from_str::<Vec<HistoryItem>>(&contents) {
                self.merge(on_disk);
            } else if !contents.trim().is_empty() {
                tracing::warn!(target: trace_categories::HISTORY, "history file is not valid JSON; rewriting");
            }

            file.set_len(0)?;
            file.seek(std::io::SeekFrom::Start(0))?;
            serde_json::to_writer_pretty(&mut *file, &self.items)?;
            file.write_all(b"\n")?;
            file.flush()?;
            Ok(self.items.len())
        })?;

        tracing::debug!(target: trace_categories::HISTORY, "wrote {items} history items");
        Ok(())
    }

    /// Builds prefix-browse state: the commands starting with `prefix`
    /// (oldest first) followed by the current input as a sentinel, with
    /// the position on the sentinel.
    pub fn prefix_matches(&self, prefix: &str, current_input: &str) -> HistoryMatches {
        let mut items: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.cmd.starts_with(prefix))
            .map(|item| item.cmd.clone())
            .collect();
        items.push(current_input.to_owned());
        let current_idx = items.len() - 1;

        HistoryMatches { items, current_idx }
    }

    fn rebuild_index(&mut self) {
        self.cmd_index.clear();
        for (index, item) in self.items.iter().enumerate() {
            self.cmd_index.insert(item.cmd.clone(), index);
        }
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        assert!(self.items.len() <= self.max_items);
        assert!(
            self.items
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp)
        );
        assert_eq!(self.cmd_index.len(), self.items.len());
        for (cmd, &index) in &self.cmd_index {
            assert_eq!(&self.items[index].cmd, cmd);
        }
    }
}

impl HistoryItem {
    /// Constructs an item stamped with the current time.
    pub fn new(cmd: impl Into<String>, cwd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: cwd.into(),
            timestamp: Utc::now(),
            duration: 0.0,
            exit_code: 0,
        }
    }
}

/// Prefix-browse state: a filtered list of past commands with the
/// original input as a trailing sentinel.
#[derive(Clone, Debug)]
pub struct HistoryMatches {
    items: Vec<String>,
    current_idx: usize,
}

impl HistoryMatches {
    /// The currently selected entry.
    pub fn current(&self) -> &str {
        &self.items[self.current_idx]
    }

    /// Whether the selection sits on the sentinel (the original input).
    pub fn on_sentinel(&self) -> bool {
        self.current_idx + 1 == self.items.len()
    }

    /// Moves to an older entry. Errs with the not-applicable sentinel at
    /// the oldest entry.
    pub fn previous(&mut self, count: usize) -> Result<&str, error::Error> {
        if self.current_idx == 0 {
            return Err(error::ErrorKind::NotApplicable.into());
        }
        self.current_idx = self.current_idx.saturating_sub(count.max(1));
        Ok(self.current())
    }

    /// Moves to a newer entry (ultimately back to the original input).
    pub fn next(&mut self, count: usize) -> Result<&str, error::Error> {
        if self.on_sentinel() {
            return Err(error::ErrorKind::NotApplicable.into());
        }
        self.current_idx = (self.current_idx + count.max(1)).min(self.items.len() - 1);
        Ok(self.current())
    }

    /// Moves to the oldest entry.
    pub fn first(&mut self) -> &str {
        self.current_idx = 0;
        self.current()
    }

    /// Moves to the sentinel (the original input).
    pub fn last(&mut self) -> &str {
        self.current_idx = self.items.len() - 1;
        self.current()
    }
}

/// Incremental-search state. The query is shell-tokenized; an item
/// matches when its text contains every token. Item order is preserved.
#[derive(Clone, Debug)]
pub struct HistorySearch {
    query: String,
    matches: Vec<String>,
    current_idx: Option<usize>,
    backwards: bool,
    original_input: String,
}

impl HistorySearch {
    /// Starts a search, snapshotting the input to restore on cancel.
    pub fn new(backwards: bool, original_input: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            matches: Vec::new(),
            current_idx: None,
            backwards,
            original_input: original_input.into(),
        }
    }

    /// The current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The input as it was when the search began.
    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    /// The currently selected match, if any.
    pub fn current_match(&self) -> Option<&str> {
        self.current_idx.map(|index| self.matches[index].as_str())
    }

    /// Appends a character to the query and refilters.
    pub fn push_query_char(&mut self, c: char, history: &History) {
        self.query.push(c);
        self.refilter(history);
    }

    /// Appends text to the query and refilters.
    pub fn push_query_text(&mut self, text: &str, history: &History) {
        self.query.push_str(text);
        self.refilter(history);
    }

    /// Removes the last query character and refilters. Errs when the
    /// query is already empty.
    pub fn pop_query_char(&mut self, history: &History) -> Result<(), error::Error> {
        if self.query.pop().is_none() {
            return Err(error::ErrorKind::NotApplicable.into());
        }
        self.refilter(history);
        Ok(())
    }

    /// Moves the selection. `backwards` here means toward older items.
    pub fn advance(&mut self, backwards: bool, count: usize) -> Result<(), error::Error> {
        let Some(index) = self.current_idx else {
            return Err(error::ErrorKind::NotApplicable.into());
        };
        let count = count.max(1);
        if backwards {
            if index == 0 {
                return Err(error::ErrorKind::NotApplicable.into());
            }
            self.current_idx = Some(index.saturating_sub(count));
        } else {
            if index + 1 >= self.matches.len() {
                return Err(error::ErrorKind::NotApplicable.into());
            }
            self.current_idx = Some((index + count).min(self.matches.len() - 1));
        }
        Ok(())
    }

    /// The direction the search was started in.
    pub const fn is_backwards(&self) -> bool {
        self.backwards
    }

    /// Recomputes the match list against the history.
    pub fn refilter(&mut self, history: &History) {
        let tokens = shlex::split(&self.query)
            .unwrap_or_else(|| self.query.split_whitespace().map(str::to_owned).collect());

        self.matches = history
            .items()
            .iter()
            .filter(|item| tokens.iter().all(|token| item.cmd.contains(token.as_str())))
            .map(|item| item.cmd.clone())
            .collect();

        self.current_idx = if self.matches.is_empty() {
            None
        } else if self.backwards {
            Some(self.matches.len() - 1)
        } else {
            Some(0)
        };
    }
}

/// Runs `operation` on the file while holding an advisory lock: shared
/// for readers, exclusive for writers. On platforms without advisory
/// locking the operation simply runs unlocked.
fn with_locked_file<R>(
    file: std::fs::File,
    exclusive: bool,
    operation: impl FnOnce(&mut std::fs::File) -> Result<R, error::Error>,
) -> Result<R, error::Error> {
    #[cfg(unix)]
    {
        use nix::fcntl::{Flock, FlockArg};

        let arg = if exclusive {
            FlockArg::LockExclusive
        } else {
            FlockArg::LockShared
        };
        let mut locked =
            Flock::lock(file, arg).map_err(|(_, errno)| error::ErrorKind::LockError(errno))?;
        operation(&mut locked)
    }
    #[cfg(not(unix))]
    {
        let _ = exclusive;
        let mut file = file;
        operation(&mut file)
    }
}
