//! The kill ring: a bounded collection of erased text snippets,
//! most-recent-first, rotatable by yank-pop.

use std::collections::VecDeque;

/// Maximum number of snippets retained.
const MAX_ENTRIES: usize = 16;

/// A bounded ring of killed text snippets. The front entry is the most
/// recently killed (or most recently yank-rotated) snippet.
#[derive(Clone, Debug, Default)]
pub struct KillRing {
    entries: VecDeque<String>,
}

impl KillRing {
    /// Constructs an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the ring holds no snippets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of snippets held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Starts a new kill entry with the given text.
    pub fn start_kill(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.entries.push_front(text);
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Extends the current kill with text erased after it (a forward
    /// kill such as kill-to-end-of-line). Starts a new entry when the
    /// ring is empty.
    pub fn extend_kill_forward(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.entries.front_mut() {
            Some(front) => front.push_str(text),
            None => self.start_kill(text),
        }
    }

    /// Extends the current kill with text erased before it (a backward
    /// kill such as kill-previous-word).
    pub fn extend_kill_backward(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.entries.front_mut() {
            Some(front) => front.insert_str(0, text),
            None => self.start_kill(text),
        }
    }

    /// The snippet a yank would insert.
    pub fn yank(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Rotates the ring one step (front moves to the back) and returns
    /// the new front, as used by yank-pop.
    pub fn pop_yank(&mut self) -> Option<&str> {
        if self.entries.len() < 2 {
            return self.entries.front().map(String::as_str);
        }
        if let Some(front) = self.entries.pop_front() {
            self.entries.push_back(front);
        }
        self.entries.front().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_most_recent_first() {
        let mut ring = KillRing::new();
        ring.start_kill("one");
        ring.start_kill("two");
        assert_eq!(ring.yank(), Some("two"));
    }

    #[test]
    fn test_forward_and_backward_extension() {
        let mut ring = KillRing::new();
        ring.start_kill("middle");
        ring.extend_kill_forward(" end");
        ring.extend_kill_backward("start ");
        assert_eq!(ring.yank(), Some("start middle end"));
    }

    #[test]
    fn test_pop_yank_rotates() {
        let mut ring = KillRing::new();
        ring.start_kill("one");
        ring.start_kill("two");
        ring.start_kill("three");

        assert_eq!(ring.yank(), Some("three"));
        assert_eq!(ring.pop_yank(), Some("two"));
        assert_eq!(ring.pop_yank(), Some("one"));
        assert_eq!(ring.pop_yank(), Some("three"));
    }

    #[test]
    fn test_bounded() {
        let mut ring = KillRing::new();
        for i in 0..MAX_ENTRIES + 5 {
            ring.start_kill(std::format!("kill {i}"));
        }
        assert_eq!(ring.len(), MAX_ENTRIES);
        assert_eq!(ring.yank(), Some("kill 20"));
    }

    #[test]
    fn test_empty_kills_ignored() {
        let mut ring = KillRing::new();
        ring.start_kill("");
        ring.extend_kill_forward("");
        assert!(ring.is_empty());
        assert_eq!(ring.yank(), None);
    }
}
