//! The shortcut map: a trie of named keystrokes resolving to actions,
//! with support for multi-key chords and stacked, mode-scoped maps.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;

use crate::{actions::Action, error};

/// Outcome of resolving one keystroke against a map.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// A complete chord: run this action.
    Action(Action),
    /// A chord prefix matched; hold the keystroke and wait for more.
    Pending,
    /// Nothing matched.
    None,
}

#[derive(Clone, Debug, Default)]
struct Node {
    children: IndexMap<String, Node>,
    action: Option<Action>,
}

/// A trie of keystroke names (`"ctrl+a"`, `"alt+>"`, multi-key
/// `"ctrl+x ctrl+e"`) mapping to actions.
#[derive(Clone, Debug, Default)]
pub struct ShortcutMap {
    root: Node,
}

impl ShortcutMap {
    /// Constructs an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a space-separated chord to an action. Conflicts are
    /// reported: binding a leaf where a subtree already exists, or a
    /// chord whose prefix is already a leaf, names the existing action.
    pub fn add(&mut self, keys: &str, action: Action) -> Result<(), error::Error> {
        let mut node = &mut self.root;
        let chord: Vec<&str> = keys.split_whitespace().collect();

        for (index, key) in chord.iter().enumerate() {
            let is_last = index + 1 == chord.len();
            let child = node.children.entry((*key).to_owned()).or_default();

            if is_last {
                if !child.children.is_empty() {
                    return Err(conflict(keys, "a multi-key prefix"));
                }
                if let Some(existing) = &child.action {
                    return Err(conflict(keys, &std::format!("{existing:?}")));
                }
                child.action = Some(action);
                return Ok(());
            }

            if let Some(existing) = &child.action {
                return Err(conflict(keys, &std::format!("{existing:?}")));
            }
            node = child;
        }

        // An empty chord binds nothing.
        Ok(())
    }

    /// Resolves a keystroke given the currently pending chord path.
    pub fn resolve(&self, pending: &[String], key: &str) -> Resolution {
        let mut node = &self.root;
        for held in pending {
            match node.children.get(held) {
                Some(child) => node = child,
                None => return Resolution::None,
            }
        }

        match node.children.get(key) {
            Some(child) => {
                if let Some(action) = &child.action {
                    Resolution::Action(action.clone())
                } else if !child.children.is_empty() {
                    Resolution::Pending
                } else {
                    Resolution::None
                }
            }
            None => Resolution::None,
        }
    }
}

fn conflict(keys: &str, existing: &str) -> error::Error {
    error::ErrorKind::ShortcutConflict {
        keys: keys.to_owned(),
        existing: existing.to_owned(),
    }
    .into()
}

/// A stack of shortcut maps. Resolution consults the topmost map first;
/// lower maps only see keystrokes the upper ones ignored.
#[derive(Clone, Debug, Default)]
pub struct ShortcutStack {
    maps: Vec<ShortcutMap>,
}

impl ShortcutStack {
    /// Constructs a stack holding the given base map.
    pub fn new(base: ShortcutMap) -> Self {
        Self { maps: vec![base] }
    }

    /// Pushes an overlay map (e.g. history-search bindings).
    pub fn push(&mut self, map: ShortcutMap) {
        self.maps.push(map);
    }

    /// Pops the topmost overlay; the base map is never popped.
    pub fn pop(&mut self) {
        if self.maps.len() > 1 {
            self.maps.pop();
        }
    }

    /// Resolves a keystroke through the stack, top map first.
    pub fn resolve(&self, pending: &[String], key: &str) -> Resolution {
        for map in self.maps.iter().rev() {
            match map.resolve(pending, key) {
                Resolution::None => {}
                hit => return hit,
            }
        }
        Resolution::None
    }
}

/// Derives the canonical keystroke name for a key event, e.g.
/// `"ctrl+a"`, `"alt+->"`, `"shift+tab"`, `"enter"`. Returns `None` for
/// events that should be treated as plain text (unmodified printable
/// characters) or that have no stable name.
pub fn keystroke_name(event: &KeyEvent) -> Option<String> {
    let base = match event.code {
        KeyCode::Char(' ') => String::from("space"),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::Enter => String::from("enter"),
        KeyCode::Tab => String::from("tab"),
        KeyCode::BackTab => String::from("tab"),
        KeyCode::Backspace => String::from("backspace"),
        KeyCode::Delete => String::from("delete"),
        KeyCode::Insert => String::from("insert"),
        KeyCode::Left => String::from("left"),
        KeyCode::Right => String::from("right"),
        KeyCode::Up => String::from("up"),
        KeyCode::Down => String::from("down"),
        KeyCode::Home => String::from("home"),
        KeyCode::End => String::from("end"),
        KeyCode::PageUp => String::from("page_up"),
        KeyCode::PageDown => String::from("page_down"),
        KeyCode::Esc => String::from("esc"),
        KeyCode::F(n) => std::format!("f{n}"),
        _ => return None,
    };

    let mut name = String::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("alt+");
    }
    let shifted = event.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(event.code, KeyCode::BackTab);
    if shifted && !matches!(event.code, KeyCode::Char(_)) {
        name.push_str("shift+");
    }
    name.push_str(&base);

    // An unmodified printable character is text, not a shortcut.
    if name == base && matches!(event.code, KeyCode::Char(_)) {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_key_resolution() -> Result<()> {
        let mut map = ShortcutMap::new();
        map.add("ctrl+a", Action::MoveToStartOfLine)?;

        assert_eq!(
            map.resolve(&[], "ctrl+a"),
            Resolution::Action(Action::MoveToStartOfLine)
        );
        assert_eq!(map.resolve(&[], "ctrl+b"), Resolution::None);
        Ok(())
    }

    #[test]
    fn test_chord_resolution() -> Result<()> {
        let mut map = ShortcutMap::new();
        map.add("ctrl+x ctrl+e", Action::ClearScreen)?;

        assert_eq!(map.resolve(&[], "ctrl+x"), Resolution::Pending);
        assert_eq!(
            map.resolve(&[String::from("ctrl+x")], "ctrl+e"),
            Resolution::Action(Action::ClearScreen)
        );
        assert_eq!(
            map.resolve(&[String::from("ctrl+x")], "ctrl+q"),
            Resolution::None
        );
        Ok(())
    }

    #[test]
    fn test_leaf_over_subtree_conflict() -> Result<()> {
        let mut map = ShortcutMap::new();
        map.add("ctrl+x ctrl+e", Action::ClearScreen)?;

        let err = map.add("ctrl+x", Action::Yank).unwrap_err();
        assert!(err.to_string().contains("ctrl+x"));
        Ok(())
    }

    #[test]
    fn test_prefix_of_leaf_conflict() -> Result<()> {
        let mut map = ShortcutMap::new();
        map.add("ctrl+x", Action::Yank)?;

        let err = map.add("ctrl+x ctrl+e", Action::ClearScreen).unwrap_err();
        assert!(err.to_string().contains("Yank"));
        Ok(())
    }

    #[test]
    fn test_duplicate_binding_conflict() -> Result<()> {
        let mut map = ShortcutMap::new();
        map.add("ctrl+k", Action::KillToEndOfLine)?;
        assert!(map.add("ctrl+k", Action::Yank).is_err());
        Ok(())
    }

    #[test]
    fn test_stack_overlay_wins() -> Result<()> {
        let mut base = ShortcutMap::new();
        base.add("up", Action::CursorUp)?;
        base.add("ctrl+k", Action::KillToEndOfLine)?;

        let mut overlay = ShortcutMap::new();
        overlay.add("up", Action::HistoryPrevious)?;

        let mut stack = ShortcutStack::new(base);
        stack.push(overlay);

        assert_eq!(
            stack.resolve(&[], "up"),
            Resolution::Action(Action::HistoryPrevious)
        );
        // Falls through to the base map.
        assert_eq!(
            stack.resolve(&[], "ctrl+k"),
            Resolution::Action(Action::KillToEndOfLine)
        );

        stack.pop();
        assert_eq!(stack.resolve(&[], "up"), Resolution::Action(Action::CursorUp));

        // The base map survives extra pops.
        stack.pop();
        assert_eq!(stack.resolve(&[], "up"), Resolution::Action(Action::CursorUp));
        Ok(())
    }

    #[test]
    fn test_keystroke_names() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let name = |code, modifiers| keystroke_name(&KeyEvent::new(code, modifiers));

        assert_eq!(
            name(KeyCode::Char('a'), KeyModifiers::CONTROL).as_deref(),
            Some("ctrl+a")
        );
        assert_eq!(
            name(KeyCode::Char('>'), KeyModifiers::ALT).as_deref(),
            Some("alt+>")
        );
        assert_eq!(name(KeyCode::Enter, KeyModifiers::NONE).as_deref(), Some("enter"));
        assert_eq!(name(KeyCode::Char(' '), KeyModifiers::NONE), None);
        assert_eq!(
            name(KeyCode::BackTab, KeyModifiers::SHIFT).as_deref(),
            Some("shift+tab")
        );
        // Plain printable characters are text, not shortcuts.
        assert_eq!(name(KeyCode::Char('a'), KeyModifiers::NONE), None);
        assert_eq!(
            name(KeyCode::Char('A'), KeyModifiers::SHIFT),
            None
        );
    }
}
