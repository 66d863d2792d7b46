//! The multi-line input buffer: lines of text plus a cursor, with
//! grapheme-cell motion and range erasure.

/// A position in the buffer. `y` is a line index; `x` is a byte offset
/// into that line, always at a character boundary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Position {
    /// Byte offset into the line.
    pub x: usize,
    /// Line index.
    pub y: usize,
}

impl Position {
    /// Constructs a position.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    const fn ordering_key(self) -> (usize, usize) {
        (self.y, self.x)
    }
}

/// Returns whether a character counts as part of a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Returns whether a character counts as part of a space-delimited word.
pub fn is_space_word_char(c: char) -> bool {
    !c.is_whitespace()
}

/// The editable text buffer. Maintains the invariants
/// `0 <= cursor.y < lines.len()` and
/// `0 <= cursor.x <= lines[cursor.y].len()`.
#[derive(Clone, Debug)]
pub struct InputBuffer {
    lines: Vec<String>,
    cursor: Position,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::default(),
        }
    }
}

impl InputBuffer {
    /// Constructs an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer's lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The cursor position.
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// The line the cursor is on.
    pub fn current_line(&self) -> &str {
        &self.lines[self.cursor.y]
    }

    /// Whether the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// The whole buffer joined with newlines.
    pub fn all_text(&self) -> String {
        self.lines.join("\n")
    }

    /// The text strictly before the cursor, joined with newlines.
    pub fn text_before_cursor(&self) -> String {
        let mut text = String::new();
        for line in &self.lines[..self.cursor.y] {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&self.lines[self.cursor.y][..self.cursor.x]);
        text
    }

    /// The text at and after the cursor, joined with newlines.
    pub fn text_after_cursor(&self) -> String {
        let mut text = String::from(&self.lines[self.cursor.y][self.cursor.x..]);
        for line in &self.lines[self.cursor.y + 1..] {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    /// Replaces the whole buffer, leaving the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.move_to_end();
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor = Position::default();
    }

    /// Inserts text at the cursor. Embedded newlines split the current
    /// line; a trailing newline leaves the cursor on a fresh empty line.
    pub fn add_text(&mut self, text: &str) {
        let mut parts = text.split('\n');
        let Some(first) = parts.next() else {
            return;
        };

        self.lines[self.cursor.y].insert_str(self.cursor.x, first);
        self.cursor.x += first.len();

        for part in parts {
            let tail = self.lines[self.cursor.y].split_off(self.cursor.x);
            self.cursor.y += 1;
            self.lines
                .insert(self.cursor.y, std::format!("{part}{tail}"));
            self.cursor.x = part.len();
        }
    }

    /// The character just before the cursor; a line break reads as `\n`.
    pub fn prev_char(&self) -> Option<char> {
        if self.cursor.x > 0 {
            self.lines[self.cursor.y][..self.cursor.x].chars().last()
        } else if self.cursor.y > 0 {
            Some('\n')
        } else {
            None
        }
    }

    /// The character at the cursor; a line break reads as `\n`.
    pub fn next_char(&self) -> Option<char> {
        let line = &self.lines[self.cursor.y];
        if self.cursor.x < line.len() {
            line[self.cursor.x..].chars().next()
        } else if self.cursor.y + 1 < self.lines.len() {
            Some('\n')
        } else {
            None
        }
    }

    /// Moves the cursor left by up to `count` grapheme cells, crossing
    /// line breaks when `traverse_line_breaks` is set. Returns how many
    /// positions were actually moved (a line break counts as one).
    pub fn move_cursor_left(&mut self, count: usize, traverse_line_breaks: bool) -> usize {
        let mut moved = 0;
        while moved < count {
            if self.cursor.x > 0 {
                let line = &self.lines[self.cursor.y];
                let mut new_x = 0;
                for cell in whisker_text::cells(line) {
                    if cell.offset >= self.cursor.x {
                        break;
                    }
                    new_x = cell.offset;
                }
                self.cursor.x = new_x;
            } else if traverse_line_breaks && self.cursor.y > 0 {
                self.cursor.y -= 1;
                self.cursor.x = self.lines[self.cursor.y].len();
            } else {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Moves the cursor right by up to `count` grapheme cells; the
    /// counterpart of [`Self::move_cursor_left`].
    pub fn move_cursor_right(&mut self, count: usize, traverse_line_breaks: bool) -> usize {
        let mut moved = 0;
        while moved < count {
            let line_len = self.lines[self.cursor.y].len();
            if self.cursor.x < line_len {
                let next = whisker_text::cells_from(&self.lines[self.cursor.y], self.cursor.x)
                    .next();
                match next {
                    Some(cell) => self.cursor.x = cell.offset + cell.len,
                    None => break,
                }
            } else if traverse_line_breaks && self.cursor.y + 1 < self.lines.len() {
                self.cursor.y += 1;
                self.cursor.x = 0;
            } else {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Moves to the start of the current line.
    pub fn move_to_start_of_line(&mut self) {
        self.cursor.x = 0;
    }

    /// Moves to the end of the current line.
    pub fn move_to_end_of_line(&mut self) {
        self.cursor.x = self.lines[self.cursor.y].len();
    }

    /// Moves to the very start of the buffer.
    pub fn move_to_start(&mut self) {
        self.cursor = Position::default();
    }

    /// Moves to the very end of the buffer.
    pub fn move_to_end(&mut self) {
        self.cursor.y = self.lines.len() - 1;
        self.cursor.x = self.lines[self.cursor.y].len();
    }

    /// Moves left to the start of the current (or previous) word, up to
    /// `count` times. The predicate decides what counts as a word
    /// character. Returns how many words were crossed.
    pub fn move_to_start_of_word(
        &mut self,
        count: usize,
        is_word: fn(char) -> bool,
    ) -> usize {
        let mut moved = 0;
        for _ in 0..count {
            let before = self.cursor;
            while self.prev_char().is_some_and(|c| !is_word(c)) {
                if self.move_cursor_left(1, true) == 0 {
                    break;
                }
            }
            while self.prev_char().is_some_and(is_word) {
                if self.move_cursor_left(1, true) == 0 {
                    break;
                }
            }
            if self.cursor == before {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Moves right to the end of the current (or next) word, up to
    /// `count` times; the counterpart of [`Self::move_to_start_of_word`].
    pub fn move_to_end_of_word(
        &mut self,
        count: usize,
        is_word: fn(char) -> bool,
    ) -> usize {
        let mut moved = 0;
        for _ in 0..count {
            let before = self.cursor;
            while self.next_char().is_some_and(|c| !is_word(c)) {
                if self.move_cursor_right(1, true) == 0 {
                    break;
                }
            }
            while self.next_char().is_some_and(is_word) {
                if self.move_cursor_right(1, true) == 0 {
                    break;
                }
            }
            if self.cursor == before {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Erases everything between two positions (in either order) and
    /// returns the erased text. A cursor inside the erased range moves
    /// to its start; a cursor past it shifts to follow its text.
    pub fn erase_between(&mut self, a: Position, b: Position) -> String {
        let (start, end) = if a.ordering_key() <= b.ordering_key() {
            (a, b)
        } else {
            (b, a)
        };
        if start == end {
            return String::new();
        }

        let erased;
        if start.y == end.y {
            let line = &mut self.lines[start.y];
            erased = line[start.x..end.x].to_owned();
            line.replace_range(start.x..end.x, "");
        } else {
            let mut collected = self.lines[start.y][start.x..].to_owned();
            for line in &self.lines[start.y + 1..end.y] {
                collected.push('\n');
                collected.push_str(line);
            }
            collected.push('\n');
            collected.push_str(&self.lines[end.y][..end.x]);

            let tail = self.lines[end.y][end.x..].to_owned();
            self.lines[start.y].truncate(start.x);
            self.lines[start.y].push_str(&tail);
            self.lines.drain(start.y + 1..=end.y);
            erased = collected;
        }

        // Reposition the cursor relative to the erased range.
        let cursor_key = self.cursor.ordering_key();
        if cursor_key > start.ordering_key() {
            if cursor_key <= end.ordering_key() {
                self.cursor = start;
            } else if self.cursor.y == end.y {
                self.cursor = Position::new(start.x + (self.cursor.x - end.x), start.y);
            } else {
                self.cursor.y -= end.y - start.y;
            }
        }

        erased
    }

    /// Erases up to `count` cells before the cursor; returns the erased
    /// text.
    pub fn erase_chars_before_cursor(
        &mut self,
        count: usize,
        traverse_line_breaks: bool,
    ) -> String {
        let end = self.cursor;
        self.move_cursor_left(count, traverse_line_breaks);
        self.erase_between(self.cursor, end)
    }

    /// Erases up to `count` cells after the cursor; returns the erased
    /// text.
    pub fn erase_chars_after_cursor(
        &mut self,
        count: usize,
        traverse_line_breaks: bool,
    ) -> String {
        let start = self.cursor;
        self.move_cursor_right(count, traverse_line_breaks);
        self.erase_between(start, self.cursor)
    }

    /// Erases from the cursor to the end of the line; at the end of a
    /// line this erases the line break instead.
    pub fn erase_to_end_of_line(&mut self) -> String {
        let line_len = self.lines[self.cursor.y].len();
        if self.cursor.x < line_len {
            self.erase_between(self.cursor, Position::new(line_len, self.cursor.y))
        } else if self.cursor.y + 1 < self.lines.len() {
            self.erase_between(self.cursor, Position::new(0, self.cursor.y + 1))
        } else {
            String::new()
        }
    }

    /// Erases from the start of the line to the cursor.
    pub fn erase_to_start_of_line(&mut self) -> String {
        self.erase_between(Position::new(0, self.cursor.y), self.cursor)
    }

    /// Erases to the start of the previous word; returns the erased
    /// text.
    pub fn erase_previous_word(&mut self, is_word: fn(char) -> bool) -> String {
        let end = self.cursor;
        self.move_to_start_of_word(1, is_word);
        self.erase_between(self.cursor, end)
    }

    /// Erases to the end of the next word; returns the erased text.
    pub fn erase_next_word(&mut self, is_word: fn(char) -> bool) -> String {
        let start = self.cursor;
        self.move_to_end_of_word(1, is_word);
        self.erase_between(start, self.cursor)
    }

    /// Places the cursor at the given position, clamped to the buffer.
    pub fn set_cursor(&mut self, position: Position) {
        self.cursor.y = position.y.min(self.lines.len() - 1);
        let line = &self.lines[self.cursor.y];
        self.cursor.x = position.x.min(line.len());
        while self.cursor.x > 0 && !line.is_char_boundary(self.cursor.x) {
            self.cursor.x -= 1;
        }
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        assert!(!self.lines.is_empty());
        assert!(self.cursor.y < self.lines.len());
        assert!(self.cursor.x <= self.lines[self.cursor.y].len());
        assert!(self.lines[self.cursor.y].is_char_boundary(self.cursor.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_text_single_line() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("hello");
        assert_eq!(buffer.all_text(), "hello");
        assert_eq!(buffer.cursor(), Position::new(5, 0));
        buffer.assert_invariants();
    }

    #[test]
    fn test_add_text_multi_line() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("one\ntwo");
        assert_eq!(buffer.lines(), &["one", "two"]);
        assert_eq!(buffer.cursor(), Position::new(3, 1));

        // Insert in the middle of a line.
        buffer.set_cursor(Position::new(1, 0));
        buffer.add_text("X\nY");
        assert_eq!(buffer.lines(), &["oX", "Yne", "two"]);
        assert_eq!(buffer.cursor(), Position::new(1, 1));
        buffer.assert_invariants();
    }

    #[test]
    fn test_add_text_trailing_newline() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("cmd\n");
        assert_eq!(buffer.lines(), &["cmd", ""]);
        assert_eq!(buffer.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_cursor_motion_over_graphemes() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("a日b");

        assert_eq!(buffer.move_cursor_left(2, false), 2);
        assert_eq!(buffer.cursor(), Position::new(1, 0));
        assert_eq!(buffer.move_cursor_right(1, false), 1);
        assert_eq!(buffer.cursor(), Position::new(4, 0));
        buffer.assert_invariants();
    }

    #[test]
    fn test_cursor_traverses_line_breaks() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("ab\ncd");

        buffer.set_cursor(Position::new(0, 1));
        assert_eq!(buffer.move_cursor_left(1, false), 0);
        assert_eq!(buffer.move_cursor_left(1, true), 1);
        assert_eq!(buffer.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_insert_then_erase_left_is_identity() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("base ");
        let snapshot = buffer.all_text();
        let cursor = buffer.cursor();

        let inserted = "日本 text";
        buffer.add_text(inserted);
        let cells = whisker_text::cells(inserted).count();
        let erased = buffer.erase_chars_before_cursor(cells, false);

        assert_eq!(erased, inserted);
        assert_eq!(buffer.all_text(), snapshot);
        assert_eq!(buffer.cursor(), cursor);
        buffer.assert_invariants();
    }

    #[test]
    fn test_erase_between_multi_line() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("one\ntwo\nthree");

        let erased = buffer.erase_between(Position::new(1, 0), Position::new(2, 2));
        assert_eq!(erased, "ne\ntwo\nth");
        assert_eq!(buffer.lines(), &["oree"]);
        // Cursor was at the end (past the range) and follows the text.
        assert_eq!(buffer.cursor(), Position::new(4, 0));
        buffer.assert_invariants();
    }

    #[test]
    fn test_erase_between_moves_inner_cursor_to_start() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("abcdef");
        buffer.set_cursor(Position::new(4, 0));

        buffer.erase_between(Position::new(1, 0), Position::new(5, 0));
        assert_eq!(buffer.all_text(), "af");
        assert_eq!(buffer.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_word_motion() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("alpha beta-gamma");

        buffer.move_to_start_of_word(1, is_word_char);
        assert_eq!(buffer.cursor(), Position::new(11, 0));

        buffer.move_to_start_of_word(1, is_word_char);
        assert_eq!(buffer.cursor(), Position::new(6, 0));

        buffer.move_to_start_of_word(1, is_space_word_char);
        assert_eq!(buffer.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_erase_to_end_of_line_joins_lines() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("one\ntwo");
        buffer.set_cursor(Position::new(3, 0));

        assert_eq!(buffer.erase_to_end_of_line(), "\n");
        assert_eq!(buffer.lines(), &["onetwo"]);
    }

    #[test]
    fn test_erase_words() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("alpha beta");

        assert_eq!(buffer.erase_previous_word(is_word_char), "beta");
        assert_eq!(buffer.all_text(), "alpha ");

        buffer.move_to_start();
        assert_eq!(buffer.erase_next_word(is_word_char), "alpha");
        assert_eq!(buffer.all_text(), " ");
    }

    #[test]
    fn test_text_around_cursor() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("one\ntwo");
        buffer.set_cursor(Position::new(1, 1));

        assert_eq!(buffer.text_before_cursor(), "one\nt");
        assert_eq!(buffer.text_after_cursor(), "wo");
    }

    #[test]
    fn test_set_cursor_clamps_to_boundaries() {
        let mut buffer = InputBuffer::new();
        buffer.add_text("a日b");

        buffer.set_cursor(Position::new(2, 0));
        assert_eq!(buffer.cursor(), Position::new(1, 0));

        buffer.set_cursor(Position::new(99, 9));
        assert_eq!(buffer.cursor(), Position::new(5, 0));
    }
}
