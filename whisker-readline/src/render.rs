//! The redraw engine: maps the buffer onto screen lines for the current
//! terminal width and produces a deterministic sequence of writes.

use std::io::Write;

use crate::{
    buffer::{InputBuffer, Position},
    error, term,
};

/// A prompt with its precomputed visible length.
#[derive(Clone, Debug, Default)]
pub struct Prompt {
    /// The prompt text, possibly containing escape sequences.
    pub text: String,
    /// Display columns the prompt occupies.
    pub visible_len: usize,
}

impl Prompt {
    /// Constructs a prompt, measuring its visible length.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let visible_len = whisker_text::visible_width(&text);
        Self { text, visible_len }
    }
}

/// One visual row: a slice of a buffer line plus the columns its prompt
/// occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScreenLine {
    /// Index of the buffer line this row renders.
    pub buffer_y: usize,
    /// Start byte of the rendered slice within the buffer line.
    pub start: usize,
    /// End byte of the rendered slice.
    pub end: usize,
    /// Columns taken by the prompt on this row (0 on wrap rows).
    pub prompt_width: usize,
    /// Whether this is the first row of its buffer line (and therefore
    /// renders the prompt).
    pub first_in_line: bool,
}

/// The screen-line decomposition of a buffer at some width, with the
/// cursor's screen coordinates.
#[derive(Clone, Debug)]
pub struct Layout {
    /// The rows, top to bottom.
    pub rows: Vec<ScreenLine>,
    /// Row index of the cursor.
    pub cursor_row: usize,
    /// Column of the cursor within its row.
    pub cursor_col: usize,
}

/// Computes the screen-line layout: each buffer line renders its prompt
/// (primary on line 0, continuation after) followed by the text, wrapped
/// to `width - prompt_len` columns on its first row and `width` on wrap
/// rows. A cursor that would land at column `width` moves to the next
/// row, producing a trailing empty row at the end of the buffer.
pub fn layout(
    buffer: &InputBuffer,
    primary: &Prompt,
    continuation: &Prompt,
    width: usize,
) -> Layout {
    let width = width.max(2);
    let cursor = buffer.cursor();
    let mut rows = Vec::new();
    let mut cursor_row = 0;
    let mut cursor_col = 0;

    for (y, line) in buffer.lines().iter().enumerate() {
        let prompt_width = if y == 0 {
            primary.visible_len
        } else {
            continuation.visible_len
        };

        let mut budget = width.saturating_sub(prompt_width).max(1);
        let mut row_prompt = prompt_width;
        let mut first = true;
        let mut start = 0;
        let mut used = 0;

        for cell in whisker_text::cells(line) {
            if used + cell.width > budget {
                rows.push(ScreenLine {
                    buffer_y: y,
                    start,
                    end: cell.offset,
                    prompt_width: row_prompt,
                    first_in_line: first,
                });
                start = cell.offset;
                used = 0;
                budget = width;
                row_prompt = 0;
                first = false;
            }
            if cursor.y == y && cursor.x == cell.offset {
                cursor_row = rows.len();
                cursor_col = row_prompt + used;
            }
            used += cell.width;
        }

        if cursor.y == y && cursor.x >= line.len() {
            if used >= budget {
                // The cursor would land at column `width`; hold it on
                // the next (possibly empty) row instead.
                rows.push(ScreenLine {
                    buffer_y: y,
                    start,
                    end: line.len(),
                    prompt_width: row_prompt,
                    first_in_line: first,
                });
                start = line.len();
                used = 0;
                row_prompt = 0;
                first = false;
            }
            cursor_row = rows.len();
            cursor_col = row_prompt + used;
        }

        rows.push(ScreenLine {
            buffer_y: y,
            start,
            end: line.len(),
            prompt_width: row_prompt,
            first_in_line: first,
        });
    }

    Layout {
        rows,
        cursor_row,
        cursor_col,
    }
}

/// Maps a screen row and visual column back to a buffer position; the
/// column is truncated to the row's text length.
pub fn position_for_row_col(
    buffer: &InputBuffer,
    layout: &Layout,
    row: usize,
    col: usize,
) -> Position {
    let row = row.min(layout.rows.len().saturating_sub(1));
    let screen = &layout.rows[row];
    let line = &buffer.lines()[screen.buffer_y];

    let target = col.saturating_sub(screen.prompt_width);
    let mut used = 0;
    let mut x = screen.start;
    for cell in whisker_text::cells_from(line, screen.start) {
        if cell.offset >= screen.end || used + cell.width > target {
            break;
        }
        used += cell.width;
        x = cell.offset + cell.len;
    }
    Position::new(x, screen.buffer_y)
}

/// A syntax highlighter: receives the full text and cursor position,
/// returns the text with embedded SGR sequences.
pub type Highlighter = dyn Fn(&str, usize, usize) -> String;

/// Redraws the buffer: moves the cursor up by `prev_cursor_row` rows to
/// the top of the previous rendering, clears to the end of the screen,
/// writes every screen line, and leaves the terminal cursor on the
/// buffer cursor. The whole update is bracketed as an atomic update.
/// Returns the cursor's new screen row.
pub fn redraw(
    out: &mut impl Write,
    buffer: &InputBuffer,
    primary: &Prompt,
    continuation: &Prompt,
    width: usize,
    prev_cursor_row: usize,
    highlighter: Option<&Highlighter>,
) -> Result<usize, error::Error> {
    let width = width.max(2);
    let layout = layout(buffer, primary, continuation, width);

    write!(out, "{}", term::ATOMIC_UPDATE_START)?;
    if prev_cursor_row > 0 {
        write!(out, "\x1b[{prev_cursor_row}A")?;
    }
    write!(out, "\r{}", term::CLEAR_TO_END_OF_SCREEN)?;

    let highlighted: Option<Vec<String>> = highlighter.map(|highlight| {
        let cursor = buffer.cursor();
        highlight(&buffer.all_text(), cursor.x, cursor.y)
            .split('\n')
            .map(str::to_owned)
            .collect()
    });

    // Per-line wrapped segments; for highlighted text the wrap is
    // recomputed with escape-aware widths and lines up with the layout.
    let mut segments_by_line: Vec<Vec<String>> = Vec::with_capacity(buffer.lines().len());
    for (y, line) in buffer.lines().iter().enumerate() {
        let row_count = layout.rows.iter().filter(|r| r.buffer_y == y).count();
        let prompt_width = if y == 0 {
            primary.visible_len
        } else {
            continuation.visible_len
        };
        let rendered = highlighted
            .as_ref()
            .and_then(|lines| lines.get(y).cloned())
            .unwrap_or_else(|| line.clone());
        segments_by_line.push(wrap_segments(
            &rendered,
            width.saturating_sub(prompt_width).max(1),
            width,
            row_count,
        ));
    }

    let mut row_within_line = 0;
    let mut prev_y = usize::MAX;
    for (i, row) in layout.rows.iter().enumerate() {
        if i > 0 {
            write!(out, "\r\n")?;
        }
        if row.buffer_y != prev_y {
            prev_y = row.buffer_y;
            row_within_line = 0;
        }
        if row.first_in_line {
            let prompt = if row.buffer_y == 0 { primary } else { continuation };
            write!(out, "{}", prompt.text)?;
        }
        if let Some(segment) = segments_by_line
            .get(row.buffer_y)
            .and_then(|segments| segments.get(row_within_line))
        {
            write!(out, "{segment}")?;
        }
        row_within_line += 1;
    }

    // Park the terminal cursor on the buffer cursor.
    let last_row = layout.rows.len().saturating_sub(1);
    let rows_up = last_row.saturating_sub(layout.cursor_row);
    if rows_up > 0 {
        write!(out, "\x1b[{rows_up}A")?;
    }
    write!(out, "\r")?;
    if layout.cursor_col > 0 {
        write!(out, "\x1b[{}C", layout.cursor_col)?;
    }

    write!(out, "{}", term::ATOMIC_UPDATE_END)?;
    out.flush()?;

    Ok(layout.cursor_row)
}

/// Splits a rendered line into exactly `count` screen segments, wrapping
/// at `first_budget` columns for the first segment and `width` after.
/// Escape sequences are carried along at zero width.
fn wrap_segments(line: &str, first_budget: usize, width: usize, count: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    let mut budget = first_budget.max(1);

    let mut i = 0;
    while i < line.len() {
        let esc_len = whisker_text::escape_sequence_len(&line[i..]);
        if esc_len > 0 {
            current.push_str(&line[i..i + esc_len]);
            i += esc_len;
            continue;
        }

        let Some(cell) = whisker_text::cells_from(line, i).next() else {
            break;
        };
        if used + cell.width > budget {
            segments.push(std::mem::take(&mut current));
            used = 0;
            budget = width;
        }
        current.push_str(&line[i..i + cell.len]);
        used += cell.width;
        i += cell.len;
    }
    segments.push(current);

    segments.resize_with(count.max(segments.len()), String::new);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prompt(text: &str) -> Prompt {
        Prompt::new(text)
    }

    fn buffer_with(text: &str) -> InputBuffer {
        let mut buffer = InputBuffer::new();
        buffer.add_text(text);
        buffer
    }

    #[test]
    fn test_layout_single_short_line() {
        let buffer = buffer_with("hello");
        let layout = layout(&buffer, &prompt("> "), &prompt(". "), 80);

        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].prompt_width, 2);
        assert_eq!(layout.cursor_row, 0);
        assert_eq!(layout.cursor_col, 7);
    }

    #[test]
    fn test_layout_wraps_at_prompt_adjusted_width() {
        // Width 10, prompt 2: first row holds 8 cells, wrap rows 10.
        let buffer = buffer_with("abcdefghijklmnopqrstu");
        let layout = layout(&buffer, &prompt("> "), &prompt(""), 10);

        assert_eq!(layout.rows.len(), 3);
        assert_eq!(layout.rows[0].end - layout.rows[0].start, 8);
        assert_eq!(layout.rows[1].end - layout.rows[1].start, 10);
        assert_eq!(layout.rows[2].end - layout.rows[2].start, 3);
        assert!(!layout.rows[1].first_in_line);
        assert_eq!(layout.cursor_row, 2);
        assert_eq!(layout.cursor_col, 3);
    }

    #[test]
    fn test_layout_cursor_at_exactly_full_row_moves_down() {
        // 8 cells exactly fill the first row; the cursor at the end
        // needs a trailing empty row.
        let buffer = buffer_with("abcdefgh");
        let layout = layout(&buffer, &prompt("> "), &prompt(""), 10);

        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[1].start, layout.rows[1].end);
        assert_eq!(layout.cursor_row, 1);
        assert_eq!(layout.cursor_col, 0);
    }

    #[test]
    fn test_layout_multi_line_prompts() {
        let mut buffer = buffer_with("one\ntwo");
        buffer.set_cursor(crate::buffer::Position::new(1, 1));
        let layout = layout(&buffer, &prompt("> "), &prompt(". "), 80);

        assert_eq!(layout.rows.len(), 2);
        assert!(layout.rows[0].first_in_line);
        assert!(layout.rows[1].first_in_line);
        assert_eq!(layout.cursor_row, 1);
        assert_eq!(layout.cursor_col, 3);
    }

    #[test]
    fn test_layout_wide_cells_never_split() {
        // Width 5, no prompt: two 2-cell glyphs fit, the third wraps.
        let buffer = buffer_with("日本語");
        let layout = layout(&buffer, &prompt(""), &prompt(""), 5);

        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].end, 6);
        assert_eq!(layout.rows[1].start, 6);
    }

    #[test]
    fn test_position_for_row_col_round_trip() {
        let buffer = buffer_with("abcdefghijklmnopqrstu");
        let layout = layout(&buffer, &prompt("> "), &prompt(""), 10);

        // Column 4 of row 1 is byte 8 + 4 = 12.
        let position = position_for_row_col(&buffer, &layout, 1, 4);
        assert_eq!(position, crate::buffer::Position::new(12, 0));

        // Columns past the row's text clamp to its end.
        let position = position_for_row_col(&buffer, &layout, 2, 9);
        assert_eq!(position, crate::buffer::Position::new(21, 0));
    }

    #[test]
    fn test_redraw_emits_atomic_update_and_prompt() -> anyhow::Result<()> {
        let buffer = buffer_with("hi");
        let mut out = Vec::new();
        let row = redraw(&mut out, &buffer, &prompt("> "), &prompt(". "), 80, 0, None)?;

        let written = String::from_utf8(out)?;
        assert!(written.starts_with(term::ATOMIC_UPDATE_START));
        assert!(written.ends_with(term::ATOMIC_UPDATE_END));
        assert!(written.contains("> hi"));
        assert!(written.contains(term::CLEAR_TO_END_OF_SCREEN));
        assert_eq!(row, 0);
        Ok(())
    }

    #[test]
    fn test_redraw_moves_up_over_previous_render() -> anyhow::Result<()> {
        let buffer = buffer_with("hi");
        let mut out = Vec::new();
        redraw(&mut out, &buffer, &prompt("> "), &prompt(". "), 80, 3, None)?;

        let written = String::from_utf8(out)?;
        assert!(written.contains("\x1b[3A"));
        Ok(())
    }

    #[test]
    fn test_redraw_highlighter_does_not_shift_cursor() -> anyhow::Result<()> {
        let buffer = buffer_with("hello");
        let plain_layout = layout(&buffer, &prompt("> "), &prompt(""), 80);

        let highlight: Box<Highlighter> =
            Box::new(|text, _x, _y| std::format!("\x1b[32m{text}\x1b[39m"));
        let mut out = Vec::new();
        let row = redraw(
            &mut out,
            &buffer,
            &prompt("> "),
            &prompt(""),
            80,
            0,
            Some(highlight.as_ref()),
        )?;

        assert_eq!(row, plain_layout.cursor_row);
        let written = String::from_utf8(out)?;
        assert!(written.contains("\x1b[32mhello\x1b[39m"));
        Ok(())
    }

    #[test]
    fn test_wrap_segments_escape_aware() {
        let segments = wrap_segments("\x1b[1mabcd\x1b[0mef", 4, 4, 0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], "\x1b[1mabcd");
        assert_eq!(segments[1], "\x1b[0mef");
    }
}
