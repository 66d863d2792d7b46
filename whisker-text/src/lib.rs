//! Grapheme-cell width primitives used by the whisker terminal tools.
//!
//! All display-width decisions in the workspace flow through this crate:
//! cursor math in the line editor, wrap points in the redraw engine, and
//! column padding in the completion adapters. Width is computed per
//! extended grapheme cluster (EGC), so a flag emoji or a ZWJ sequence
//! counts as one cell unit with its own column width rather than as a
//! sequence of code points.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A single grapheme cell within a string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    /// Byte offset of the cell within the string it was produced from.
    pub offset: usize,
    /// Length of the cell, in bytes.
    pub len: usize,
    /// Display width of the cell, in terminal columns.
    pub width: usize,
}

/// Returns the terminal column width of a single extended grapheme cluster.
///
/// C0/C1 control characters occupy no columns; the caller is expected to
/// have expanded tabs and stripped newlines before measuring.
pub fn grapheme_width(egc: &str) -> usize {
    if egc.chars().next().is_some_and(char::is_control) {
        return 0;
    }
    egc.width()
}

/// Iterates over the grapheme cells of `s`, starting at byte offset `start`.
///
/// `start` must lie on a character boundary.
pub fn cells_from(s: &str, start: usize) -> impl Iterator<Item = Cell> + '_ {
    s[start..]
        .grapheme_indices(true)
        .map(move |(offset, egc)| Cell {
            offset: start + offset,
            len: egc.len(),
            width: grapheme_width(egc),
        })
}

/// Iterates over the grapheme cells of `s`.
pub fn cells(s: &str) -> impl Iterator<Item = Cell> + '_ {
    cells_from(s, 0)
}

/// Returns the total display width of `s` in terminal columns.
///
/// Embedded escape sequences (CSI, OSC, and single-byte ESC dispatches) are
/// measured as zero columns, so text decorated with SGR color codes by a
/// syntax highlighter measures the same as its plain form.
pub fn visible_width(s: &str) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < s.len() {
        if s.as_bytes()[i] == 0x1b {
            i += skip_escape_sequence(&s[i..]);
            continue;
        }
        match next_grapheme(s, i) {
            Some(egc) => {
                total += grapheme_width(egc);
                i += egc.len();
            }
            None => break,
        }
    }
    total
}

/// Returns the longest prefix of `s` whose display width does not exceed
/// `max_width` columns. Escape sequences are retained and count as zero.
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut i = 0;
    while i < s.len() {
        if s.as_bytes()[i] == 0x1b {
            i += skip_escape_sequence(&s[i..]);
            continue;
        }
        let Some(egc) = next_grapheme(s, i) else {
            break;
        };
        let width = grapheme_width(egc);
        if used + width > max_width {
            return &s[..i];
        }
        used += width;
        i += egc.len();
    }
    s
}

fn next_grapheme(s: &str, at: usize) -> Option<&str> {
    s[at..].graphemes(true).next()
}

/// Returns the byte length of the escape sequence at the head of `s`,
/// or 0 when `s` does not begin with ESC.
pub fn escape_sequence_len(s: &str) -> usize {
    if s.as_bytes().first() == Some(&0x1b) {
        skip_escape_sequence(s)
    } else {
        0
    }
}

/// Given a string starting with ESC, returns the byte length of the full
/// escape sequence at its head.
fn skip_escape_sequence(s: &str) -> usize {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&0x1b));

    match bytes.get(1) {
        // CSI: parameters and intermediates, then a final byte in @..=~.
        Some(b'[') => {
            for (i, b) in bytes.iter().enumerate().skip(2) {
                if (0x40..=0x7e).contains(b) {
                    return i + 1;
                }
            }
            bytes.len()
        }
        // OSC: terminated by BEL or ST (ESC \).
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    0x1b if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    _ => i += 1,
                }
            }
            bytes.len()
        }
        // Two-byte dispatch (ESC c, ESC 7, ...).
        Some(_) => 2,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(visible_width(""), 0);
        assert_eq!(visible_width("abc"), 3);
        assert_eq!(grapheme_width("a"), 1);
    }

    #[test]
    fn test_wide_and_combining() {
        // CJK is two columns per cell.
        assert_eq!(visible_width("日本"), 4);
        // A combining accent shares its base's cell.
        assert_eq!(visible_width("e\u{301}"), 1);
        assert_eq!(cells("e\u{301}").count(), 1);
    }

    #[test]
    fn test_control_chars_are_zero_width() {
        assert_eq!(grapheme_width("\x07"), 0);
        assert_eq!(visible_width("a\x07b"), 2);
    }

    #[test]
    fn test_cell_iteration_offsets() {
        let all: Vec<_> = cells("a日b").collect();
        assert_eq!(
            all,
            vec![
                Cell { offset: 0, len: 1, width: 1 },
                Cell { offset: 1, len: 3, width: 2 },
                Cell { offset: 4, len: 1, width: 1 },
            ]
        );
    }

    #[test]
    fn test_cells_from_mid_string() {
        let tail: Vec<_> = cells_from("a日b", 1).collect();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].offset, 1);
        assert_eq!(tail[1].offset, 4);
    }

    #[test]
    fn test_sgr_sequences_are_invisible() {
        assert_eq!(visible_width("\x1b[1mbold\x1b[0m"), 4);
        assert_eq!(visible_width("\x1b[38;5;196mred\x1b[m"), 3);
    }

    #[test]
    fn test_osc_sequences_are_invisible() {
        assert_eq!(visible_width("\x1b]133;A\x1b\\x"), 1);
        assert_eq!(visible_width("\x1b]0;title\x07ok"), 2);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("日本語", 3), "日");
        assert_eq!(truncate_to_width("", 5), "");
    }

    #[test]
    fn test_truncate_keeps_leading_escapes() {
        assert_eq!(truncate_to_width("\x1b[1mab", 1), "\x1b[1ma");
    }
}
