//! Soft wrapping of long lines into screen rows.
//!
//! Rendering and scrolling both measure lines through here, so the row a
//! cursor is drawn on is the row the viewport keeps on screen.

use unicode_width::UnicodeWidthChar;

use super::{TAB_WIDTH, line_number_width};

/// One screen row of a wrapped line, as a byte range of that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedRow {
    pub start: usize,
    pub end: usize,
}

/// Columns left for text once the line-number gutter and its space are taken.
pub fn text_width(terminal_width: u16, total_lines: usize) -> usize {
    let gutter = usize::from(line_number_width(total_lines)) + 1;
    usize::from(terminal_width).saturating_sub(gutter).max(1)
}

/// Split `line` into rows at most `width` columns wide.
///
/// Always yields at least one row. A line that exactly fills its last row
/// gets an empty row after it, where the cursor sits at the line's end.
pub fn wrap_line(line: &str, width: usize) -> Vec<WrappedRow> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (idx, ch) in line.char_indices() {
        let w = char_width(ch);
        if used + w > width && idx > start {
            rows.push(WrappedRow { start, end: idx });
            start = idx;
            used = 0;
        }
        used += w;
    }
    if used >= width {
        rows.push(WrappedRow {
            start,
            end: line.len(),
        });
        start = line.len();
    }
    rows.push(WrappedRow {
        start,
        end: line.len(),
    });
    rows
}

/// Row index within `rows` and screen column of the byte offset `col`.
pub fn cursor_in_rows(line: &str, rows: &[WrappedRow], col: usize) -> (usize, usize) {
    let last = rows.len().saturating_sub(1);
    let row_idx = rows.iter().position(|row| col < row.end).unwrap_or(last);
    let x = rows
        .get(row_idx)
        .and_then(|row| line.get(row.start..col.max(row.start)))
        .map_or(0, display_width);
    (row_idx, x)
}

/// Screen columns taken by `text`, with tabs expanded.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_is_one_row() {
        assert_eq!(wrap_line("hello", 10), vec![WrappedRow { start: 0, end: 5 }]);
        assert_eq!(wrap_line("", 10), vec![WrappedRow { start: 0, end: 0 }]);
    }

    #[test]
    fn test_long_line_splits_at_width() {
        let rows = wrap_line("abcdefghij", 4);
        assert_eq!(
            rows,
            vec![
                WrappedRow { start: 0, end: 4 },
                WrappedRow { start: 4, end: 8 },
                WrappedRow { start: 8, end: 10 },
            ]
        );
    }

    #[test]
    fn test_exactly_full_line_gets_cursor_row() {
        let rows = wrap_line("abcd", 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(cursor_in_rows("abcd", &rows, 4), (1, 0));
        assert_eq!(cursor_in_rows("abcd", &rows, 3), (0, 3));
    }

    #[test]
    fn test_wide_chars_do_not_straddle_rows() {
        let rows = wrap_line("a日本", 4);
        assert_eq!(rows[0], WrappedRow { start: 0, end: 4 });
        assert_eq!(rows[1].start, 4);
    }

    #[test]
    fn test_cursor_on_continuation_row() {
        let line = "abcdefghij";
        let rows = wrap_line(line, 4);
        assert_eq!(cursor_in_rows(line, &rows, 0), (0, 0));
        assert_eq!(cursor_in_rows(line, &rows, 4), (1, 0));
        assert_eq!(cursor_in_rows(line, &rows, 6), (1, 2));
        assert_eq!(cursor_in_rows(line, &rows, 10), (2, 2));
    }

    #[test]
    fn test_text_width_leaves_room_for_gutter() {
        assert_eq!(text_width(40, 5), 38);
        assert_eq!(text_width(40, 150), 36);
        assert_eq!(text_width(2, 5), 1);
    }

    #[test]
    fn test_display_width_expands_tabs_and_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("\tx"), TAB_WIDTH + 1);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }
}
