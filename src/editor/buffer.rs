use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Column to aim for when moving vertically through shorter lines.
    goal_col: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self::at(0, 0)
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            goal_col: col,
        }
    }

    /// Move to a position and aim vertical moves at its column.
    const fn place(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.goal_col = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed text with a single cursor.
///
/// Editing operations return `true` when the text changed so the caller can
/// report the edit to the sync session; cursor movement never does.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl EditorBuffer {
    /// Create a new buffer from a string, cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of lines; a trailing newline starts one more, empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its terminator.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        (line_idx < self.rope.len_lines()).then(|| {
            let mut line = self.rope.line(line_idx).to_string();
            while line.ends_with(is_line_break) {
                line.pop();
            }
            line
        })
    }

    /// Byte length of a line, excluding its terminator.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The whole buffer as a string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Swap in new content wholesale, keeping the cursor as close to where it
    /// was as the new text allows.
    pub fn replace_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.move_to(self.cursor.line, self.cursor.col);
    }

    /// Insert a character at the cursor. A newline splits the line.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return self.split_line();
        }
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.place_at_char(idx + 1);
        true
    }

    /// Insert text at the cursor and leave the cursor after it.
    ///
    /// `\r\n` and lone `\r` are stored as `\n`, as pasted text often
    /// carries them.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }
        let text = s.replace("\r\n", "\n").replace('\r', "\n");
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, &text);
        self.place_at_char(idx + text.chars().count());
        true
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.place(self.cursor.line + 1, 0);
        true
    }

    /// Backspace. Joins with the previous line at column 0.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            // Remove the whole terminator, which may be "\r\n".
            let line_end = self.rope.line_to_char(self.cursor.line);
            let start = self.rope.line_to_char(prev) + self.line_at(prev).map_or(0, |l| l.chars().count());
            self.rope.remove(start..line_end);
            self.cursor.place(prev, prev_len);
        } else {
            self.rope.remove(idx - 1..idx);
            self.place_at_char(idx - 1);
        }
        true
    }

    /// Delete key. Joins with the next line at end of line.
    pub fn delete_forward(&mut self) -> bool {
        let at_line_end = self.cursor.col >= self.line_len(self.cursor.line);
        if at_line_end && self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let idx = self.cursor_char_idx();
        let end = if at_line_end {
            self.rope.line_to_char(self.cursor.line + 1)
        } else {
            idx + 1
        };
        self.rope.remove(idx..end);
        true
    }

    /// Move the cursor one step, wrapping across line ends.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    /// Move up or down by `lines`, keeping the goal column.
    pub fn move_lines(&mut self, lines: isize) {
        self.move_vertical(lines);
    }

    /// Move to the start of the line.
    pub const fn move_home(&mut self) {
        self.cursor.place(self.cursor.line, 0);
    }

    /// Move to the end of the line.
    pub fn move_end(&mut self) {
        self.cursor.place(self.cursor.line, self.line_len(self.cursor.line));
    }

    /// Move to the start of the previous word, or the end of the previous line.
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                let prev = self.cursor.line - 1;
                self.cursor.place(prev, self.line_len(prev));
            }
            return;
        }
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = line[..floor_char_boundary(&line, self.cursor.col)].trim_end();
        let col = before.rfind(|c: char| !is_word_char(c)).map_or(0, |i| {
            i + before[i..].chars().next().map_or(1, char::len_utf8)
        });
        self.cursor.place(self.cursor.line, col);
    }

    /// Move past the current word and the gap after it, or to the next line.
    pub fn move_word_right(&mut self) {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        if self.cursor.col >= line.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.place(self.cursor.line + 1, 0);
            }
            return;
        }
        let col = floor_char_boundary(&line, self.cursor.col);
        let rest = &line[col..];
        let word_end = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        let gap = rest[word_end..].find(is_word_char).unwrap_or(rest.len() - word_end);
        self.cursor.place(self.cursor.line, col + word_end + gap);
    }

    /// Place the cursor, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(line).unwrap_or_default();
        self.cursor.place(line, floor_char_boundary(&text, col));
    }

    /// Move to the start of the buffer.
    pub const fn move_to_start(&mut self) {
        self.cursor.place(0, 0);
    }

    /// Move to the end of the last line.
    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor.place(last, self.line_len(last));
    }

    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let col = floor_char_boundary(&line, self.cursor.col);
        line_start + line[..col].chars().count()
    }

    /// Put the cursor at a char index, deriving line and byte column from
    /// the rope so they agree with how it splits lines.
    fn place_at_char(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = self.rope.slice(self.rope.line_to_char(line)..idx).len_bytes();
        self.cursor.place(line, col);
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let idx = self.cursor_char_idx();
            self.place_at_char(idx.saturating_sub(1));
        } else if self.cursor.line > 0 {
            let prev = self.cursor.line - 1;
            self.cursor.place(prev, self.line_len(prev));
        }
    }

    fn move_right(&mut self) {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let col = floor_char_boundary(&line, self.cursor.col);
        if let Some(ch) = line[col..].chars().next() {
            self.cursor.place(self.cursor.line, col + ch.len_utf8());
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.place(self.cursor.line + 1, 0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.line_count().saturating_sub(1);
        let target = self.cursor.line.saturating_add_signed(delta).min(last);
        if target == self.cursor.line {
            return;
        }
        let text = self.line_at(target).unwrap_or_default();
        self.cursor.line = target;
        self.cursor.col = floor_char_boundary(&text, self.cursor.goal_col);
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Characters the rope treats as ending a line.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Largest char boundary in `text` that is `<= col`.
fn floor_char_boundary(text: &str, col: usize) -> usize {
    let mut col = col.min(text.len());
    while !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_edits_report_change() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(buf.insert_char('!'));
        assert!(!buf.insert_str(""));
        assert!(buf.delete_back());
        buf.move_end();
        assert!(!buf.delete_forward());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_insert_newline_char_splits() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_char('\n');
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_insert_multiline_str_moves_cursor() {
        let mut buf = EditorBuffer::from_text("start");
        buf.move_end();
        buf.insert_str(" one\ntwo\nthree");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.cursor(), Cursor::at(2, 5));
    }

    #[test]
    fn test_pasted_carriage_returns_become_newlines() {
        let mut buf = EditorBuffer::empty();
        buf.insert_str("ab\rc");
        assert_eq!(buf.text(), "ab\nc");
        assert_eq!(buf.cursor(), Cursor::at(1, 1));

        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab\n");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_pasted_crlf_is_one_line_break() {
        let mut buf = EditorBuffer::from_text("x");
        buf.move_end();
        buf.insert_str("1\r\n2\r\n");
        assert_eq!(buf.text(), "x1\n2\n");
        assert_eq!(buf.cursor(), Cursor::at(2, 0));
    }

    #[test]
    fn test_unicode_line_separator_keeps_cursor_in_bounds() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_end();
        buf.insert_str("\u{2028}cd");
        let cursor = buf.cursor();
        assert_eq!(cursor.line, 1);
        assert_eq!(buf.line_at(1), Some("cd".to_string()));
        assert_eq!(cursor.col, 2);
        buf.move_cursor(Direction::Left);
        assert!(buf.delete_back());
        assert_eq!(buf.line_at(1), Some("d".to_string()));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("hello\r\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
    }

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_multibyte_navigation_and_delete() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end();
        assert_eq!(buf.cursor().col, 5);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().col, 3);
        buf.move_cursor(Direction::Right);
        buf.delete_back();
        assert_eq!(buf.text(), "caf");
    }

    #[test]
    fn test_vertical_moves_keep_goal_column() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(2, 4));
        buf.move_lines(-10);
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_word_moves() {
        let mut buf = EditorBuffer::from_text("hello big_world\nnext");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 15);
        buf.move_word_right();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_word_left();
        assert_eq!(buf.cursor(), Cursor::at(0, 15));
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(9, 99);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_replace_text_clamps_cursor() {
        let mut buf = EditorBuffer::from_text("one\ntwo\nthree four");
        buf.move_to(2, 8);
        buf.replace_text("short\n");
        assert_eq!(buf.text(), "short\n");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_replace_text_keeps_cursor_when_it_fits() {
        let mut buf = EditorBuffer::from_text("hello\nworld\n");
        buf.move_to(1, 3);
        buf.replace_text("hello\nworld wide\n");
        assert_eq!(buf.cursor(), Cursor::at(1, 3));
    }

    #[test]
    fn test_replace_text_respects_char_boundaries() {
        let mut buf = EditorBuffer::from_text("abcd");
        buf.move_to(0, 2);
        buf.replace_text("éé");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        buf.move_to(0, 3);
        assert_eq!(buf.cursor().col, 2);
    }
}
