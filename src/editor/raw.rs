// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cursor-addressable text buffers for the edit forms.
//!
//! Cursors count characters, not bytes; conversion happens at the edit site
//! so multi-byte input stays on char boundaries.

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Single-line input with a movable cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = char_len(&text);
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = char_len(&self.text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        let at = byte_index(&self.text, self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = byte_index(&self.text, self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= char_len(&self.text) {
            return;
        }
        let at = byte_index(&self.text, self.cursor);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(char_len(&self.text));
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = char_len(&self.text);
    }
}

/// Multi-line buffer backing the raw document editor.
///
/// The column is clamped to the current line on use, so vertical movement
/// across lines of different length never lands past an end of line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl RawBuffer {
    pub fn from_text(text: &str) -> Self {
        let lines = text.split('\n').map(str::to_owned).collect::<Vec<_>>();
        Self {
            lines,
            row: 0,
            col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Cursor as `(row, col)` with the column clamped to the current line.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.clamped_col())
    }

    fn clamped_col(&self) -> usize {
        self.col.min(char_len(&self.lines[self.row]))
    }

    pub fn insert_char(&mut self, ch: char) {
        let col = self.clamped_col();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, col);
        line.insert(at, ch);
        self.col = col + 1;
    }

    pub fn insert_newline(&mut self) {
        let col = self.clamped_col();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        let col = self.clamped_col();
        if col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, col - 1);
            line.remove(at);
            self.col = col - 1;
        } else if self.row > 0 {
            let tail = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
            self.lines[self.row].push_str(&tail);
        }
    }

    pub fn delete(&mut self) {
        let col = self.clamped_col();
        if col < char_len(&self.lines[self.row]) {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, col);
            line.remove(at);
            self.col = col;
        } else if self.row + 1 < self.lines.len() {
            let tail = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&tail);
            self.col = col;
        }
    }

    pub fn move_left(&mut self) {
        let col = self.clamped_col();
        if col > 0 {
            self.col = col - 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        let col = self.clamped_col();
        if col < char_len(&self.lines[self.row]) {
            self.col = col + 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.clamped_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.clamped_col();
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = char_len(&self.lines[self.row]);
    }
}

#[cfg(test)]
mod tests {
    use super::{LineInput, RawBuffer};

    #[test]
    fn line_input_edits_at_cursor() {
        let mut input = LineInput::from_text("Fjord Wek");
        input.move_left();
        input.insert('e');
        assert_eq!(input.text(), "Fjord Week");
        assert_eq!(input.cursor(), 9);
    }

    #[test]
    fn line_input_handles_multibyte_text() {
        let mut input = LineInput::from_text("Flåm");
        input.backspace();
        assert_eq!(input.text(), "Flå");
        input.insert('m');
        input.insert('!');
        assert_eq!(input.text(), "Flåm!");
    }

    #[test]
    fn line_input_delete_removes_under_cursor() {
        let mut input = LineInput::from_text("slug");
        input.move_home();
        input.delete();
        assert_eq!(input.text(), "lug");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn buffer_round_trips_text() {
        let text = "{\n  \"a\": 1\n}";
        let buffer = RawBuffer::from_text(text);
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), text);
    }

    #[test]
    fn buffer_newline_splits_line_at_cursor() {
        let mut buffer = RawBuffer::from_text("abcd");
        buffer.move_right();
        buffer.move_right();
        buffer.insert_newline();
        assert_eq!(buffer.text(), "ab\ncd");
        assert_eq!(buffer.cursor(), (1, 0));
    }

    #[test]
    fn buffer_backspace_at_line_start_joins_lines() {
        let mut buffer = RawBuffer::from_text("ab\ncd");
        buffer.move_down();
        buffer.move_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn buffer_delete_at_line_end_joins_next_line() {
        let mut buffer = RawBuffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn buffer_vertical_moves_clamp_column() {
        let mut buffer = RawBuffer::from_text("longer line\nab");
        buffer.move_end();
        buffer.move_down();
        assert_eq!(buffer.cursor(), (1, 2));
    }

    #[test]
    fn buffer_left_right_cross_line_boundaries() {
        let mut buffer = RawBuffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.move_right();
        assert_eq!(buffer.cursor(), (1, 0));
        buffer.move_left();
        assert_eq!(buffer.cursor(), (0, 2));
    }
}
