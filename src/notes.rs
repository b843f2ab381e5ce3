use std::time::Instant;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Editable plain-text buffer with a single cursor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
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

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
    }

    /// Move to the previous line, keeping the display column where it fits
    pub fn move_up(&mut self) {
        let start = self.line_start();
        if start == 0 {
            return;
        }
        let (_, col) = self.cursor_line_col();
        let prev_start = self.text[..start - 1].rfind('\n').map_or(0, |i| i + 1);
        self.cursor = prev_start + byte_at_column(&self.text[prev_start..start - 1], col);
    }

    /// Move to the next line, keeping the display column where it fits
    pub fn move_down(&mut self) {
        let Some(nl) = self.text[self.cursor..].find('\n') else {
            return;
        };
        let (_, col) = self.cursor_line_col();
        let next_start = self.cursor + nl + 1;
        let next_end = self.text[next_start..]
            .find('\n')
            .map_or(self.text.len(), |i| next_start + i);
        self.cursor = next_start + byte_at_column(&self.text[next_start..next_end], col);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Line index and display column of the cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.line_start()..].width();
        (line, col)
    }

    /// Break the text into rows at most `width` columns wide.
    ///
    /// Lines are broken at the character that would overflow, not at word
    /// boundaries, so the reported cursor always matches what is drawn.
    pub fn wrap(&self, width: usize) -> WrappedText {
        let width = width.max(1);
        let mut rows = Vec::new();
        let mut cursor = (0, 0);
        let mut offset = 0;

        for line in self.text.split('\n') {
            let mut row = String::new();
            let mut row_width = 0;
            for (i, c) in line.char_indices() {
                let w = c.width().unwrap_or(0);
                if row_width + w > width && !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                if offset + i == self.cursor {
                    cursor = (rows.len(), row_width);
                }
                row.push(c);
                row_width += w;
            }
            if offset + line.len() == self.cursor {
                // A full row pushes the cursor onto the next one
                cursor = if row_width >= width {
                    (rows.len() + 1, 0)
                } else {
                    (rows.len(), row_width)
                };
            }
            rows.push(row);
            offset += line.len() + 1;
        }

        WrappedText { rows, cursor }
    }

    fn line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

/// Byte offset of the last char boundary at or before display column `col`
fn byte_at_column(line: &str, col: usize) -> usize {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > col {
            return i;
        }
        width += w;
    }
    line.len()
}

/// Text laid out for a fixed-width pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedText {
    pub rows: Vec<String>,
    /// Row and column of the cursor, possibly one row past the last
    pub cursor: (usize, usize),
}

type ReleaseHook = Box<dyn FnOnce(&TextBuffer) + Send>;

/// Session-scoped notes area.
///
/// Acquired when a session starts and released when it is dropped, so the
/// buffer never outlives the session regardless of how it ends.
pub struct NotesSurface {
    buffer: TextBuffer,
    acquired_at: Instant,
    on_release: Option<ReleaseHook>,
}

impl std::fmt::Debug for NotesSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesSurface")
            .field("buffer", &self.buffer)
            .field("acquired_at", &self.acquired_at)
            .finish_non_exhaustive()
    }
}

impl NotesSurface {
    pub fn acquire() -> Self {
        tracing::debug!("notes surface acquired");
        Self {
            buffer: TextBuffer::new(),
            acquired_at: Instant::now(),
            on_release: None,
        }
    }

    /// Run `hook` with the final contents when the surface is released
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&TextBuffer) + Send + 'static,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }
}

impl Drop for NotesSurface {
    fn drop(&mut self) {
        tracing::debug!(
            chars = self.buffer.char_count(),
            held_secs = self.acquired_at.elapsed().as_secs(),
            "notes surface released"
        );
        if let Some(hook) = self.on_release.take() {
            hook(&self.buffer);
        }
        self.buffer.clear();
    }
}
