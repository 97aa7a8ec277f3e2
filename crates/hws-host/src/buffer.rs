// SPDX-License-Identifier: MIT
//
// Text buffer — a rope with the handful of operations a view needs.
//
// Columns and offsets are char offsets, never bytes. Byte counts only leak
// out through `len_bytes`, which is what the scan size limit is measured in.

use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;

// ─── Position ────────────────────────────────────────────────────────────────

/// A 0-indexed (line, col) position. `col` counts chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// ─── Buffer ──────────────────────────────────────────────────────────────────

/// A text buffer backed by a rope, optionally tied to a file.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
}

impl Buffer {
    /// Create an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            modified: false,
        }
    }

    /// Create a scratch buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            modified: false,
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            modified: false,
        })
    }

    // -- Text access --------------------------------------------------------

    /// Collect the whole buffer into a `String`.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    #[inline]
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines. An empty buffer has one (empty) line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Convert a char offset to a (line, col) position.
    ///
    /// Returns `None` if `char_idx > len_chars()`. An offset equal to
    /// `len_chars()` is the position just past the last char.
    #[must_use]
    pub fn char_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        Some(Position::new(line, char_idx - self.rope.line_to_char(line)))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert text at a char offset.
    ///
    /// # Panics
    ///
    /// Panics if `char_idx > len_chars()`.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        assert!(
            char_idx <= self.rope.len_chars(),
            "insert offset out of bounds"
        );
        self.rope.insert(char_idx, text);
        self.modified = true;
    }

    /// Remove a char range. An empty range is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the range ends past `len_chars()`.
    pub fn remove(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        assert!(
            range.end <= self.rope.len_chars(),
            "remove range out of bounds"
        );
        self.rope.remove(range);
        self.modified = true;
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the buffer has been edited since it was created or loaded.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("chars", &self.rope.len_chars())
            .field("lines", &self.rope.len_lines())
            .field("path", &self.path)
            .field("modified", &self.modified)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
