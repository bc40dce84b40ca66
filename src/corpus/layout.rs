//! Arranging tokens into display lines.

use std::ops::Range;

/// Words per display line in the default word-list layout.
pub const DEFAULT_WORDS_PER_LINE: usize = 20;

/// Split `items` into display lines of at most `words_per_line` entries.
pub fn lines<T>(items: &[T], words_per_line: usize) -> Vec<&[T]> {
    items.chunks(words_per_line.max(1)).collect()
}

/// Index of the line holding the word at `word_index`.
pub fn line_of(word_index: usize, words_per_line: usize) -> usize {
    word_index / words_per_line.max(1)
}

/// Lines to show when `rows` fit on screen, keeping one line of already typed
/// context above the cursor line once the cursor has moved past the first line.
pub fn visible_lines(total_lines: usize, cursor_line: usize, rows: usize) -> Range<usize> {
    let start = cursor_line.saturating_sub(1);
    let end = (start + rows).min(total_lines);
    start.min(end)..end
}
