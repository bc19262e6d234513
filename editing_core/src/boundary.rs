//! Word and line boundary search over scalar offsets.
//!
//! A word is a run of alphanumeric characters or `_`. Whitespace and
//! punctuation separate words. All searches clamp at the text edges.

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Start of the word at or before `from`.
///
/// Skips separators to the left, then the word itself.
pub fn previous_word_boundary(text: &[char], from: usize) -> usize {
    let mut offset = from.min(text.len());
    while offset > 0 && !is_word_char(text[offset - 1]) {
        offset -= 1;
    }
    while offset > 0 && is_word_char(text[offset - 1]) {
        offset -= 1;
    }
    offset
}

/// End of the word at or after `from`.
///
/// Skips separators to the right, then the word itself.
pub fn next_word_boundary(text: &[char], from: usize) -> usize {
    let mut offset = from.min(text.len());
    while offset < text.len() && !is_word_char(text[offset]) {
        offset += 1;
    }
    while offset < text.len() && is_word_char(text[offset]) {
        offset += 1;
    }
    offset
}

/// Start of the line containing `from`.
pub fn line_start(text: &[char], from: usize) -> usize {
    let from = from.min(text.len());
    text[..from]
        .iter()
        .rposition(|&ch| ch == '\n')
        .map_or(0, |newline| newline + 1)
}

/// End of the line containing `from` (the offset of its `'\n'`, or the text end).
pub fn line_end(text: &[char], from: usize) -> usize {
    let from = from.min(text.len());
    text[from..]
        .iter()
        .position(|&ch| ch == '\n')
        .map_or(text.len(), |newline| from + newline)
}
