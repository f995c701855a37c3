//! Wrapping helpers and layout constants for the question box.

/// Left and right border consumed horizontally, plus one column for the cursor
pub(super) const HORIZONTAL_OVERHEAD: u16 = 3;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 6;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

pub(super) fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Usable text width inside the bordered block (0 if too narrow).
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped lines for `text`, keeping a trailing empty line after a final newline.
pub(super) fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if text.ends_with('\n') && lines.last().is_none_or(|l| !l.is_empty()) {
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub(super) fn line_count(text: &str, width: u16) -> u16 {
    u16::try_from(wrapped_lines(text, width).len()).unwrap_or(u16::MAX)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().last().map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(line_count("", 40), 1);
        assert_eq!(line_count("anything", 0), 1);
    }

    #[test]
    fn long_text_wraps() {
        assert_eq!(line_count("aaaaaaaaaa", 5), 2);
    }

    #[test]
    fn explicit_newlines_count() {
        assert_eq!(line_count("def f():\n    pass", 40), 2);
    }

    #[test]
    fn trailing_newline_opens_a_line() {
        assert_eq!(line_count("import os\n", 40), 2);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        let s = "a🐍b";
        assert_eq!(next_char_boundary(s, 1), 5);
        assert_eq!(prev_char_boundary(s, 5), 1);
        assert_eq!(prev_char_boundary(s, 1), 0);
        assert_eq!(next_char_boundary(s, 5), 6);
    }
}
