//! Display-width aware string fitting for fixed terminal columns.
//!
//! Widths are measured in terminal cells, not bytes or chars: CJK glyphs and
//! most emoji take two cells, combining marks take none.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '…';

/// Number of terminal cells `s` occupies.
///
/// # Examples
///
/// ```
/// use phototerm_utils_string::display_width;
///
/// assert_eq!(display_width("photo.jpg"), 9);
/// assert_eq!(display_width("写真.jpg"), 8);
/// ```
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `max_width` cells, never splitting a
/// wide glyph.
///
/// # Examples
///
/// ```
/// use phototerm_utils_string::take_width;
///
/// assert_eq!(take_width("hello world", 5), "hello");
/// // 写 is two cells wide and does not fit in the third cell
/// assert_eq!(take_width("a写b", 2), "a");
/// assert_eq!(take_width("a写b", 3), "a写");
/// ```
pub fn take_width(s: &str, max_width: usize) -> &str {
    let mut used = 0usize;
    for (i, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            return &s[..i];
        }
        used += w;
    }
    s
}

/// Fit `s` into `max_width` cells, replacing the tail with `…` when it does
/// not fit.
///
/// # Examples
///
/// ```
/// use phototerm_utils_string::truncate_to_width;
///
/// assert_eq!(truncate_to_width("IMG_0001.jpg", 20), "IMG_0001.jpg");
/// assert_eq!(truncate_to_width("IMG_0001.jpg", 8), "IMG_000…");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    let mut out = take_width(s, max_width - 1).to_string();
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Truncate (with `…`) or right-pad with spaces so the result is exactly
/// `width` cells wide. A wide glyph that would straddle the edge is dropped
/// and the gap filled with a space.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let fitted = truncate_to_width(s, width);
    let pad = width.saturating_sub(display_width(&fitted));
    let mut out = String::with_capacity(fitted.len() + pad);
    out.push_str(&fitted);
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

/// Collapse runs of whitespace, including newlines, into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
