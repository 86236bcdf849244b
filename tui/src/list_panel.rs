//! The file list pane: title, checkbox rows, and a key-hint footer.
//!
//! Every line is padded or truncated to exactly the pane width and the panel
//! always fills the pane height, so painting it over a previous frame leaves
//! nothing stale behind.

use std::ffi::OsStr;

use crossterm::style::Stylize;
use phototerm_utils_string::fit_to_width;

use crate::keymap;
use crate::selection::SelectionState;

const CHECKED: &str = "[✓]";
const UNCHECKED: &str = "[ ]";
const POINTER: &str = "►";

/// Title and separator.
const HEADER_ROWS: usize = 2;
/// Separator and two hint lines.
const FOOTER_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineStyle {
    Title,
    Rule,
    Row,
    Cursor,
    Hint,
    Banner,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListLine {
    /// Exactly the pane width in display columns.
    pub(crate) text: String,
    pub(crate) style: LineStyle,
}

impl ListLine {
    fn new(text: &str, width: usize, style: LineStyle) -> Self {
        Self {
            text: fit_to_width(text, width),
            style,
        }
    }

    /// The line with its ANSI styling applied.
    pub(crate) fn styled(&self) -> String {
        let text = self.text.clone();
        match self.style {
            LineStyle::Title => text.bold().to_string(),
            LineStyle::Rule | LineStyle::Hint => text.dim().to_string(),
            LineStyle::Cursor => text.reverse().to_string(),
            LineStyle::Banner => text.green().bold().to_string(),
            LineStyle::Row | LineStyle::Blank => text,
        }
    }
}

/// Lay out the list pane for `state` in a `width` x `height` cell region.
pub(crate) fn render(state: &SelectionState, width: u16, height: u16) -> Vec<ListLine> {
    let width = usize::from(width);
    let height = usize::from(height);
    let rule = "─".repeat(width);

    let mut lines = Vec::with_capacity(height);
    lines.push(ListLine::new(
        &format!(
            "Images ({}/{} selected)",
            state.marked_count(),
            state.len()
        ),
        width,
        LineStyle::Title,
    ));
    lines.push(ListLine::new(&rule, width, LineStyle::Rule));

    let visible = height.saturating_sub(HEADER_ROWS + FOOTER_ROWS).max(1);
    let (first, last) = scroll_window(state.cursor(), state.len(), visible);
    for index in first..last {
        lines.push(item_line(state, index, width));
    }
    for _ in (last - first)..visible {
        lines.push(ListLine::new("", width, LineStyle::Blank));
    }

    lines.push(ListLine::new(&rule, width, LineStyle::Rule));
    for (text, style) in footer(state) {
        lines.push(ListLine::new(&text, width, style));
    }

    lines.truncate(height);
    lines
}

fn item_line(state: &SelectionState, index: usize, width: usize) -> ListLine {
    let check = if state.is_marked(index) {
        CHECKED
    } else {
        UNCHECKED
    };
    let is_cursor = index == state.cursor();
    let pointer = if is_cursor { POINTER } else { " " };
    let item = &state.items()[index];
    let name = item
        .file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_else(|| item.to_string_lossy());
    let style = if is_cursor {
        LineStyle::Cursor
    } else {
        LineStyle::Row
    };
    ListLine::new(&format!("{check} {pointer} {name}"), width, style)
}

fn footer(state: &SelectionState) -> [(String, LineStyle); 2] {
    if state.is_locked() {
        [
            (
                format!("Locked: {} selected.", state.marked_count()),
                LineStyle::Banner,
            ),
            (
                format!(
                    "{}: proceed  {}: unlock",
                    keymap::CONFIRM,
                    keymap::UNLOCK
                ),
                LineStyle::Hint,
            ),
        ]
    } else {
        [
            (
                format!(
                    "{}/{}: navigate  {}: toggle  {}/{}: all/none",
                    keymap::UP[0],
                    keymap::DOWN[0],
                    keymap::TOGGLE,
                    keymap::SELECT_ALL,
                    keymap::DESELECT_ALL
                ),
                LineStyle::Hint,
            ),
            (
                format!(
                    "{}: lock  {}/{}: cancel",
                    keymap::CONFIRM,
                    keymap::CANCEL[0],
                    keymap::CANCEL[1]
                ),
                LineStyle::Hint,
            ),
        ]
    }
}

/// Half-open range of item indices to show, keeping the cursor roughly
/// centered and never scrolling past either end.
fn scroll_window(cursor: usize, len: usize, visible: usize) -> (usize, usize) {
    if len <= visible {
        return (0, len);
    }
    let first = cursor.saturating_sub(visible / 2).min(len - visible);
    (first, first + visible)
}
