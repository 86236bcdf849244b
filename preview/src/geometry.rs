//! Pane layout derived from the terminal size.
//!
//! Rows and columns are 0-based, matching crossterm's `MoveTo`.

pub const MIN_IMAGE_WIDTH: u16 = 20;
pub const MAX_IMAGE_WIDTH: u16 = 60;
pub const MIN_IMAGE_HEIGHT: u16 = 10;
pub const MAX_IMAGE_HEIGHT: u16 = 35;

/// Blank columns between the file list and the image pane.
pub const PANE_GAP: u16 = 2;

pub const DEFAULT_LIST_WIDTH: u16 = 40;
pub const MIN_LIST_WIDTH: u16 = 12;
pub const MAX_LIST_WIDTH: u16 = 60;

/// Rows the list keeps for itself in the stacked layout.
const STACKED_MIN_LIST_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Rows available for drawing. The last row is left alone so a trailing
    /// newline from the renderer never scrolls the screen.
    fn usable_rows(self) -> u16 {
        self.rows.saturating_sub(1).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneGeometry {
    pub list_column_start: u16,
    pub list_width: u16,
    pub list_row_start: u16,
    pub list_height: u16,
    pub image_column_start: u16,
    pub image_row_start: u16,
    pub image_width: u16,
    pub image_height: u16,
}

impl PaneGeometry {
    /// File list on the left, image on the right, both spanning the usable
    /// height. The list gives up columns before the image drops below its
    /// minimum width.
    pub fn side_by_side(size: TerminalSize, preferred_list_width: u16) -> Self {
        let mut list_width = preferred_list_width.clamp(MIN_LIST_WIDTH, MAX_LIST_WIDTH);
        let room_for_image = size.cols.saturating_sub(list_width + PANE_GAP);
        if room_for_image < MIN_IMAGE_WIDTH {
            list_width = size.cols.saturating_sub(PANE_GAP + MIN_IMAGE_WIDTH);
        }
        let image_width = size
            .cols
            .saturating_sub(list_width + PANE_GAP)
            .clamp(MIN_IMAGE_WIDTH, MAX_IMAGE_WIDTH);
        let usable_rows = size.usable_rows();

        let geometry = Self {
            list_column_start: 0,
            list_width,
            list_row_start: 0,
            list_height: usable_rows,
            image_column_start: list_width + PANE_GAP,
            image_row_start: 0,
            image_width,
            image_height: usable_rows.clamp(MIN_IMAGE_HEIGHT, MAX_IMAGE_HEIGHT),
        };
        geometry.log_if_degenerate(size);
        geometry
    }

    /// List above, image below, both starting at the left margin. Used for
    /// sixel output, which drifts back to column 0 on multi-row images.
    ///
    /// Below 13 rows the list minimum plus the image minimum no longer fit;
    /// both keep their minimums and the result is degenerate.
    pub fn stacked(size: TerminalSize, preferred_list_width: u16) -> Self {
        let usable_rows = size.usable_rows();
        let image_height = (usable_rows.saturating_mul(2) / 3).clamp(MIN_IMAGE_HEIGHT, MAX_IMAGE_HEIGHT);
        let list_height = usable_rows
            .saturating_sub(image_height)
            .max(STACKED_MIN_LIST_ROWS);
        let list_width = preferred_list_width
            .clamp(MIN_LIST_WIDTH, MAX_LIST_WIDTH)
            .min(size.cols);

        let geometry = Self {
            list_column_start: 0,
            list_width,
            list_row_start: 0,
            list_height,
            image_column_start: 0,
            image_row_start: list_height,
            image_width: size.cols.clamp(MIN_IMAGE_WIDTH, MAX_IMAGE_WIDTH),
            image_height,
        };
        geometry.log_if_degenerate(size);
        geometry
    }

    /// The terminal is too small to honor the clamp bounds; panes were
    /// clamped to their minimums and may overflow the screen.
    pub fn is_degenerate(&self, size: TerminalSize) -> bool {
        self.image_column_start + self.image_width > size.cols
            || self.image_row_start + self.image_height > size.rows
    }

    fn log_if_degenerate(&self, size: TerminalSize) {
        if self.is_degenerate(size) {
            tracing::debug!(
                cols = size.cols,
                rows = size.rows,
                image_width = self.image_width,
                image_height = self.image_height,
                "terminal smaller than minimum pane size; clamped"
            );
        }
    }
}
