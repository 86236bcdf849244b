use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
use phototerm_preview::CacheKey;
use phototerm_preview::DisplayMode;
use phototerm_preview::ImageRenderer;
use phototerm_preview::PaneGeometry;
use phototerm_preview::RenderCache;
use phototerm_preview::RenderOutput;
use phototerm_preview::RenderRequest;
use phototerm_utils_string::truncate_to_width;

use super::PaintFrame;
use super::PaintReport;
use super::Preview;
use super::resolve_preview;
use crate::error::Result;
use crate::list_panel;

/// Removes every Kitty image placement on screen. Overwriting cells with
/// spaces does not remove Kitty images, which live on their own layer.
const KITTY_DELETE_ALL: &[u8] = b"\x1b_Ga=d,d=a,q=1\x1b\\";

/// Painter for atomic graphics payloads (iTerm, Kitty, sixel).
///
/// Every paint redraws both panes; `full_repaint` only matters for whether
/// the screen was ever cleared. The first paint of a session clears, later
/// paints home the cursor and overwrite in place.
#[derive(Debug)]
pub struct GraphicsPainter {
    mode: DisplayMode,
    painted_once: bool,
    last_image: Option<CacheKey>,
}

impl GraphicsPainter {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            painted_once: false,
            last_image: None,
        }
    }

    /// Forget what is on screen so the next paint starts from a clear.
    pub fn invalidate(&mut self) {
        self.painted_once = false;
        self.last_image = None;
    }

    /// Sixel output drifts back to the left margin on tall images, so it
    /// gets the list above and the image below.
    pub fn geometry(&self, frame: &PaintFrame<'_>) -> PaneGeometry {
        match self.mode {
            DisplayMode::Sixel => PaneGeometry::stacked(frame.size, frame.list_width),
            _ => PaneGeometry::side_by_side(frame.size, frame.list_width),
        }
    }

    pub async fn paint<W: Write>(
        &mut self,
        frame: PaintFrame<'_>,
        cache: &mut RenderCache,
        renderer: &dyn ImageRenderer,
        out: &mut W,
    ) -> Result<PaintReport> {
        let geometry = self.geometry(&frame);

        if self.painted_once {
            queue!(out, MoveTo(0, 0))?;
        } else {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            self.painted_once = true;
        }

        let list = list_panel::render(frame.state, geometry.list_width, geometry.list_height);
        for (line, row) in list.iter().zip(geometry.list_row_start..) {
            queue!(out, MoveTo(geometry.list_column_start, row), Print(line.styled()))?;
        }
        out.flush()?;

        let request = RenderRequest::new(frame.state.current(), &geometry, self.mode);
        let key = request.cache_key();
        if self.last_image.as_ref() != Some(&key) {
            self.blank_image_pane(&geometry, out)?;
        }
        queue!(
            out,
            MoveTo(geometry.image_column_start, geometry.image_row_start)
        )?;
        out.flush()?;

        let preview = resolve_preview(cache, renderer, &request).await?;
        let image = preview.status();

        // The render may have taken a while; re-anchor before writing.
        queue!(
            out,
            MoveTo(geometry.image_column_start, geometry.image_row_start)
        )?;
        match &preview {
            Preview::Output(RenderOutput::Bytes(bytes)) => {
                out.write_all(bytes)?;
                self.last_image = Some(key);
            }
            Preview::Output(RenderOutput::Lines(lines)) => {
                for (line, row) in lines
                    .iter()
                    .take(usize::from(geometry.image_height))
                    .zip(geometry.image_row_start..)
                {
                    queue!(out, MoveTo(geometry.image_column_start, row), Print(line))?;
                }
                self.last_image = Some(key);
            }
            Preview::Diagnostic(message) => {
                // Failures are never cached, so the pane was blanked above.
                let message = truncate_to_width(message, usize::from(geometry.image_width));
                queue!(out, Print(message))?;
                self.last_image = None;
            }
        }
        out.flush()?;

        Ok(PaintReport { geometry, image })
    }

    fn blank_image_pane<W: Write>(&self, geometry: &PaneGeometry, out: &mut W) -> Result<()> {
        if self.mode == DisplayMode::Kitty {
            out.write_all(KITTY_DELETE_ALL)?;
        }
        let blank = " ".repeat(usize::from(geometry.image_width));
        for row in geometry.image_row_start..geometry.image_row_start + geometry.image_height {
            queue!(
                out,
                MoveTo(geometry.image_column_start, row),
                Print(&blank)
            )?;
        }
        Ok(())
    }
}
