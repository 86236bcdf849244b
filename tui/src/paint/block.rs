use std::borrow::Cow;
use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::style::ResetColor;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
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

/// Side-by-side painter for line-structured block output.
///
/// Honors `full_repaint`: a partial paint skips the screen clear and relies
/// on every row being rewritten with content or padding.
#[derive(Debug, Default)]
pub struct BlockPainter;

impl BlockPainter {
    pub fn new() -> Self {
        Self
    }

    pub async fn paint<W: Write>(
        &mut self,
        frame: PaintFrame<'_>,
        cache: &mut RenderCache,
        renderer: &dyn ImageRenderer,
        out: &mut W,
    ) -> Result<PaintReport> {
        let geometry = PaneGeometry::side_by_side(frame.size, frame.list_width);
        let request = RenderRequest::new(frame.state.current(), &geometry, DisplayMode::Blocks);
        let preview = resolve_preview(cache, renderer, &request).await?;
        let image = preview.status();

        if frame.full_repaint {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        let list = list_panel::render(frame.state, geometry.list_width, geometry.list_height);
        let image_lines = image_lines(&preview, &geometry);
        let blank_image = " ".repeat(usize::from(geometry.image_width));

        let rows = list.len().max(image_lines.len());
        for (row, offset) in (0..rows).zip(geometry.list_row_start..) {
            queue!(out, MoveTo(geometry.list_column_start, offset))?;
            match list.get(row) {
                Some(line) => queue!(out, Print(line.styled()))?,
                None => queue!(out, Print(" ".repeat(usize::from(geometry.list_width))))?,
            }

            queue!(out, MoveTo(geometry.image_column_start, offset))?;
            match image_lines.get(row) {
                Some(line) => queue!(out, Print(line.as_ref()), ResetColor)?,
                None => queue!(out, Print(&blank_image))?,
            }
            queue!(out, Clear(ClearType::UntilNewLine))?;
        }
        out.flush()?;

        Ok(PaintReport { geometry, image })
    }
}

/// At most `image_height` rows of image text.
fn image_lines<'a>(preview: &'a Preview<'_>, geometry: &PaneGeometry) -> Vec<Cow<'a, str>> {
    let limit = usize::from(geometry.image_height);
    match preview {
        Preview::Output(RenderOutput::Lines(lines)) => lines
            .iter()
            .take(limit)
            .map(|line| Cow::Borrowed(line.as_str()))
            .collect(),
        Preview::Output(RenderOutput::Bytes(_)) => {
            tracing::debug!("binary output reached the block painter; ignoring");
            Vec::new()
        }
        Preview::Diagnostic(message) => {
            vec![truncate_to_width(message, usize::from(geometry.image_width))]
        }
    }
}
