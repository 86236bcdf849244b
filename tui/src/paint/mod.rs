//! Painting the two panes.
//!
//! Block output is text and is interleaved row by row with the file list.
//! Graphics output is an indivisible escape sequence, so it is placed with
//! absolute cursor positioning after the list has been drawn.

mod block;
mod dispatcher;
mod graphics;

pub use block::BlockPainter;
pub use dispatcher::RenderDispatcher;
pub use graphics::GraphicsPainter;

use phototerm_preview::ImageRenderer;
use phototerm_preview::PaneGeometry;
use phototerm_preview::RenderCache;
use phototerm_preview::RenderError;
use phototerm_preview::RenderOutput;
use phototerm_preview::RenderRequest;
use phototerm_preview::TerminalSize;

use crate::selection::SelectionState;

/// Everything a painter needs to know about the frame being drawn.
#[derive(Debug, Clone, Copy)]
pub struct PaintFrame<'a> {
    pub state: &'a SelectionState,
    pub size: TerminalSize,
    pub list_width: u16,
    pub full_repaint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Rendered,
    /// Shown inline in place of the image.
    Diagnostic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintReport {
    pub geometry: PaneGeometry,
    pub image: ImageStatus,
}

enum Preview<'a> {
    Output(&'a RenderOutput),
    Diagnostic(String),
}

impl Preview<'_> {
    fn status(&self) -> ImageStatus {
        match self {
            Preview::Output(_) => ImageStatus::Rendered,
            Preview::Diagnostic(message) => ImageStatus::Diagnostic(message.clone()),
        }
    }
}

/// Read through the cache. Recoverable failures become an inline
/// diagnostic; a missing renderer is returned to the caller.
async fn resolve_preview<'c>(
    cache: &'c mut RenderCache,
    renderer: &dyn ImageRenderer,
    request: &RenderRequest,
) -> Result<Preview<'c>, RenderError> {
    match cache.resolve(renderer, request).await {
        Ok(output) => Ok(Preview::Output(output)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            tracing::warn!(image = %request.image.display(), error = %err, "preview failed");
            Ok(Preview::Diagnostic(err.inline_message()))
        }
    }
}
