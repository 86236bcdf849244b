use std::io::Write;

use phototerm_preview::DEFAULT_LIST_WIDTH;
use phototerm_preview::ImageRenderer;
use phototerm_preview::RenderCache;
use phototerm_preview::TerminalClassification;
use phototerm_preview::TerminalSize;

use super::BlockPainter;
use super::GraphicsPainter;
use super::PaintFrame;
use super::PaintReport;
use crate::error::Result;
use crate::selection::SelectionState;

/// Routes each paint to the painter matching the terminal classification.
///
/// The classification is fixed for the dispatcher's lifetime. Both painters
/// share one session-scoped [`RenderCache`].
pub struct RenderDispatcher<R> {
    classification: TerminalClassification,
    renderer: R,
    cache: RenderCache,
    block: BlockPainter,
    graphics: GraphicsPainter,
    list_width: u16,
}

impl<R: ImageRenderer> RenderDispatcher<R> {
    pub fn new(classification: TerminalClassification, renderer: R) -> Self {
        Self {
            classification,
            renderer,
            cache: RenderCache::new(),
            block: BlockPainter::new(),
            graphics: GraphicsPainter::new(classification.mode),
            list_width: DEFAULT_LIST_WIDTH,
        }
    }

    pub fn with_list_width(mut self, list_width: u16) -> Self {
        self.list_width = list_width;
        self
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The screen no longer matches what was painted (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.graphics.invalidate();
    }

    /// Paint both panes for `state`.
    ///
    /// `full_repaint` is honored by the block painter. The graphics painter
    /// always redraws both panes and decides on its own whether to clear.
    pub async fn paint<W: Write>(
        &mut self,
        state: &SelectionState,
        full_repaint: bool,
        size: TerminalSize,
        out: &mut W,
    ) -> Result<PaintReport> {
        let frame = PaintFrame {
            state,
            size,
            list_width: self.list_width,
            full_repaint,
        };
        let report = if self.classification.mode.is_graphics() {
            self.graphics
                .paint(frame, &mut self.cache, &self.renderer, out)
                .await?
        } else {
            self.block
                .paint(frame, &mut self.cache, &self.renderer, out)
                .await?
        };
        tracing::trace!(
            mode = %self.classification.mode,
            full_repaint,
            cursor = state.cursor(),
            cached = self.cache.len(),
            "painted frame"
        );
        Ok(report)
    }
}
