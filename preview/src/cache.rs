use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use crate::error::RenderError;
use crate::probe::DisplayMode;
use crate::renderer::ImageRenderer;
use crate::renderer::RenderOutput;
use crate::renderer::RenderRequest;

/// Pane dimensions are part of the key, so a resize simply stops hitting the
/// old entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub mode: DisplayMode,
    pub image: PathBuf,
    pub width: u16,
    pub height: u16,
}

/// Session-scoped memo of renderer output.
///
/// Unbounded: one interactive session touches at most one entry per image
/// per pane size, and the whole map is dropped when the session ends.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: HashMap<CacheKey, RenderOutput>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&RenderOutput> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: CacheKey, output: RenderOutput) {
        self.entries.insert(key, output);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-through lookup. A miss invokes `renderer` once; only successful
    /// output is stored, so a failed image is retried on the next visit.
    pub async fn resolve(
        &mut self,
        renderer: &dyn ImageRenderer,
        request: &RenderRequest,
    ) -> Result<&RenderOutput, RenderError> {
        match self.entries.entry(request.cache_key()) {
            Entry::Occupied(entry) => {
                tracing::trace!(image = %request.image.display(), "render cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                tracing::trace!(image = %request.image.display(), "render cache miss");
                let output = renderer.render(request).await?;
                Ok(entry.insert(output))
            }
        }
    }
}
