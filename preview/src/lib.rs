//! Terminal capability detection and image preview rendering.
//!
//! This crate owns everything below the painters: classifying what the host
//! terminal can display, computing pane geometry, invoking the external
//! renderer, and memoizing its output for the lifetime of a session.

mod cache;
mod error;
mod geometry;
mod probe;
mod renderer;

pub use cache::CacheKey;
pub use cache::RenderCache;
pub use error::RenderError;
pub use error::install_instructions;
pub use geometry::DEFAULT_LIST_WIDTH;
pub use geometry::MAX_IMAGE_HEIGHT;
pub use geometry::MAX_IMAGE_WIDTH;
pub use geometry::MAX_LIST_WIDTH;
pub use geometry::MIN_IMAGE_HEIGHT;
pub use geometry::MIN_IMAGE_WIDTH;
pub use geometry::MIN_LIST_WIDTH;
pub use geometry::PANE_GAP;
pub use geometry::PaneGeometry;
pub use geometry::TerminalSize;
pub use probe::DisplayMode;
pub use probe::EnvironmentReader;
pub use probe::ProcessEnvironment;
pub use probe::TerminalClassification;
pub use probe::TerminalProbe;
pub use probe::detect;
pub use renderer::DEFAULT_RENDERER_PROGRAM;
pub use renderer::ImageRenderer;
pub use renderer::RENDER_TIMEOUT;
pub use renderer::RenderOutput;
pub use renderer::RenderRequest;
pub use renderer::ViuRenderer;
