//! Shared fixtures: a scripted renderer and session builders.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use phototerm_preview::DisplayMode;
use phototerm_preview::ImageRenderer;
use phototerm_preview::RENDER_TIMEOUT;
use phototerm_preview::RenderError;
use phototerm_preview::RenderOutput;
use phototerm_preview::RenderRequest;
use phototerm_preview::TerminalClassification;
use phototerm_preview::TerminalSize;
use phototerm_tui::paint::RenderDispatcher;
use phototerm_tui::selection::Input;
use phototerm_tui::selection::SelectionController;
use phototerm_tui::session::Session;

pub const CLEAR_SCREEN: &str = "\x1b[2J";

#[derive(Debug, Clone)]
pub enum Failure {
    Timeout,
    Exit(String),
    Missing,
}

/// Renderer double keyed on file name. Records every request.
#[derive(Default)]
pub struct MockRenderer {
    calls: AtomicUsize,
    requests: Mutex<Vec<RenderRequest>>,
    failures: HashMap<String, Failure>,
    delay: Option<Duration>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, file_name: &str, failure: Failure) -> Self {
        self.failures.insert(file_name.to_string(), failure);
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// What the mock produces for `request` on success.
pub fn rendered(request: &RenderRequest) -> RenderOutput {
    let name = file_name(request);
    if request.mode.is_graphics() {
        RenderOutput::Bytes(
            format!("\x1b_Gname={name},w={},h={}\x1b\\", request.width, request.height).into_bytes(),
        )
    } else {
        RenderOutput::Lines(
            (0..3)
                .map(|row| format!("\x1b[38;5;{row}m{name} {}x{} row {row}", request.width, request.height))
                .collect(),
        )
    }
}

fn file_name(request: &RenderRequest) -> String {
    request
        .image
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[async_trait]
impl ImageRenderer for MockRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failures.get(&file_name(request)) {
            Some(Failure::Timeout) => Err(RenderError::Timeout {
                timeout: RENDER_TIMEOUT,
            }),
            Some(Failure::Exit(stderr)) => Err(RenderError::Failed {
                status: Some(1),
                stderr: stderr.clone(),
            }),
            Some(Failure::Missing) => Err(RenderError::DependencyMissing {
                program: "viu".to_string(),
            }),
            None => Ok(rendered(request)),
        }
    }
}

pub fn images(n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| PathBuf::from(format!("/photos/img{i}.jpg")))
        .collect()
}

pub fn classification(mode: DisplayMode) -> TerminalClassification {
    TerminalClassification::new(mode)
}

pub fn session(
    mode: DisplayMode,
    renderer: MockRenderer,
    n: usize,
    size: TerminalSize,
) -> Session<MockRenderer, Vec<u8>, TerminalSize> {
    let controller = SelectionController::new(images(n)).unwrap();
    let dispatcher = RenderDispatcher::new(classification(mode), renderer);
    Session::new(controller, dispatcher, Vec::new(), size)
}

pub fn scripted(inputs: Vec<Input>) -> impl futures::Stream<Item = io::Result<Input>> + Unpin {
    stream::iter(inputs.into_iter().map(Ok))
}

pub fn screen(out: &[u8]) -> String {
    String::from_utf8_lossy(out).into_owned()
}
