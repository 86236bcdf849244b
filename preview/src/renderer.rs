//! External image renderer invocation.
//!
//! The renderer is a hard dependency: one attempt per request, bounded by
//! [`RENDER_TIMEOUT`], no retry and no fallback renderer.

use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::cache::CacheKey;
use crate::error::RenderError;
use crate::geometry::PaneGeometry;
use crate::probe::DisplayMode;

pub const DEFAULT_RENDERER_PROGRAM: &str = "viu";

/// Upper bound on a single renderer invocation.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(5);

/// One image at one pane size in one display mode. Built fresh per paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub image: PathBuf,
    pub width: u16,
    pub height: u16,
    pub mode: DisplayMode,
}

impl RenderRequest {
    pub fn new(image: &Path, geometry: &PaneGeometry, mode: DisplayMode) -> Self {
        Self {
            image: image.to_path_buf(),
            width: geometry.image_width,
            height: geometry.image_height,
            mode,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            mode: self.mode,
            image: self.image.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// What the renderer produced.
///
/// Block output is line-structured text. Graphics output is a single escape
/// sequence that must reach the terminal byte-for-byte, so it is never
/// decoded or split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    Lines(Vec<String>),
    Bytes(Vec<u8>),
}

#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}

/// Runs `viu` (or a compatible program) as a child process.
#[derive(Debug, Clone)]
pub struct ViuRenderer {
    program: PathBuf,
    program_name: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl ViuRenderer {
    /// Resolve `program` on `PATH`.
    pub fn locate(program: &str) -> Result<Self, RenderError> {
        let path = which::which(program).map_err(|_| RenderError::DependencyMissing {
            program: program.to_string(),
        })?;
        tracing::debug!(program, path = %path.display(), "located renderer");
        Ok(Self::new(path))
    }

    pub fn new(program: PathBuf) -> Self {
        let program_name = program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            program,
            program_name,
            base_args: Vec::new(),
            timeout: RENDER_TIMEOUT,
        }
    }

    /// Arguments placed before the generated size and mode flags.
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_args(&self, request: &RenderRequest) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend([
            "-w".to_string(),
            request.width.to_string(),
            "-h".to_string(),
            request.height.to_string(),
        ]);
        if !request.mode.is_graphics() {
            args.push("-b".to_string());
        }
        args.push(request.image.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl ImageRenderer for ViuRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let args = self.command_args(request);
        tracing::debug!(program = %self.program_name, ?args, "spawning renderer");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    RenderError::DependencyMissing {
                        program: self.program_name.clone(),
                    }
                } else {
                    RenderError::Spawn {
                        program: self.program_name.clone(),
                        source,
                    }
                }
            })?;

        // Dropping the pending future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| RenderError::Spawn {
                program: self.program_name.clone(),
                source,
            })?,
            Err(_) => {
                tracing::warn!(
                    image = %request.image.display(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "renderer timed out"
                );
                return Err(RenderError::Timeout {
                    timeout: self.timeout,
                });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() || output.stdout.is_empty() {
            tracing::warn!(
                image = %request.image.display(),
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "renderer failed"
            );
            return Err(RenderError::Failed {
                status: output.status.code(),
                stderr,
            });
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "renderer wrote to stderr");
        }

        if request.mode.is_graphics() {
            Ok(RenderOutput::Bytes(output.stdout))
        } else {
            let lines = String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string)
                .collect();
            Ok(RenderOutput::Lines(lines))
        }
    }
}
