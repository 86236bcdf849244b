use std::time::Duration;

use phototerm_utils_string::single_line;
use thiserror::Error;

/// Failures from the external renderer.
///
/// Only [`RenderError::DependencyMissing`] is fatal. Everything else is shown
/// inline in the image pane and leaves navigation usable; none of these are
/// cached or retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{program} is not installed")]
    DependencyMissing { program: String },

    #[error("preview timed out after {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("{}", failure_text(*status, stderr))]
    Failed { status: Option<i32>, stderr: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::DependencyMissing { .. })
    }

    /// Short diagnostic for the image pane.
    pub fn inline_message(&self) -> String {
        match self {
            RenderError::Timeout { .. } => "[Preview timed out]".to_string(),
            other => format!("[Preview error: {}]", single_line(&other.to_string())),
        }
    }
}

fn failure_text(status: Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match status {
        Some(0) => "renderer produced no output".to_string(),
        Some(code) => format!("renderer exited with status {code}"),
        None => "renderer terminated by signal".to_string(),
    }
}

/// Installation guidance printed when the renderer binary is missing.
pub fn install_instructions(program: &str) -> String {
    format!(
        "Error: {program} is not installed\n\n\
         {program} is required for image preview in the terminal.\n\n\
         Installation instructions:\n  \
         macOS:   brew install viu\n  \
         Linux:   cargo install viu  (or use your package manager)\n\n\
         More info: https://github.com/atanunq/viu"
    )
}
