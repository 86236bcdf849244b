//! Full-screen image picker with a live terminal preview.
//!
//! The binary scans a folder, lets the user browse and mark images next to
//! a preview rendered by `viu`, and writes the confirmed selection to stdout.

mod cli;
pub mod config;
mod error;
mod keymap;
mod list_panel;
pub mod logging;
pub mod paint;
pub mod scanner;
pub mod selection;
pub mod session;
pub mod terminal;

pub use cli::Cli;
pub use error::Result;
pub use error::SessionError;

use std::ffi::OsStr;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crossterm::event::EventStream;
use phototerm_preview::TerminalClassification;
use phototerm_preview::ViuRenderer;
use phototerm_preview::install_instructions;

use crate::config::AppConfig;
use crate::paint::RenderDispatcher;
use crate::selection::SelectionController;
use crate::selection::SessionOutcome;
use crate::session::Session;
use crate::terminal::LiveTerminalSize;
use crate::terminal::TerminalGuard;

/// Conventional exit status for a process ended by SIGINT.
pub const EXIT_INTERRUPTED: u8 = 130;

pub fn run_main(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref())?;
    if let Err(err) = logging::init(&config) {
        eprintln!("warning: file logging disabled: {err:#}");
    }

    let images = match scanner::scan_folder(&cli.folder) {
        Ok(images) => images,
        Err(err) => {
            tracing::error!(error = %err, "scan failed");
            eprintln!("Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let program = &config.renderer.program;
    let renderer = match ViuRenderer::locate(program) {
        Ok(renderer) => renderer,
        Err(err) => {
            tracing::error!(error = %err, "renderer unavailable");
            eprintln!("{}", install_instructions(program));
            return Ok(ExitCode::FAILURE);
        }
    };

    let classification = phototerm_preview::detect();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_interactive(
        images,
        renderer,
        classification,
        config.layout.list_width,
    ));

    // The terminal guard has been dropped by now; plain output is safe.
    match result {
        Ok(outcome) => {
            let code = report_outcome(
                &outcome,
                cli.print0,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            Ok(ExitCode::from(code))
        }
        Err(SessionError::Render(err)) if err.is_fatal() => {
            tracing::error!(error = %err, "renderer disappeared during session");
            eprintln!("{}", install_instructions(program));
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_interactive(
    images: Vec<PathBuf>,
    renderer: ViuRenderer,
    classification: TerminalClassification,
    list_width: u16,
) -> Result<SessionOutcome> {
    let controller = SelectionController::new(images)?;
    let dispatcher = RenderDispatcher::new(classification, renderer).with_list_width(list_width);

    let _guard = TerminalGuard::enter(classification.mode)?;
    let mut session = Session::new(
        controller,
        dispatcher,
        BufWriter::new(io::stderr()),
        LiveTerminalSize,
    );
    let inputs = keymap::inputs(EventStream::new());
    session.run_with_interrupt(inputs, sigint()).await
}

/// Resolves on SIGINT. Never resolves when the handler cannot be installed.
async fn sigint() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for SIGINT");
        std::future::pending::<()>().await;
    }
}

/// Print the hand-off for `outcome` and return the exit status.
///
/// Paths go to `out` for the downstream pipeline; the human-readable summary
/// goes to `summary`.
pub fn report_outcome<O: Write, S: Write>(
    outcome: &SessionOutcome,
    print0: bool,
    out: &mut O,
    summary: &mut S,
) -> io::Result<u8> {
    match outcome {
        SessionOutcome::Confirmed(paths) => {
            writeln!(summary, "Selected {} image(s):", paths.len())?;
            for path in paths {
                let name = path
                    .file_name()
                    .map(OsStr::to_string_lossy)
                    .unwrap_or_else(|| path.to_string_lossy());
                writeln!(summary, "  - {name}")?;
            }
            let separator = if print0 { "\0" } else { "\n" };
            for path in paths {
                write!(out, "{}{separator}", path.display())?;
            }
            out.flush()?;
            Ok(0)
        }
        SessionOutcome::Cancelled => {
            writeln!(summary, "No images selected")?;
            Ok(1)
        }
        SessionOutcome::Interrupted => {
            writeln!(summary, "Cancelled by user")?;
            Ok(EXIT_INTERRUPTED)
        }
    }
}
