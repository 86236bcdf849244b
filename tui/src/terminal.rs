//! Raw-mode terminal ownership.

use std::io;
use std::io::Write;
use std::io::stderr;

use crossterm::ExecutableCommand;
use crossterm::cursor;
use crossterm::terminal;
use phototerm_preview::DisplayMode;
use phototerm_preview::TerminalSize;

/// Deletes all Kitty images and their data.
const KITTY_PURGE: &str = "\x1b_Ga=d,d=A,q=1\x1b\\";

/// Holds the terminal in raw mode on the alternate screen with the cursor
/// hidden. The screen is driven through stderr so stdout stays free for the
/// selected paths. Dropping the guard restores the terminal on every exit
/// path, including unwinding.
#[derive(Debug)]
pub struct TerminalGuard {
    mode: DisplayMode,
    cleaned: bool,
}

impl TerminalGuard {
    pub fn enter(mode: DisplayMode) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on a failure still has to undo raw mode, which the
        // guard's Drop does.
        let guard = Self {
            mode,
            cleaned: false,
        };
        let mut out = stderr();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        tracing::debug!("entered raw mode");
        Ok(guard)
    }

    /// Restore the terminal now. Idempotent; errors are ignored because this
    /// also runs from Drop.
    pub fn restore(&mut self) {
        if self.cleaned {
            return;
        }
        self.cleaned = true;
        let mut out = stderr();
        if self.mode == DisplayMode::Kitty {
            let _ = write!(out, "{KITTY_PURGE}");
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        tracing::debug!("restored terminal");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Where the session learns the current terminal size.
pub trait TerminalSizeSource {
    fn size(&self) -> io::Result<TerminalSize>;
}

/// Queries the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveTerminalSize;

impl TerminalSizeSource for LiveTerminalSize {
    fn size(&self) -> io::Result<TerminalSize> {
        let (cols, rows) = terminal::size()?;
        Ok(TerminalSize::new(cols, rows))
    }
}

/// A fixed size, for tests and for callers that already know it.
impl TerminalSizeSource for TerminalSize {
    fn size(&self) -> io::Result<TerminalSize> {
        Ok(*self)
    }
}
