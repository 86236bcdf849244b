use std::collections::HashMap;
use std::sync::OnceLock;

static CLASSIFICATION: OnceLock<TerminalClassification> = OnceLock::new();

/// Terminal-program identifier that speaks the iTerm inline image protocol.
const ITERM_PROGRAM: &str = "iTerm.app";

/// Terminals that speak the Kitty graphics protocol, matched as whole tokens.
const KITTY_FAMILY: &[&str] = &["kitty", "ghostty"];

const SIXEL_MARKER: &str = "sixel";

/// `TMUX` is set by tmux, `STY` by GNU screen.
const MULTIPLEXER_MARKERS: &[&str] = &["TMUX", "STY"];

/// Read-only access to environment variables.
///
/// The probe never touches `std::env` directly so tests can classify
/// arbitrary environments without mutating process state.
pub trait EnvironmentReader {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvironmentReader for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvironmentReader for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// How images are put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Colored Unicode half blocks; line-addressable text.
    Blocks,
    /// iTerm inline image protocol.
    Iterm,
    /// Kitty graphics protocol.
    Kitty,
    /// DEC sixel graphics.
    Sixel,
}

impl DisplayMode {
    /// Whether the renderer output is an atomic binary payload rather than
    /// a sequence of text lines.
    pub fn is_graphics(self) -> bool {
        !matches!(self, DisplayMode::Blocks)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Blocks => "blocks",
            DisplayMode::Iterm => "iterm",
            DisplayMode::Kitty => "kitty",
            DisplayMode::Sixel => "sixel",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalClassification {
    pub mode: DisplayMode,
    pub inside_multiplexer: bool,
}

impl TerminalClassification {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            inside_multiplexer: false,
        }
    }
}

/// Classifies the host terminal from its environment.
#[derive(Debug, Clone)]
pub struct TerminalProbe<E> {
    env: E,
}

impl<E: EnvironmentReader> TerminalProbe<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// First match wins; multiplexer presence overrides every protocol check
    /// because multiplexers do not reliably forward graphics escapes.
    pub fn classify(&self) -> TerminalClassification {
        let term_program = self.non_empty("TERM_PROGRAM");
        let term = self.non_empty("TERM");

        if MULTIPLEXER_MARKERS
            .iter()
            .any(|marker| self.non_empty(marker).is_some())
        {
            return TerminalClassification {
                mode: DisplayMode::Blocks,
                inside_multiplexer: true,
            };
        }

        if term_program.as_deref() == Some(ITERM_PROGRAM) {
            return TerminalClassification::new(DisplayMode::Iterm);
        }

        let kitty_family = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|v| KITTY_FAMILY.iter().any(|name| has_token(v, name)))
        };
        if kitty_family(&term_program) || kitty_family(&term) {
            return TerminalClassification::new(DisplayMode::Kitty);
        }

        if term.as_deref().is_some_and(|t| has_token(t, SIXEL_MARKER)) {
            return TerminalClassification::new(DisplayMode::Sixel);
        }

        TerminalClassification::new(DisplayMode::Blocks)
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.trim().is_empty())
    }
}

/// Classification of the current process, computed once.
pub fn detect() -> TerminalClassification {
    *CLASSIFICATION.get_or_init(|| {
        let env = ProcessEnvironment;
        let classification = TerminalProbe::new(env).classify();
        tracing::info!(
            term = env.var("TERM").as_deref().unwrap_or("unknown"),
            term_program = env.var("TERM_PROGRAM").as_deref().unwrap_or("unknown"),
            mode = %classification.mode,
            inside_multiplexer = classification.inside_multiplexer,
            "classified terminal"
        );
        classification
    })
}

/// True when `name` appears in `value` as a complete token. `xterm-kitty`
/// contains the token `kitty`; `xterm-kittyhawk` does not.
fn has_token(value: &str, name: &str) -> bool {
    value
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .any(|token| token.eq_ignore_ascii_case(name))
}
