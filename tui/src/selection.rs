//! Navigation and marking state machine.
//!
//! ```text
//!            toggle / select-all / deselect-all / up / down
//!              ┌──────────┐
//!              ▼          │
//!          Browsing ──────┘
//!           │    ▲
//!   lock    │    │ unlock
//! (marked≠∅)▼    │
//!           Locked ── proceed ──▶ Confirmed
//!
//!   any state ── cancel ──▶ Cancelled
//!   any state ── interrupt ──▶ Interrupted
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Result;
use crate::error::SessionError;

/// One decoded user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    First,
    Last,
    Toggle,
    SelectAll,
    DeselectAll,
    Lock,
    Unlock,
    /// Enter: lock while browsing, proceed while locked.
    Confirm,
    Proceed,
    Cancel,
    Interrupt,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Browsing,
    Locked,
    Confirmed,
    Cancelled,
    Interrupted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Phase::Confirmed | Phase::Cancelled | Phase::Interrupted
        )
    }
}

/// What the screen needs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    None,
    /// Rows are overwritten in place.
    Partial,
    /// Clear and redraw both panes.
    Full,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Marked images in list order.
    Confirmed(Vec<PathBuf>),
    Cancelled,
    /// Ctrl-C or SIGINT; callers skip the ordinary cancellation message.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    items: Vec<PathBuf>,
    cursor: usize,
    marked: BTreeSet<usize>,
    locked: bool,
}

impl SelectionState {
    /// Duplicate paths are dropped, keeping the first occurrence.
    pub fn new(items: Vec<PathBuf>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let items: Vec<PathBuf> = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        if items.is_empty() {
            return Err(SessionError::NoImages);
        }
        Ok(Self {
            items,
            cursor: 0,
            marked: BTreeSet::new(),
            locked: false,
        })
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Path {
        &self.items[self.cursor]
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Marked images in their original order, independent of the cursor.
    pub fn selected(&self) -> Vec<PathBuf> {
        self.marked
            .iter()
            .map(|&index| self.items[index].clone())
            .collect()
    }

    fn move_to(&mut self, index: usize) -> bool {
        let clamped = index.min(self.items.len() - 1);
        let moved = clamped != self.cursor;
        self.cursor = clamped;
        moved
    }

    fn toggle_current(&mut self) {
        if !self.marked.remove(&self.cursor) {
            self.marked.insert(self.cursor);
        }
    }
}

/// Owns the [`SelectionState`] and applies [`Input`]s to it.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    phase: Phase,
}

impl SelectionController {
    pub fn new(items: Vec<PathBuf>) -> Result<Self> {
        Ok(Self {
            state: SelectionState::new(items)?,
            phase: Phase::Browsing,
        })
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Apply one input. Inputs after a terminal phase are ignored.
    pub fn handle(&mut self, input: Input) -> Repaint {
        if self.phase.is_terminal() {
            return Repaint::None;
        }

        match (self.phase, input) {
            (_, Input::Cancel) => {
                self.phase = Phase::Cancelled;
                Repaint::None
            }
            (_, Input::Interrupt) => {
                self.phase = Phase::Interrupted;
                Repaint::None
            }
            (_, Input::Resize) => Repaint::Full,

            // Marks are frozen while locked, but the preview stays browsable.
            (_, Input::Up) => self.navigate(self.state.cursor.saturating_sub(1)),
            (_, Input::Down) => self.navigate(self.state.cursor.saturating_add(1)),
            (_, Input::First) => self.navigate(0),
            (_, Input::Last) => self.navigate(usize::MAX),

            (Phase::Browsing, Input::Toggle) => {
                self.state.toggle_current();
                Repaint::Full
            }
            (Phase::Browsing, Input::SelectAll) => {
                self.state.marked = (0..self.state.items.len()).collect();
                Repaint::Full
            }
            (Phase::Browsing, Input::DeselectAll) => {
                self.state.marked.clear();
                Repaint::Full
            }
            (Phase::Browsing, Input::Lock | Input::Confirm) => {
                if self.state.marked.is_empty() {
                    tracing::debug!("lock ignored: nothing marked");
                    return Repaint::None;
                }
                self.phase = Phase::Locked;
                self.state.locked = true;
                Repaint::Full
            }
            (Phase::Locked, Input::Unlock) => {
                self.phase = Phase::Browsing;
                self.state.locked = false;
                Repaint::Full
            }
            (Phase::Locked, Input::Proceed | Input::Confirm) => {
                self.phase = Phase::Confirmed;
                Repaint::None
            }
            _ => Repaint::None,
        }
    }

    /// `Some` once the session has reached a terminal phase.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.phase {
            Phase::Confirmed => Some(SessionOutcome::Confirmed(self.state.selected())),
            Phase::Cancelled => Some(SessionOutcome::Cancelled),
            Phase::Interrupted => Some(SessionOutcome::Interrupted),
            Phase::Browsing | Phase::Locked => None,
        }
    }

    fn navigate(&mut self, index: usize) -> Repaint {
        if self.state.move_to(index) {
            Repaint::Partial
        } else {
            Repaint::None
        }
    }
}
