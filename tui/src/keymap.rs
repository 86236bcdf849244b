//! Key bindings and the mapping from terminal events to [`Input`]s.

use std::fmt;
use std::io;

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::Stream;
use futures::StreamExt;
use futures::stream::LocalBoxStream;

use crate::selection::Input;

/// A keyboard binding with key and modifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct KeyBinding {
    key: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub(crate) const fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Check if this binding matches the given key event (press or repeat).
    pub(crate) fn is_press(&self, event: KeyEvent) -> bool {
        self.key == event.code
            && self.modifiers == event.modifiers
            && (event.kind == KeyEventKind::Press || event.kind == KeyEventKind::Repeat)
    }
}

pub(crate) const fn plain(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::NONE)
}

pub(crate) const fn ctrl(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::CONTROL)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl + ")?;
        }
        match self.key {
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_lowercase()),
            other => f.write_str(&other.to_string().to_ascii_lowercase()),
        }
    }
}

pub(crate) const UP: [KeyBinding; 2] = [plain(KeyCode::Up), plain(KeyCode::Char('k'))];
pub(crate) const DOWN: [KeyBinding; 2] = [plain(KeyCode::Down), plain(KeyCode::Char('j'))];
pub(crate) const FIRST: KeyBinding = plain(KeyCode::Home);
pub(crate) const LAST: KeyBinding = plain(KeyCode::End);
pub(crate) const TOGGLE: KeyBinding = plain(KeyCode::Char(' '));
pub(crate) const SELECT_ALL: KeyBinding = plain(KeyCode::Char('a'));
pub(crate) const DESELECT_ALL: KeyBinding = plain(KeyCode::Char('n'));
pub(crate) const LOCK: KeyBinding = plain(KeyCode::Char('l'));
pub(crate) const UNLOCK: KeyBinding = plain(KeyCode::Char('u'));
pub(crate) const CONFIRM: KeyBinding = plain(KeyCode::Enter);
pub(crate) const CANCEL: [KeyBinding; 2] = [plain(KeyCode::Char('q')), plain(KeyCode::Esc)];
pub(crate) const INTERRUPT: KeyBinding = ctrl(KeyCode::Char('c'));

/// Binding table in lookup order.
const BINDINGS: &[(KeyBinding, Input)] = &[
    (UP[0], Input::Up),
    (UP[1], Input::Up),
    (DOWN[0], Input::Down),
    (DOWN[1], Input::Down),
    (FIRST, Input::First),
    (LAST, Input::Last),
    (TOGGLE, Input::Toggle),
    (SELECT_ALL, Input::SelectAll),
    (DESELECT_ALL, Input::DeselectAll),
    (LOCK, Input::Lock),
    (UNLOCK, Input::Unlock),
    (CONFIRM, Input::Confirm),
    (CANCEL[0], Input::Cancel),
    (CANCEL[1], Input::Cancel),
    (INTERRUPT, Input::Interrupt),
];

/// Translate one terminal event. Unbound keys, key releases, mouse and
/// focus events yield `None`.
pub(crate) fn input_for_event(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) => {
            // Some terminals report shifted letters with SHIFT set; bindings
            // are declared without it.
            let key = KeyEvent {
                modifiers: key.modifiers - KeyModifiers::SHIFT,
                ..*key
            };
            BINDINGS
                .iter()
                .find(|(binding, _)| binding.is_press(key))
                .map(|(_, input)| *input)
        }
        Event::Resize(_, _) => Some(Input::Resize),
        _ => None,
    }
}

/// Adapt a stream of terminal events (normally crossterm's `EventStream`)
/// into decoded inputs. Read errors are passed through.
pub(crate) fn inputs<S>(events: S) -> LocalBoxStream<'static, io::Result<Input>>
where
    S: Stream<Item = io::Result<Event>> + 'static,
{
    events
        .filter_map(|event| async move {
            match event {
                Ok(event) => input_for_event(&event).map(Ok),
                Err(err) => Some(Err(err)),
            }
        })
        .boxed_local()
}
