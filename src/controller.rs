use std::time::Duration;
use tracing::trace;

use crate::domain::{Message, TVConfig, TabError};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    /// Waits for the next event, but never past a pending search deadline.
    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TabError> {
        let mut timeout = Duration::from_millis(self.event_poll_time);
        if let Some(remaining) = model.next_deadline() {
            timeout = timeout.min(remaining);
        }

        if event::poll(timeout)? {
            return Ok(match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        Some(Message::RawKey(key))
                    } else {
                        self.handle_key(key)
                    }
                }
                Event::Resize(width, height) => {
                    Some(Message::Resize(width as usize, height as usize))
                }
                _ => None,
            });
        }
        Ok(None)
    }

    pub fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(Message::MoveLeft),
            (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(Message::MoveRight),
            (KeyCode::Char('n'), _) | (KeyCode::PageDown, _) => Some(Message::NextPage),
            (KeyCode::Char('p'), _) | (KeyCode::PageUp, _) => Some(Message::PrevPage),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::FirstPage),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::LastPage),
            (KeyCode::Char('s'), _) => Some(Message::ToggleSort),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char(' '), _) => Some(Message::ToggleSelect),
            (KeyCode::Char('a'), _) => Some(Message::SelectPage),
            (KeyCode::Char('x'), _) => Some(Message::ClearSelection),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('c'), _) => Some(Message::CopyCell),
            (KeyCode::Char('y'), _) => Some(Message::CopyRow),
            (KeyCode::Char('e'), _) => Some(Message::Export),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
