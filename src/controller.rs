use std::time::Duration;
use tracing::trace;

use crate::domain::{DVConfig, DVError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &DVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, DVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        Some(Message::RawKey(key))
                    } else {
                        Self::handle_key(key)
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

    pub fn handle_key(key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(Message::MoveDown),
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(Message::MoveUp),
            (KeyCode::Left | KeyCode::Char('h'), _) => Some(Message::MoveLeft),
            (KeyCode::Right | KeyCode::Char('l'), _) => Some(Message::MoveRight),
            (KeyCode::PageDown, _) => Some(Message::MovePageDown),
            (KeyCode::PageUp, _) => Some(Message::MovePageUp),
            (KeyCode::Home | KeyCode::Char('g'), _) => Some(Message::MoveBeginning),
            (KeyCode::End | KeyCode::Char('G'), _) => Some(Message::MoveEnd),
            (KeyCode::Tab, _) => Some(Message::NextTab),
            (KeyCode::BackTab, _) => Some(Message::PreviousTab),
            (KeyCode::Char(']'), _) => Some(Message::NextView),
            (KeyCode::Char('['), _) => Some(Message::PreviousView),
            (KeyCode::Char('s'), _) => Some(Message::Sort),
            (KeyCode::Char('f'), _) => Some(Message::Filter),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char('m'), _) => Some(Message::CycleMode),
            (KeyCode::Char('c'), _) => Some(Message::ClearFilters),
            (KeyCode::Char('e'), _) => Some(Message::Export),
            (KeyCode::Char('y'), _) => Some(Message::CopyCell),
            (KeyCode::Char('Y'), _) => Some(Message::CopyRow),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vim_and_arrow_keys_agree() {
        assert_eq!(Controller::handle_key(key(KeyCode::Char('j'))), Some(Message::MoveDown));
        assert_eq!(Controller::handle_key(key(KeyCode::Down)), Some(Message::MoveDown));
        assert_eq!(Controller::handle_key(key(KeyCode::Char('h'))), Some(Message::MoveLeft));
    }

    #[test]
    fn shifted_letters_differ() {
        let upper = KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert_eq!(Controller::handle_key(upper), Some(Message::CopyRow));
        assert_eq!(Controller::handle_key(key(KeyCode::Char('y'))), Some(Message::CopyCell));
    }

    #[test]
    fn ctrl_c_quits_but_c_clears() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Controller::handle_key(ctrl_c), Some(Message::Quit));
        assert_eq!(Controller::handle_key(key(KeyCode::Char('c'))), Some(Message::ClearFilters));
        assert_eq!(Controller::handle_key(key(KeyCode::F(5))), None);
    }
}
