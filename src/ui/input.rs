use crate::ui::message::AppMessage;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys that work whenever the search view does not claim them.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Esc, _) => Some(AppMessage::Quit),
            (KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('['), _) => {
                Some(AppMessage::PreviousPage)
            }
            (KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']'), _) => {
                Some(AppMessage::NextPage)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_paging_and_quit_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('l'))), Some(AppMessage::NextPage));
        assert_eq!(InputHandler::handle_key(key(KeyCode::Left)), Some(AppMessage::PreviousPage));
        assert_eq!(InputHandler::handle_key(key(KeyCode::Esc)), Some(AppMessage::Quit));
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppMessage::Quit)
        );
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('x'))), None);
    }
}
