//! Keyboard event handling for the comparison viewer.
//!
//! Vim-style navigation along the alignment:
//! - `h` / `l`: move left / right
//! - `0` or `Home`: go to first column
//! - `$` or `End`: go to last column
//! - `n` / `N`: jump to next / previous mutation
//! - `PageUp` / `PageDown`: move one screen width
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the viewer
//!   - `:<number>`: go to column

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    Quit,
    MoveLeft,
    MoveRight,
    GotoFirstColumn,
    GotoLastColumn,
    PageLeft,
    PageRight,
    NextMutation,
    PreviousMutation,
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    ExecuteCommand,
    CancelCommand,
    CommandBackspace,
    /// Terminal resized
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current mode.
pub fn handle_event(event: Event, mode: &AppMode) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

fn handle_key_event(key: KeyEvent, mode: &AppMode) -> Action {
    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) => handle_command_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::MoveLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::MoveRight,

        KeyCode::Char('0') | KeyCode::Home => Action::GotoFirstColumn,
        KeyCode::Char('$') | KeyCode::End => Action::GotoLastColumn,

        KeyCode::PageUp => Action::PageLeft,
        KeyCode::PageDown => Action::PageRight,

        KeyCode::Char('n') => Action::NextMutation,
        KeyCode::Char('N') => Action::PreviousMutation,

        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the viewer state.
///
/// Returns `true` if the viewer should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => state.should_quit = true,
        Action::MoveLeft => state.move_left(),
        Action::MoveRight => state.move_right(),
        Action::GotoFirstColumn => state.goto_first_column(),
        Action::GotoLastColumn => state.goto_last_column(),
        Action::PageLeft => state.page_left(),
        Action::PageRight => state.page_right(),
        Action::NextMutation => state.next_mutation(),
        Action::PreviousMutation => state.previous_mutation(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::CommandChar(c) => state.command_input(c),
        Action::ExecuteCommand => state.execute_command(),
        Action::CancelCommand => state.cancel_command(),
        Action::CommandBackspace => state.command_backspace(),
        Action::Resize(_, _) => {
            // Resize is handled in the main loop with actual terminal dimensions
        }
    }

    !state.should_quit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::compare;

    #[test]
    fn test_normal_mode_navigation() {
        let mode = AppMode::Normal;

        let key = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::MoveLeft);

        let key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::MoveRight);

        let key = KeyEvent::new(KeyCode::End, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::GotoLastColumn);

        let key = KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::PageRight);
    }

    #[test]
    fn test_mutation_jumps() {
        let mode = AppMode::Normal;

        let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::NextMutation);

        let key = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(key, &mode), Action::PreviousMutation);
    }

    #[test]
    fn test_command_mode_input() {
        let mode = AppMode::Command(String::new());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::CommandChar('q'));

        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::ExecuteCommand);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key, &mode), Action::CancelCommand);
    }

    #[test]
    fn test_ctrl_c_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key, &AppMode::Normal), Action::Quit);
    }

    #[test]
    fn test_resize_event() {
        assert_eq!(handle_event(Event::Resize(80, 24), &AppMode::Normal), Action::Resize(80, 24));
    }

    #[test]
    fn test_apply_quit_command() {
        let comparison = compare("ATGC", "ATGA").unwrap();
        let mut state = AppState::new(comparison, "ref", "var");

        assert!(apply_action(&mut state, Action::EnterCommandMode));
        assert!(apply_action(&mut state, Action::CommandChar('q')));
        assert!(!apply_action(&mut state, Action::ExecuteCommand));
    }
}
