//! Event Loop Module
//!
//! Handles keyboard events for the operator session. The four terminal
//! actions end the session immediately: F12 submits the edited reply
//! (empty text allowed), F1 declares cannot-answer, F2 internal error,
//! F3 forbidden.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::SessionApp;
use hal_core::reply::ReplyOutcome;

/// Action to take after handling an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopAction {
    /// Continue the event loop
    Continue,
    /// Break out of the event loop
    Break,
}

/// Handle key events
pub fn handle_key_event(app: &mut SessionApp, key: KeyEvent) -> LoopAction {
    // Terminal actions first; each ends the session instantly.
    match key.code {
        KeyCode::F(12) => {
            app.decide(ReplyOutcome::Success(app.input.clone()));
            return LoopAction::Break;
        }
        KeyCode::F(1) => {
            app.decide(ReplyOutcome::CannotAnswer);
            return LoopAction::Break;
        }
        KeyCode::F(2) => {
            app.decide(ReplyOutcome::InternalError);
            return LoopAction::Break;
        }
        KeyCode::F(3) => {
            app.decide(ReplyOutcome::Forbidden);
            return LoopAction::Break;
        }
        _ => {}
    }

    match key.code {
        // Control key shortcuts must come before KeyCode::Char(c)
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor_home();
            LoopAction::Continue
        }
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor_end();
            LoopAction::Continue
        }
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.kill_to_end();
            LoopAction::Continue
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.kill_to_start();
            LoopAction::Continue
        }
        KeyCode::Char(c) => {
            app.enter_char(c);
            LoopAction::Continue
        }
        KeyCode::Enter => {
            app.enter_char('\n');
            LoopAction::Continue
        }
        KeyCode::Backspace => {
            app.delete_char();
            LoopAction::Continue
        }
        KeyCode::Delete => {
            app.delete_at_cursor();
            LoopAction::Continue
        }
        KeyCode::Left => {
            app.move_cursor_left();
            LoopAction::Continue
        }
        KeyCode::Right => {
            app.move_cursor_right();
            LoopAction::Continue
        }
        KeyCode::Home => {
            app.move_cursor_home();
            LoopAction::Continue
        }
        KeyCode::End => {
            app.move_cursor_end();
            LoopAction::Continue
        }
        KeyCode::Up | KeyCode::PageUp => {
            app.scroll_transcript_up();
            LoopAction::Continue
        }
        KeyCode::Down | KeyCode::PageDown => {
            app.scroll_transcript_down();
            LoopAction::Continue
        }
        _ => LoopAction::Continue,
    }
}
