// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the app
// orchestrator, or into local ViewState edits (typing, scrolling, toggles).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{ViewState, SUGGESTIONS};
use crate::protocol::UserCommand;

/// Lines moved per PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Some terminals report both press and release; only act on presses.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits, even from the confirmation dialog.
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('l') if ctrl => Some(UserCommand::Clear),

        KeyCode::Enter => {
            // Empty input still goes to the app, which reports the validation error.
            let text = std::mem::take(&mut view_state.input);
            view_state.suggestion_index = None;
            Some(UserCommand::Submit(text))
        }

        KeyCode::Tab => {
            cycle_suggestion(view_state);
            None
        }

        KeyCode::F(2) => {
            view_state.viz_mode = view_state.viz_mode.toggled();
            None
        }
        KeyCode::F(5) => Some(UserCommand::CheckHealth),

        KeyCode::PageUp => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_add(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_sub(PAGE_SIZE);
            None
        }

        KeyCode::Esc => {
            if view_state.input.is_empty() {
                view_state.confirm_quit = true;
            } else {
                view_state.input.clear();
                view_state.suggestion_index = None;
            }
            None
        }

        KeyCode::Backspace => {
            view_state.input.pop();
            None
        }

        KeyCode::Char(c) if !ctrl && !key_event.modifiers.contains(KeyModifiers::ALT) => {
            view_state.input.push(c);
            None
        }

        _ => None,
    }
}

/// y/q confirm, n/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Replace the input with the next suggestion, wrapping around.
fn cycle_suggestion(view_state: &mut ViewState) {
    let next = match view_state.suggestion_index {
        Some(i) => (i + 1) % SUGGESTIONS.len(),
        None => 0,
    };
    view_state.suggestion_index = Some(next);
    view_state.input = SUGGESTIONS[next].to_string();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
