use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::requests::Request;
use crate::app::state::App;
use crossterm::event::KeyCode;

const FILTER_TOGGLES: usize = 5;

pub fn handle_lockouts_input(app: &mut App, key: KeyCode) {
    let visible = app.visible_lockouts().len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected_lockout_index = app.selected_lockout_index.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected_lockout_index + 1 < visible {
                app.selected_lockout_index += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.lockout_filter_cursor = wrap_decrement(app.lockout_filter_cursor, FILTER_TOGGLES);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.lockout_filter_cursor = wrap_increment(app.lockout_filter_cursor, FILTER_TOGGLES);
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_lockout_filter(),
        KeyCode::Char('e') => app.export_lockouts(),
        KeyCode::Char('r') => app.queue(Request::Lockouts),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn filter_cursor_wraps_and_toggles() {
        let mut app = App::new(PathBuf::from("exports"));
        handle_lockouts_input(&mut app, KeyCode::Left);
        assert_eq!(app.lockout_filter_cursor, 4);

        handle_lockouts_input(&mut app, KeyCode::Char(' '));
        assert!(!app.lockout_filter.ka);
    }
}
