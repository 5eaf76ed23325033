use crate::app::requests::Command;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

use crate::app::input::helpers::{wrap_decrement, wrap_increment};

mod board;
mod help;
mod live;
mod lockouts;
mod logs;
mod status;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if app.commands.pending_confirmation().is_some() {
        handle_confirmation(app, key);
        return;
    }

    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.screen == AppScreen::Logs && app.search_active {
        logs::handle_search_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Live => live::handle_live_input(app, key),
        AppScreen::Logs => logs::handle_logs_input(app, key),
        AppScreen::Status => status::handle_status_input(app, key),
        AppScreen::Board => board::handle_board_input(app, key),
        AppScreen::Lockouts => lockouts::handle_lockouts_input(app, key),
    }
}

fn handle_confirmation(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_command(),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.cancel_command(),
        _ => {}
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    let count = AppScreen::ALL.len();
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => {
            let next = wrap_increment(app.screen.index(), count);
            app.set_screen(AppScreen::ALL[next]);
        }
        KeyCode::BackTab => {
            let previous = wrap_decrement(app.screen.index(), count);
            app.set_screen(AppScreen::ALL[previous]);
        }
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            if let Some(screen) = AppScreen::from_index(index) {
                app.set_screen(screen);
            }
        }
        KeyCode::Char('f') => app.request_command(Command::Flush),
        _ => return false,
    }
    true
}
