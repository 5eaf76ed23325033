use crate::app::requests::Request;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_board_input(app: &mut App, key: KeyCode) {
    let rows = app.board.as_ref().map_or(0, |board| board.config_rows().len());
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.board_scroll = app.board_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            if app.board_scroll + 1 < rows {
                app.board_scroll += 1;
            }
        }
        KeyCode::Char('r') => app.queue(Request::Board),
        _ => {}
    }
}
