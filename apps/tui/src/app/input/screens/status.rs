use crate::app::requests::Request;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_status_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Char('r') {
        app.queue(Request::Storage);
        app.queue(Request::Stats);
        app.queue(Request::Gps);
    }
}
