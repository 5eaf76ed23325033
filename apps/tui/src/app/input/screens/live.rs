use crate::alerts::AlertTable;
use crate::app::input::helpers::PAGE;
use crate::app::requests::Command;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_live_input(app: &mut App, key: KeyCode) {
    if handle_table_navigation(&mut app.buffer, key) {
        return;
    }

    match key {
        KeyCode::Char('c') => app.request_command(Command::ClearBuffer),
        KeyCode::Char('e') => app.export_buffer(),
        _ => {}
    }
}

/// Movement and expansion keys shared by the buffer and the log viewer.
pub fn handle_table_navigation(table: &mut AlertTable, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => table.select_previous(1),
        KeyCode::Down | KeyCode::Char('j') => table.select_next(1),
        KeyCode::PageUp => table.select_previous(PAGE),
        KeyCode::PageDown => table.select_next(PAGE),
        KeyCode::Home => table.select_first(),
        KeyCode::End => table.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            table.toggle_selected();
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::models::AlertEntry;
    use std::path::PathBuf;

    #[test]
    fn enter_expands_the_selected_alert() {
        let mut app = App::new(PathBuf::from("exports"));
        app.buffer.apply_snapshot(vec![
            AlertEntry {
                timestamp: Some(1),
                ..AlertEntry::default()
            },
            AlertEntry {
                timestamp: Some(2),
                ..AlertEntry::default()
            },
        ]);

        handle_live_input(&mut app, KeyCode::Down);
        handle_live_input(&mut app, KeyCode::Enter);

        assert!(app.buffer.rows()[1].expanded);
        assert_eq!(app.buffer.maps().live_count(), 1);
    }
}
