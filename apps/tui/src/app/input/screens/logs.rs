use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::input::screens::live::handle_table_navigation;
use crate::app::requests::Request;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_logs_input(app: &mut App, key: KeyCode) {
    if app.log_viewer.is_open() {
        handle_viewer_input(app, key);
        return;
    }

    let len = app.filtered_log_indices.len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected_log_index = wrap_decrement(app.selected_log_index, len);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected_log_index = wrap_increment(app.selected_log_index, len);
        }
        KeyCode::Enter => app.open_selected_log(),
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Char('d') => app.request_delete_log(),
        KeyCode::Char('r') => app.queue(Request::LogFiles),
        KeyCode::Esc => {
            app.log_search.clear();
            app.refresh_log_filter();
        }
        _ => {}
    }
}

fn handle_viewer_input(app: &mut App, key: KeyCode) {
    if handle_table_navigation(app.log_viewer.table_mut(), key) {
        return;
    }

    match key {
        KeyCode::Esc | KeyCode::Backspace => {
            app.log_viewer.close();
            app.status_message.clear();
        }
        KeyCode::Char('d') => app.request_delete_log(),
        KeyCode::Char('e') => app.export_log(),
        _ => {}
    }
}

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => {
            app.log_search.push(c);
            app.refresh_log_filter();
        }
        KeyCode::Backspace => {
            app.log_search.pop();
            app.refresh_log_filter();
        }
        KeyCode::Enter => app.search_active = false,
        KeyCode::Esc => {
            app.search_active = false;
            app.log_search.clear();
            app.refresh_log_filter();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::requests::DeviceEvent;
    use crate::device::models::LogFileInfo;
    use std::path::PathBuf;

    fn app_with_files() -> App {
        let mut app = App::new(PathBuf::from("exports"));
        app.apply_event(DeviceEvent::LogFiles(vec![
            LogFileInfo {
                name: "one.jsonl".to_string(),
                ..LogFileInfo::default()
            },
            LogFileInfo {
                name: "two.jsonl".to_string(),
                ..LogFileInfo::default()
            },
        ]));
        app
    }

    #[test]
    fn enter_requests_the_selected_file() {
        let mut app = app_with_files();
        handle_logs_input(&mut app, KeyCode::Up);
        handle_logs_input(&mut app, KeyCode::Enter);

        assert_eq!(
            app.take_requests(),
            vec![Request::LogFile("two.jsonl".to_string())]
        );
    }

    #[test]
    fn typing_while_searching_filters() {
        let mut app = app_with_files();
        handle_logs_input(&mut app, KeyCode::Char('/'));
        for c in "two".chars() {
            handle_search_input(&mut app, KeyCode::Char(c));
        }

        assert_eq!(app.filtered_log_indices, vec![1]);
        handle_search_input(&mut app, KeyCode::Esc);
        assert_eq!(app.filtered_log_indices.len(), 2);
        assert!(!app.search_active);
    }

    #[test]
    fn escape_closes_the_viewer() {
        let mut app = app_with_files();
        app.apply_event(DeviceEvent::LogFile {
            name: "one.jsonl".to_string(),
            text: "{\"ts\":1,\"lat\":1.0,\"lon\":2.0}\n".to_string(),
        });
        handle_logs_input(&mut app, KeyCode::Enter);
        assert_eq!(app.log_viewer.table().maps().live_count(), 1);

        handle_logs_input(&mut app, KeyCode::Esc);

        assert!(!app.log_viewer.is_open());
        assert_eq!(app.log_viewer.table().maps().live_count(), 0);
    }
}
