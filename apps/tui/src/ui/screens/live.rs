use crate::alerts::RenderState;
use crate::app::App;
use crate::ui::widgets::alert_table::render_alert_table;
use ratatui::layout::Rect;
use ratatui::Frame;

pub fn render_live(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = match app.buffer.state() {
        RenderState::Idle => " Live Buffer (waiting for device) ".to_string(),
        RenderState::Rendered(count) => {
            let active = app
                .buffer
                .entries()
                .filter(|entry| entry.active == Some(true))
                .count();
            format!(
                " Live Buffer ({count} alerts, {active} active, {} of {count}) ",
                (app.buffer.selected() + 1).min(count)
            )
        }
    };

    render_alert_table(f, area, &app.buffer, &title, "No alerts in buffer");
}
