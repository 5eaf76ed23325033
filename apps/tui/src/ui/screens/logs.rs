use crate::app::App;
use crate::ui::widgets::alert_table::render_alert_table;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_logs(app: &App, f: &mut Frame<'_>, area: Rect) {
    if let Some(file) = app.log_viewer.current_file() {
        let table = app.log_viewer.table();
        let skipped = app.log_viewer.errors().len();
        let title = if skipped == 0 {
            format!(" {file} | {} entries ", table.len())
        } else {
            format!(" {file} | {} entries | {skipped} skipped ", table.len())
        };
        render_alert_table(f, area, table, &title, "No valid entries in this log file");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_search_box(app, f, chunks[0]);
    render_file_list(app, f, chunks[1]);
}

fn render_search_box(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border = if app.search_active {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let mut spans = vec![Span::raw(app.log_search.clone())];
    if app.search_active && (app.animation_counter * 2.0).sin() > 0.0 {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    if app.log_search.is_empty() && !app.search_active {
        spans = vec![Span::styled(
            "Press / to filter files",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_file_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    if app.filtered_log_indices.is_empty() {
        let message = if app.log_files.is_empty() {
            "No log files on the device"
        } else {
            "No files match the search"
        };
        let paragraph = Paragraph::new(message)
            .block(Block::default().title(" Log Files ").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Entries"),
        Cell::from("Size"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = app.filtered_log_indices.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_log_index);

    let rows = app
        .filtered_log_indices
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(position, &index)| {
            let file = app.log_files.get(index)?;
            let style = if position == app.selected_log_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Some(
                Row::new(vec![
                    Cell::from(file.name.clone()),
                    Cell::from(file.entries.map_or_else(|| "-".to_string(), |n| n.to_string())),
                    Cell::from(format!("{:.1} KB", file.size_kb())),
                ])
                .style(style),
            )
        });

    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Log Files ({} of {}) ",
                    app.selected_log_index + 1,
                    total_rows
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}
