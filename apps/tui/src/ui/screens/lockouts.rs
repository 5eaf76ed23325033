use crate::app::App;
use crate::device::models::LockoutFilter;
use crate::domain::{format_timestamp_local, frequency_display};
use crate::ui::widgets::radar::band_color;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

fn toggles(filter: &LockoutFilter) -> [(&'static str, bool); 5] {
    [
        ("Auto", filter.auto),
        ("Manual", filter.manual),
        ("X", filter.x),
        ("K", filter.k),
        ("Ka", filter.ka),
    ]
}

pub fn render_lockouts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_filter_bar(app, f, chunks[0]);
    render_lockout_table(app, f, chunks[1]);
}

fn render_filter_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();
    for (index, (label, enabled)) in toggles(&app.lockout_filter).into_iter().enumerate() {
        let check = if enabled { "[x]" } else { "[ ]" };
        let mut style = if enabled {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if index == app.lockout_filter_cursor {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!("{check} {label}"), style));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Filter ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, area);
}

fn render_lockout_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let visible = app.visible_lockouts();
    let title = format!(" Lockouts ({} of {}) ", visible.len(), app.lockouts.len());

    if visible.is_empty() {
        let message = if app.lockouts.is_empty() {
            "No lockouts stored on the device"
        } else {
            "No lockouts match the filter"
        };
        let paragraph = Paragraph::new(message)
            .block(Block::default().title(title).borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Type"),
        Cell::from("Band"),
        Cell::from("Frequency"),
        Cell::from("Location"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(visible.len(), max_visible_rows, app.selected_lockout_index);

    let rows = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, lockout)| {
            let band = lockout.band();
            let style = if index == app.selected_lockout_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(band_color(band))
            };
            let location = match (lockout.latitude, lockout.longitude) {
                (Some(lat), Some(lon)) => format!("{lat:.6}, {lon:.6}"),
                _ => "-".to_string(),
            };
            Row::new(vec![
                Cell::from(
                    lockout
                        .timestamp
                        .map_or_else(|| "-".to_string(), format_timestamp_local),
                ),
                Cell::from(lockout.kind.map_or("-", |kind| kind.as_str())),
                Cell::from(band.as_str()),
                Cell::from(
                    lockout
                        .frequency
                        .map_or_else(|| "-".to_string(), frequency_display),
                ),
                Cell::from(location),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(22),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Min(22),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .column_spacing(1);
    f.render_widget(table, area);
}
