use crate::alerts::maps::LocationMap;
use crate::alerts::table::AlertRow;
use crate::alerts::AlertTable;
use crate::domain::{format_timestamp_local, frequency_display};
use crate::ui::widgets::radar::band_color;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

const SELECTED_BG: Color = Color::Rgb(0, 0, 238);

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn summary_row(row: &AlertRow) -> Row<'static> {
    let entry = &row.entry;
    let marker = if row.expanded { "▾" } else { "▸" };
    let status = match entry.active {
        Some(true) => "Active",
        Some(false) => "Inactive",
        None => "-",
    };

    Row::new(vec![
        Cell::from(marker),
        Cell::from(
            entry
                .timestamp
                .map_or_else(|| "-".to_string(), format_timestamp_local),
        ),
        Cell::from(entry.band().as_str()),
        Cell::from(entry.frequency.map_or_else(|| "-".to_string(), frequency_display)),
        Cell::from(or_dash(entry.direction_label())),
        Cell::from(or_dash(entry.strength)),
        Cell::from(or_dash(entry.counter)),
        Cell::from(status),
    ])
}

fn detail_row(row: &AlertRow) -> Row<'static> {
    let entry = &row.entry;
    let (lat, lon) = entry.coordinates_or_origin();
    Row::new(vec![
        Cell::from("↳"),
        Cell::from(format!("{lat:.6}, {lon:.6}")),
        Cell::from(entry.speed.map_or_else(|| "-".to_string(), |s| format!("{s} mph"))),
        Cell::from(format!("Course {}", or_dash(entry.sector()))),
    ])
    .style(Style::default().fg(Color::Gray))
}

/// Summary rows with their detail rows inlined under expanded entries; the
/// selected entry's map is drawn beside the table when it has one.
pub fn render_alert_table(
    f: &mut Frame<'_>,
    area: Rect,
    table: &AlertTable,
    title: &str,
    empty_message: &str,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if table.is_empty() {
        let paragraph = Paragraph::new(empty_message.to_string())
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let selected_map = table
        .selected_row()
        .filter(|row| row.expanded)
        .and_then(|row| table.map_for(&row.key));

    let (table_area, map_area) = match selected_map {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        None => (area, None),
    };

    let mut lines = Vec::new();
    let mut selected_line = 0;
    for (index, row) in table.rows().iter().enumerate() {
        let selected = index == table.selected();
        if selected {
            selected_line = lines.len();
        }

        let style = if selected {
            Style::default()
                .bg(SELECTED_BG)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if row.fresh {
            Style::default()
                .fg(band_color(row.entry.band()))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(band_color(row.entry.band()))
        };
        lines.push(summary_row(row).style(style));

        if row.expanded {
            lines.push(detail_row(row));
        }
    }

    let max_visible_rows = table_area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(lines.len(), max_visible_rows, selected_line);
    let visible = lines.into_iter().skip(offset).take(max_visible_rows);

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Time"),
        Cell::from("Band"),
        Cell::from("Frequency"),
        Cell::from("Dir"),
        Cell::from("Str"),
        Cell::from("Cnt"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(1),
        Constraint::Length(22),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(8),
    ];

    let widget = Table::new(visible, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(widget, table_area);

    if let (Some(map), Some(map_area)) = (selected_map, map_area) {
        render_location_map(f, map_area, map, table.selected_row());
    }
}

fn render_location_map(f: &mut Frame<'_>, area: Rect, map: &LocationMap, row: Option<&AlertRow>) {
    let popup_height = (map.popup.len() as u16 + 2).min(area.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(popup_height)])
        .split(area);

    let color = row.map_or(Color::White, |row| band_color(row.entry.band()));
    let (x_bounds, y_bounds) = map.bounds();
    let coords = [(map.longitude, map.latitude)];

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(format!(" Map #{} (zoom {}) ", map.id, map.zoom))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color,
            });
            ctx.print(map.longitude, map.latitude, TextLine::from(" ●"));
        });
    f.render_widget(canvas, chunks[0]);

    let popup = Paragraph::new(
        map.popup
            .iter()
            .map(|line| TextLine::from(line.clone()))
            .collect::<Vec<_>>(),
    )
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    f.render_widget(popup, chunks[1]);
}
