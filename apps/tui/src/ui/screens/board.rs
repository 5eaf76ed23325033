use crate::app::App;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_board(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(board) = &app.board else {
        let paragraph = Paragraph::new("Board information not loaded yet (r to retry)")
            .block(Block::default().title(" Board ").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let identity = |name: &str, value: Option<&str>| {
        TextLine::from(vec![
            Span::styled(format!("{name:<10}"), label),
            Span::raw(value.unwrap_or("N/A").to_string()),
        ])
    };
    let lines = vec![
        TextLine::from(Span::styled(
            format!("{} {}", board.manufacturer(), board.model()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        identity("Serial", board.serial.as_deref()),
        identity("Software", board.software_version.as_deref()),
        identity("Hardware", board.hardware_version.as_deref()),
        identity("Firmware", board.firmware_version.as_deref()),
    ];
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Detector ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        chunks[0],
    );

    let config = board.config_rows();
    let max_visible_rows = chunks[1].height.saturating_sub(3) as usize;
    let offset = scroll_offset(config.len(), max_visible_rows, app.board_scroll);

    let rows = config
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .map(|row| Row::new(vec![Cell::from(row.key.clone()), Cell::from(row.value.clone())]));

    let header = Row::new(vec![Cell::from("Setting"), Cell::from("Value")]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(header)
        .block(
            Block::default()
                .title(format!(" Configuration ({} settings) ", config.len()))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[1]);
}
