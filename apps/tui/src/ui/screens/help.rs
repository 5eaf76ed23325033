use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 16] = [
    ("Tab / Shift+Tab", "Next / previous screen"),
    ("1-5", "Jump to Live, Logs, Status, Board, Lockouts"),
    ("↑/↓ j/k", "Move selection"),
    ("PgUp/PgDn", "Move 10 rows"),
    ("Home/End", "First / last row"),
    ("Enter / Space", "Expand or collapse an alert"),
    ("f", "Flush the buffer to a log file"),
    ("c", "Clear the buffer (Live, asks first)"),
    ("e", "Export the current table as CSV"),
    ("/", "Filter log files"),
    ("d", "Delete a log file (asks first)"),
    ("Esc", "Close the log viewer or this popup"),
    ("←/→ Space", "Pick and flip lockout filters"),
    ("r", "Refresh the current screen"),
    ("? / F1", "Toggle this help popup"),
    ("q", "Quit"),
];

pub fn render_help_popup(f: &mut Frame<'_>) {
    let popup_area = centered_rect(70, 80, f.area());
    f.render_widget(ClearWidget, popup_area);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        TextLine::from(Span::styled(
            "V1 Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from("Live alerts, archived logs and device status from the V1 companion display."),
        TextLine::from(""),
    ];
    lines.extend(SHORTCUTS.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("  {key:<16}"), key_style),
            Span::raw(*action),
        ])
    }));

    let help = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("== Help & Keyboard Shortcuts ==")
                .title_style(key_style)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(help, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
