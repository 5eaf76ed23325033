// Rendering: header with tabs and radar, one screen per tab, status line

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen, LinkState};
use crate::ui::widgets::popup::render_confirm_popup;
use crate::ui::widgets::radar::{radar_contacts, render_mini_radar};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header
            Constraint::Min(5),    // Screen
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_header(app, f, layout[0]);

    match app.screen {
        AppScreen::Live => screens::live::render_live(app, f, layout[1]),
        AppScreen::Logs => screens::logs::render_logs(app, f, layout[1]),
        AppScreen::Status => screens::status::render_status(app, f, layout[1]),
        AppScreen::Board => screens::board::render_board(app, f, layout[1]),
        AppScreen::Lockouts => screens::lockouts::render_lockouts(app, f, layout[1]),
    }

    render_status_section(app, f, layout[2]);
    render_shortcuts(app, f, layout[3]);

    if app.show_help {
        screens::help::render_help_popup(f);
    } else if let Some(command) = app.commands.pending_confirmation() {
        render_confirm_popup(f, &command.prompt());
    }
}

const fn link_color(link: LinkState) -> Color {
    match link {
        LinkState::Connecting => Color::Yellow,
        LinkState::Online => Color::Green,
        LinkState::Offline => Color::Red,
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== V1 Dashboard ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(12)])
        .split(inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(chunks[0]);

    let mut device_line = vec![
        Span::styled("● ", Style::default().fg(link_color(app.link))),
        Span::styled(
            app.link.label(),
            Style::default()
                .fg(link_color(app.link))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(board) = &app.board {
        device_line.push(Span::raw(format!(
            "   {} {}",
            board.manufacturer(),
            board.model()
        )));
    }
    if app.commands.is_running() {
        device_line.push(Span::styled(
            "   working...",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(TextLine::from(device_line)), rows[0]);

    let titles = AppScreen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| format!("{} {}", i + 1, screen.title()));
    let tabs = Tabs::new(titles)
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");
    f.render_widget(tabs, rows[2]);

    let contacts = radar_contacts(app.buffer.entries());
    render_mini_radar(f, chunks[1], app.animation_counter, &contacts);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let (text, style) = if app.status_message.is_empty() {
        app.last_error.as_ref().map_or_else(
            || (String::new(), Style::default().fg(Color::Gray)),
            |error| (format!("Last poll failed: {error}"), Style::default().fg(Color::Red)),
        )
    } else {
        let lower = app.status_message.to_ascii_lowercase();
        let style = if lower.contains("failed") || lower.contains("error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        (app.status_message.clone(), style)
    };

    let paragraph = Paragraph::new(Span::styled(text, style))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let keys: &[(&str, &str)] = match app.screen {
        AppScreen::Live => &[("Enter", "Expand"), ("c", "Clear"), ("e", "Export")],
        AppScreen::Logs if app.log_viewer.is_open() => {
            &[("Enter", "Expand"), ("d", "Delete"), ("e", "Export"), ("Esc", "Close")]
        }
        AppScreen::Logs => &[("Enter", "Open"), ("/", "Search"), ("d", "Delete")],
        AppScreen::Status | AppScreen::Board => &[("r", "Refresh")],
        AppScreen::Lockouts => &[("←/→", "Filter"), ("Space", "Toggle"), ("e", "Export")],
    };

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled("Tab", key_style), Span::raw(": Screen   ")];
    for (key, label) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(": {label}   ")));
    }
    spans.extend([
        Span::styled("f", key_style),
        Span::raw(": Flush   "),
        Span::styled("?", key_style),
        Span::raw(": Help   "),
        Span::styled("q", key_style),
        Span::raw(": Quit"),
    ]);

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
