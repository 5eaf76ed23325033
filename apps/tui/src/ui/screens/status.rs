use crate::app::App;
use crate::device::models::{GpsInfo, StorageStatus, SystemStats};
use crate::domain::{format_uptime, FixQuality, UsageLevel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

const fn usage_color(level: UsageLevel) -> Color {
    match level {
        UsageLevel::Normal => Color::Green,
        UsageLevel::Elevated => Color::Yellow,
        UsageLevel::Critical => Color::Red,
    }
}

const fn fix_color(quality: FixQuality) -> Color {
    match quality {
        FixQuality::Good => Color::Green,
        FixQuality::Moderate => Color::Yellow,
        FixQuality::Fair => Color::LightRed,
        FixQuality::Poor => Color::Red,
    }
}

fn field(label: &str, value: String) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("{label:<14}"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(columns[0]);

    render_storage(app.storage.as_ref(), app.stats.as_ref(), f, left[0]);
    render_system(app.stats.as_ref(), f, left[1]);
    render_gps(app.gps.as_ref(), f, columns[1]);
}

fn render_storage(
    storage: Option<&StorageStatus>,
    stats: Option<&SystemStats>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = Block::default()
        .title(" Storage ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let Some(storage) = storage else {
        f.render_widget(Paragraph::new("Waiting for /api/status..."), rows[0]);
        return;
    };

    f.render_widget(
        Paragraph::new(field("PSRAM entries", or_na(storage.psram_entries))),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(field(
            "PSRAM free",
            storage
                .psram_free_kb
                .map_or_else(|| "N/A".to_string(), |kb| format!("{kb} KB")),
        )),
        rows[1],
    );

    let fs = match (storage.fs_used_kb, storage.fs_total_kb) {
        (Some(used), Some(total)) if total > 0 => Some((used, total)),
        _ => None,
    };
    f.render_widget(
        Paragraph::new(field(
            "Filesystem",
            fs.map_or_else(|| "N/A".to_string(), |(used, total)| format!("{used} / {total} KB")),
        )),
        rows[2],
    );
    if let Some((used, total)) = fs {
        render_usage_gauge(f, rows[3], "FS", used as f64 / total as f64 * 100.0);
    }
    if let Some(percent) = stats.and_then(SystemStats::storage_usage_percent) {
        render_usage_gauge(f, rows[4], "Storage", percent);
    }
}

fn render_usage_gauge(f: &mut Frame<'_>, area: Rect, label: &str, percent: f64) {
    let color = usage_color(UsageLevel::from_percent(percent));
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{label} {percent:.1}%"));
    f.render_widget(gauge, area);
}

fn render_system(stats: Option<&SystemStats>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" System ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(stats) = stats else {
        f.render_widget(Paragraph::new("Waiting for /stats..."), inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let lines = vec![
        field("Board", or_na(stats.board_type.clone())),
        field("Uptime", or_na(stats.uptime.map(format_uptime))),
        field(
            "CPU",
            format!(
                "{} MHz x{} ({} busy)",
                or_na(stats.frequency),
                or_na(stats.cpu_cores),
                stats
                    .cpu_busy
                    .map_or_else(|| "N/A".to_string(), |busy| format!("{busy:.1}%"))
            ),
        ),
        field("WiFi RSSI", rssi(stats.wifi_rssi)),
        field("BT RSSI", rssi(stats.bluetooth_rssi)),
    ];
    f.render_widget(Paragraph::new(lines), chunks[0]);

    if let Some(heap) = stats.heap_usage_percent() {
        render_usage_gauge(f, chunks[1], "Heap", heap);
    }
    match stats.psram_usage_percent() {
        Some(psram) => render_usage_gauge(f, chunks[2], "PSRAM", psram),
        None => f.render_widget(
            Paragraph::new(Span::styled(
                "No PSRAM",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2],
        ),
    }
}

fn rssi(value: Option<i64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |dbm| format!("{dbm} dBm"))
}

fn render_gps(gps: Option<&GpsInfo>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" GPS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(gps) = gps else {
        f.render_widget(Paragraph::new("Waiting for /gps-info...").block(block), area);
        return;
    };

    let fix = if gps.has_fix() {
        Span::styled("FIX", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("NO FIX", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    };

    let quality = gps.hdop.map(FixQuality::from_hdop);
    let hdop_line = TextLine::from(vec![
        Span::styled(
            format!("{:<14}", "HDOP"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        match (gps.hdop, quality) {
            (Some(hdop), Some(quality)) => Span::styled(
                format!("{hdop:.1} ({})", quality.label()),
                Style::default().fg(fix_color(quality)),
            ),
            _ => Span::raw("N/A"),
        },
    ]);

    let lines = vec![
        TextLine::from(fix),
        TextLine::from(""),
        field(
            "Position",
            match (gps.latitude, gps.longitude) {
                (Some(lat), Some(lon)) => format!("{lat:.6}, {lon:.6}"),
                _ => "N/A".to_string(),
            },
        ),
        hdop_line,
        field("Satellites", or_na(gps.satellite_count)),
        field(
            "Speed",
            gps.speed
                .map_or_else(|| "N/A".to_string(), |speed| format!("{speed:.1} mph")),
        ),
        field("Course", or_na(gps.course.map(|course| format!("{course}°")))),
        TextLine::from(""),
        field(
            "Battery",
            gps.battery_percent.map_or_else(
                || "N/A".to_string(),
                |percent| {
                    let charging = gps.battery_charging.as_deref().unwrap_or("");
                    format!("{percent:.0}% {charging}").trim_end().to_string()
                },
            ),
        ),
        field(
            "CPU",
            gps.cpu
                .map_or_else(|| "N/A".to_string(), |cpu| format!("{}%", cpu.floor())),
        ),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
