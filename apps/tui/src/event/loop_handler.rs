use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::alerts::export::alerts_to_csv;
use crate::app::{handle_input, App, AppActions, Request, Response};
use crate::config::DashboardConfig;
use crate::device::models::{AlertEntry, StorageStatus, SystemStats};
use crate::device::DeviceClient;
use crate::domain::{format_timestamp_utc, format_uptime, frequency_display, Band};
use crate::event::poller::PollSchedule;
use crate::ui;

/// Fetch status, stats and the buffer once and print a summary.
pub async fn run_headless(client: &DeviceClient, json: bool, export: Option<&Path>) -> Result<()> {
    let (storage, stats, buffer) =
        tokio::join!(client.storage_status(), client.stats(), client.buffer());

    if let (Err(storage_err), Err(_), Err(_)) = (&storage, &stats, &buffer) {
        return Err(eyre!(
            "device at {} is unreachable: {storage_err}",
            client.base_url()
        ));
    }

    let storage = storage
        .inspect_err(|err| tracing::warn!(error = %err, "storage status unavailable"))
        .ok();
    let stats = stats
        .inspect_err(|err| tracing::warn!(error = %err, "system stats unavailable"))
        .ok();
    let entries = buffer.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "alert buffer unavailable");
        Vec::new()
    });

    if let Some(path) = export {
        write_csv(path, &alerts_to_csv(&entries))?;
        tracing::info!(path = %path.display(), entries = entries.len(), "buffer exported");
    }

    let summary = build_summary(client.base_url(), storage.as_ref(), stats.as_ref(), &entries);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn write_csv(path: &Path, csv: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv)
        .map_err(|e| eyre!("cannot write export {}: {e}", path.display()))
}

fn print_summary(summary: &HeadlessSummary) {
    println!("\nV1 Dashboard");
    println!("============");
    println!("Device: {}", summary.device);

    if let Some(uptime) = &summary.uptime {
        println!("Uptime: {uptime}");
    }
    if let Some(heap) = summary.heap_usage_percent {
        println!("Heap usage: {heap:.1}%");
    }
    if let Some(rssi) = summary.wifi_rssi {
        println!("WiFi RSSI: {rssi} dBm");
    }
    if let Some(entries) = summary.psram_entries {
        println!("PSRAM buffer entries: {entries}");
    }
    if let (Some(used), Some(total)) = (summary.fs_used_kb, summary.fs_total_kb) {
        println!("Filesystem: {used} / {total} KB");
    }

    println!("\nBuffered alerts: {} ({} active)", summary.total_alerts, summary.active_alerts);
    for (band, count) in &summary.by_band {
        println!("- {band}: {count}");
    }

    if let Some(latest) = &summary.latest {
        let frequency = latest
            .frequency
            .map_or_else(|| "N/A".to_string(), frequency_display);
        println!(
            "\nLatest: {} | {} | {} | {}",
            latest.time, latest.band, frequency, latest.direction
        );
    }
}

pub(crate) fn build_summary(
    device: &str,
    storage: Option<&StorageStatus>,
    stats: Option<&SystemStats>,
    entries: &[AlertEntry],
) -> HeadlessSummary {
    let by_band = Band::ALL
        .iter()
        .map(|band| {
            let count = entries
                .iter()
                .filter(|entry| entry.frequency.is_some() && entry.band() == *band)
                .count();
            (band.as_str().to_string(), count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let latest = entries
        .iter()
        .max_by_key(|entry| entry.timestamp.unwrap_or(i64::MIN))
        .map(|entry| HeadlessAlert {
            time: entry
                .timestamp
                .and_then(format_timestamp_utc)
                .unwrap_or_else(|| "N/A".to_string()),
            band: entry.band().as_str().to_string(),
            frequency: entry.frequency,
            direction: entry
                .direction_label()
                .map_or_else(|| "N/A".to_string(), |label| label.to_string()),
        });

    HeadlessSummary {
        device: device.to_string(),
        uptime: stats.and_then(|stats| stats.uptime).map(format_uptime),
        heap_usage_percent: stats.and_then(SystemStats::heap_usage_percent),
        wifi_rssi: stats.and_then(|stats| stats.wifi_rssi),
        psram_entries: storage.and_then(|storage| storage.psram_entries),
        fs_used_kb: storage.and_then(|storage| storage.fs_used_kb),
        fs_total_kb: storage.and_then(|storage| storage.fs_total_kb),
        total_alerts: entries.len(),
        active_alerts: entries
            .iter()
            .filter(|entry| entry.active == Some(true))
            .count(),
        by_band,
        latest,
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct HeadlessSummary {
    device: String,
    uptime: Option<String>,
    heap_usage_percent: Option<f64>,
    wifi_rssi: Option<i64>,
    psram_entries: Option<u64>,
    fs_used_kb: Option<u64>,
    fs_total_kb: Option<u64>,
    total_alerts: usize,
    active_alerts: usize,
    by_band: Vec<(String, usize)>,
    latest: Option<HeadlessAlert>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessAlert {
    time: String,
    band: String,
    frequency: Option<i64>,
    direction: String,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &mut AppActions,
    responses: &mut UnboundedReceiver<Response>,
    config: &DashboardConfig,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut schedule = PollSchedule::new(config);
    app.queue(Request::Board);

    loop {
        app.update();

        while let Ok(response) = responses.try_recv() {
            app.apply_response(response);
        }

        for request in schedule.due_requests(app.screen, Instant::now()) {
            app.queue(request);
        }
        actions.dispatch_all(app.take_requests());

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if let Err(e) = terminal.autoresize() {
                        tracing::warn!(error = %e, "resize failed");
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "terminal event read failed"),
            }
        }
    }

    tracing::info!("dashboard closed");
    Ok(())
}
