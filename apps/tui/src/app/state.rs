use crate::alerts::export::{
    alerts_to_csv, export_file_name, lockouts_to_csv, write_export,
};
use crate::alerts::{AlertTable, LogViewer};
use crate::app::commands::{CommandEvent, CommandMachine};
use crate::app::requests::{Command, DeviceEvent, FeedSequencer, Request, Response};
use crate::device::models::{
    BoardInfo, GpsInfo, Lockout, LockoutFilter, LogFileInfo, StorageStatus, SystemStats,
};
use crate::device::DeviceError;
use chrono::Utc;
use color_eyre::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Live,
    Logs,
    Status,
    Board,
    Lockouts,
}

impl AppScreen {
    pub const ALL: [Self; 5] = [
        Self::Live,
        Self::Logs,
        Self::Status,
        Self::Board,
        Self::Lockouts,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Logs => "Logs",
            Self::Status => "Status",
            Self::Board => "Board",
            Self::Lockouts => "Lockouts",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Live => 0,
            Self::Logs => 1,
            Self::Status => 2,
            Self::Board => 3,
            Self::Lockouts => 4,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Live),
            1 => Some(Self::Logs),
            2 => Some(Self::Status),
            3 => Some(Self::Board),
            4 => Some(Self::Lockouts),
            _ => None,
        }
    }
}

/// Reachability of the device as seen by the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Online,
    Offline,
}

impl LinkState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub status_message: String,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub screen: AppScreen,
    pub link: LinkState,
    pub last_error: Option<String>,
    pub buffer: AlertTable,
    pub log_files: Vec<LogFileInfo>,
    pub filtered_log_indices: Vec<usize>,
    pub selected_log_index: usize,
    pub log_search: String,
    pub search_active: bool,
    pub log_viewer: LogViewer,
    pub storage: Option<StorageStatus>,
    pub stats: Option<SystemStats>,
    pub gps: Option<GpsInfo>,
    pub board: Option<BoardInfo>,
    pub board_scroll: usize,
    pub lockouts: Vec<Lockout>,
    pub lockout_filter: LockoutFilter,
    pub lockout_filter_cursor: usize,
    pub selected_lockout_index: usize,
    pub commands: CommandMachine,
    pub export_dir: PathBuf,
    sequencer: FeedSequencer,
    pending: Vec<Request>,
}

impl App {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            running: true,
            show_help: false,
            status_message: String::new(),
            animation_counter: 0.0,
            last_frame: Instant::now(),
            screen: AppScreen::Live,
            link: LinkState::Connecting,
            last_error: None,
            buffer: AlertTable::new(),
            log_files: Vec::new(),
            filtered_log_indices: Vec::new(),
            selected_log_index: 0,
            log_search: String::new(),
            search_active: false,
            log_viewer: LogViewer::new(),
            storage: None,
            stats: None,
            gps: None,
            board: None,
            board_scroll: 0,
            lockouts: Vec::new(),
            lockout_filter: LockoutFilter::default(),
            lockout_filter_cursor: 0,
            selected_lockout_index: 0,
            commands: CommandMachine::new(),
            export_dir,
            sequencer: FeedSequencer::new(),
            pending: Vec::new(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // One sweep revolution every ~3 seconds.
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    pub fn queue(&mut self, request: Request) {
        if !self.pending.contains(&request) {
            self.pending.push(request);
        }
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending)
    }

    /// Switches tabs and fetches what the new screen shows right away.
    pub fn set_screen(&mut self, screen: AppScreen) {
        if self.screen == screen {
            return;
        }
        tracing::debug!(from = self.screen.title(), to = screen.title(), "screen change");
        self.screen = screen;
        match screen {
            AppScreen::Live => self.queue(Request::Buffer),
            AppScreen::Logs => self.queue(Request::LogFiles),
            AppScreen::Status => {
                self.queue(Request::Storage);
                self.queue(Request::Stats);
                self.queue(Request::Gps);
            }
            AppScreen::Board => {
                if self.board.is_none() {
                    self.queue(Request::Board);
                }
            }
            AppScreen::Lockouts => self.queue(Request::Lockouts),
        }
    }

    pub fn apply_response(&mut self, response: Response) {
        let Response {
            seq,
            request,
            outcome,
        } = response;

        if let Some(feed) = request.feed() {
            if !self.sequencer.accept(feed, seq) {
                tracing::debug!(?feed, seq, "dropping stale response");
                return;
            }
        }

        match outcome {
            Ok(event) => {
                if request.feed().is_some() {
                    self.link = LinkState::Online;
                    self.last_error = None;
                }
                if let Request::Run(command) = &request {
                    self.sequencer.advance(command.invalidates(), seq);
                }
                self.apply_event(event);
            }
            Err(err) => self.apply_failure(&request, &err),
        }
    }

    fn apply_failure(&mut self, request: &Request, err: &DeviceError) {
        if let Request::Run(command) = request {
            tracing::error!(command = command.label(), error = %err, "device command failed");
            self.finish_command();
            self.status_message = format!("{} failed: {err}", command.label());
            return;
        }

        tracing::warn!(?request, error = %err, "poll failed, keeping last data");
        if err.is_network() {
            self.link = LinkState::Offline;
        }
        if matches!(request, Request::LogFile(_)) {
            self.status_message = format!("Error loading log file: {err}");
        }
        self.last_error = Some(err.to_string());
    }

    pub fn apply_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Buffer(entries) => {
                self.buffer.apply_snapshot(entries);
            }
            DeviceEvent::Storage(storage) => self.storage = Some(storage),
            DeviceEvent::Stats(stats) => self.stats = Some(stats),
            DeviceEvent::Gps(gps) => self.gps = Some(gps),
            DeviceEvent::Board(board) => {
                self.board = Some(board);
                self.board_scroll = 0;
            }
            DeviceEvent::Lockouts(lockouts) => {
                self.lockouts = lockouts;
                self.clamp_lockout_selection();
            }
            DeviceEvent::LogFiles(files) => {
                self.log_files = files;
                self.refresh_log_filter();
            }
            DeviceEvent::LogFile { name, text } => {
                self.log_viewer.open(&name, &text);
                let skipped = self.log_viewer.errors().len();
                self.status_message = if skipped == 0 {
                    format!("Viewing {name}")
                } else {
                    format!("Viewing {name} ({skipped} malformed lines skipped)")
                };
            }
            DeviceEvent::CommandDone { command, message } => {
                tracing::info!(command = command.label(), %message, "device command finished");
                self.finish_command();
                self.status_message = message;
                match &command {
                    Command::ClearBuffer => self.buffer.clear(),
                    Command::DeleteLog(name) => {
                        if self.log_viewer.current_file() == Some(name.as_str()) {
                            self.log_viewer.close();
                        }
                    }
                    Command::Flush => {}
                }
                self.queue(Request::Storage);
                self.queue(Request::LogFiles);
                self.queue(Request::Buffer);
            }
        }
    }

    fn finish_command(&mut self) {
        if let Err(err) = self.commands.process(CommandEvent::Finished) {
            tracing::warn!(error = %err, "command finished without running");
        }
    }

    pub fn request_command(&mut self, command: Command) {
        match self.commands.process(CommandEvent::Request(command.clone())) {
            Ok(Some(start)) => self.start_command(start),
            Ok(None) => self.status_message = format!("{} (y/n)", command.prompt()),
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                self.status_message = "Another command is still running".to_string();
            }
        }
    }

    pub fn confirm_command(&mut self) {
        match self.commands.process(CommandEvent::Confirm) {
            Ok(Some(start)) => self.start_command(start),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "nothing to confirm"),
        }
    }

    pub fn cancel_command(&mut self) {
        if self.commands.process(CommandEvent::Cancel).is_ok() {
            self.status_message = "Cancelled".to_string();
        }
    }

    fn start_command(&mut self, command: Command) {
        self.status_message = format!("{}...", command.label());
        self.queue(Request::Run(command));
    }

    /// Re-runs the fuzzy filter over the file list, best match first.
    pub fn refresh_log_filter(&mut self) {
        let query = self.log_search.trim();
        if query.is_empty() {
            self.filtered_log_indices = (0..self.log_files.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = self
                .log_files
                .iter()
                .enumerate()
                .filter_map(|(index, file)| {
                    matcher
                        .fuzzy_match(&file.name, query)
                        .map(|score| (score, index))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.filtered_log_indices = scored.into_iter().map(|(_, index)| index).collect();
        }

        if self.selected_log_index >= self.filtered_log_indices.len() {
            self.selected_log_index = self.filtered_log_indices.len().saturating_sub(1);
        }
    }

    pub fn selected_log_file(&self) -> Option<&LogFileInfo> {
        self.filtered_log_indices
            .get(self.selected_log_index)
            .and_then(|&index| self.log_files.get(index))
    }

    pub fn open_selected_log(&mut self) {
        if let Some(name) = self.selected_log_file().map(|file| file.name.clone()) {
            self.status_message = format!("Loading {name}...");
            self.queue(Request::LogFile(name));
        }
    }

    /// Deletes the file open in the viewer, or the selected one in the list.
    pub fn request_delete_log(&mut self) {
        let target = self
            .log_viewer
            .current_file()
            .map(str::to_string)
            .or_else(|| self.selected_log_file().map(|file| file.name.clone()));
        if let Some(name) = target {
            self.request_command(Command::DeleteLog(name));
        }
    }

    pub fn visible_lockouts(&self) -> Vec<&Lockout> {
        self.lockouts
            .iter()
            .filter(|lockout| self.lockout_filter.matches(lockout))
            .collect()
    }

    pub fn toggle_lockout_filter(&mut self) {
        self.lockout_filter.toggle(self.lockout_filter_cursor);
        self.clamp_lockout_selection();
    }

    fn clamp_lockout_selection(&mut self) {
        let visible = self.visible_lockouts().len();
        if self.selected_lockout_index >= visible {
            self.selected_lockout_index = visible.saturating_sub(1);
        }
    }

    pub fn export_buffer(&mut self) {
        let csv = alerts_to_csv(self.buffer.entries());
        let name = export_file_name("buffer", Utc::now());
        self.report_export(write_export(&self.export_dir, &name, &csv));
    }

    pub fn export_log(&mut self) {
        let Some(file) = self.log_viewer.current_file() else {
            return;
        };
        let scope = Path::new(file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("log")
            .to_string();
        let csv = alerts_to_csv(self.log_viewer.table().entries());
        let name = export_file_name(&scope, Utc::now());
        self.report_export(write_export(&self.export_dir, &name, &csv));
    }

    pub fn export_lockouts(&mut self) {
        let csv = lockouts_to_csv(self.visible_lockouts());
        let name = export_file_name("lockouts", Utc::now());
        self.report_export(write_export(&self.export_dir, &name, &csv));
    }

    fn report_export(&mut self, written: Result<PathBuf>) {
        match written {
            Ok(path) => self.status_message = format!("Exported {}", path.display()),
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                self.status_message = format!("Export failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::models::{AlertEntry, LockoutKind};

    fn app() -> App {
        App::new(std::env::temp_dir().join("v1-dashboard-state-tests"))
    }

    fn entries(count: usize) -> Vec<AlertEntry> {
        (0..count)
            .map(|i| AlertEntry {
                timestamp: Some(1_700_000_000 + i as i64),
                frequency: Some(24_150),
                counter: Some(1),
                ..AlertEntry::default()
            })
            .collect()
    }

    fn ok(seq: u64, request: Request, event: DeviceEvent) -> Response {
        Response {
            seq,
            request,
            outcome: Ok(event),
        }
    }

    fn offline(seq: u64, request: Request) -> Response {
        Response {
            seq,
            request,
            outcome: Err(DeviceError::HttpStatus {
                endpoint: "/api/buffer".to_string(),
                status: 503,
            }),
        }
    }

    #[test]
    fn stale_buffer_response_is_ignored() {
        let mut app = app();
        app.apply_response(ok(2, Request::Buffer, DeviceEvent::Buffer(entries(3))));
        app.apply_response(ok(1, Request::Buffer, DeviceEvent::Buffer(entries(1))));

        assert_eq!(app.buffer.len(), 3);
    }

    #[test]
    fn buffer_poll_sent_before_a_clear_is_ignored() {
        let mut app = app();
        app.apply_response(ok(1, Request::Buffer, DeviceEvent::Buffer(entries(2))));
        app.request_command(Command::ClearBuffer);
        app.confirm_command();
        assert_eq!(app.take_requests(), vec![Request::Run(Command::ClearBuffer)]);

        app.apply_response(ok(
            3,
            Request::Run(Command::ClearBuffer),
            DeviceEvent::CommandDone {
                command: Command::ClearBuffer,
                message: "Buffer cleared".to_string(),
            },
        ));
        assert_eq!(app.buffer.len(), 0);

        app.apply_response(ok(2, Request::Buffer, DeviceEvent::Buffer(entries(3))));
        assert_eq!(app.buffer.len(), 0);

        app.apply_response(ok(4, Request::Buffer, DeviceEvent::Buffer(entries(1))));
        assert_eq!(app.buffer.len(), 1);
    }

    #[test]
    fn poll_failure_keeps_last_data_and_goes_offline() {
        let mut app = app();
        app.apply_response(ok(1, Request::Buffer, DeviceEvent::Buffer(entries(2))));
        assert_eq!(app.link, LinkState::Online);

        app.apply_response(offline(2, Request::Buffer));

        assert_eq!(app.link, LinkState::Offline);
        assert_eq!(app.buffer.len(), 2);
        assert!(app.last_error.is_some());
        assert!(app.running);
    }

    #[test]
    fn clearing_the_buffer_needs_confirmation() {
        let mut app = app();
        app.request_command(Command::ClearBuffer);
        assert!(app.take_requests().is_empty());
        assert!(app.status_message.ends_with("(y/n)"));

        app.confirm_command();

        assert_eq!(
            app.take_requests(),
            vec![Request::Run(Command::ClearBuffer)]
        );
    }

    #[test]
    fn flush_starts_immediately_and_refreshes_after() {
        let mut app = app();
        app.request_command(Command::Flush);
        assert_eq!(app.take_requests(), vec![Request::Run(Command::Flush)]);

        app.apply_response(ok(
            7,
            Request::Run(Command::Flush),
            DeviceEvent::CommandDone {
                command: Command::Flush,
                message: "Flushed 12 entries".to_string(),
            },
        ));

        assert_eq!(app.status_message, "Flushed 12 entries");
        assert_eq!(
            app.take_requests(),
            vec![Request::Storage, Request::LogFiles, Request::Buffer]
        );
        assert!(!app.commands.is_running());
    }

    #[test]
    fn second_command_is_rejected_while_one_runs() {
        let mut app = app();
        app.request_command(Command::Flush);
        app.take_requests();

        app.request_command(Command::Flush);

        assert!(app.take_requests().is_empty());
        assert_eq!(app.status_message, "Another command is still running");
    }

    #[test]
    fn failed_command_reports_and_unlocks() {
        let mut app = app();
        app.request_command(Command::Flush);
        app.take_requests();

        app.apply_response(offline(3, Request::Run(Command::Flush)));

        assert!(app.status_message.starts_with("Flush failed"));
        assert!(!app.commands.is_running());
    }

    #[test]
    fn deleting_the_open_file_closes_the_viewer() {
        let mut app = app();
        app.apply_event(DeviceEvent::LogFile {
            name: "a.jsonl".to_string(),
            text: "{\"ts\":1}\n".to_string(),
        });
        assert!(app.log_viewer.is_open());

        app.request_delete_log();
        app.confirm_command();
        assert_eq!(
            app.take_requests(),
            vec![Request::Run(Command::DeleteLog("a.jsonl".to_string()))]
        );
        app.apply_event(DeviceEvent::CommandDone {
            command: Command::DeleteLog("a.jsonl".to_string()),
            message: "Deleted a.jsonl".to_string(),
        });

        assert!(!app.log_viewer.is_open());
        assert!(app.take_requests().contains(&Request::LogFiles));
    }

    #[test]
    fn fuzzy_filter_narrows_the_file_list() {
        let mut app = app();
        app.apply_event(DeviceEvent::LogFiles(
            ["alerts-0101.jsonl", "alerts-0202.jsonl", "gps.txt"]
                .into_iter()
                .map(|name| LogFileInfo {
                    name: name.to_string(),
                    ..LogFileInfo::default()
                })
                .collect(),
        ));
        assert_eq!(app.filtered_log_indices.len(), 3);

        app.log_search = "0202".to_string();
        app.refresh_log_filter();

        assert_eq!(
            app.selected_log_file().map(|file| file.name.as_str()),
            Some("alerts-0202.jsonl")
        );
        assert_eq!(app.filtered_log_indices.len(), 1);
    }

    #[test]
    fn entering_lockouts_fetches_them() {
        let mut app = app();
        app.set_screen(AppScreen::Lockouts);
        assert_eq!(app.take_requests(), vec![Request::Lockouts]);

        app.set_screen(AppScreen::Lockouts);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn lockout_filter_hides_manual_entries() {
        let mut app = app();
        app.apply_event(DeviceEvent::Lockouts(vec![
            Lockout {
                kind: Some(LockoutKind::Auto),
                frequency: Some(10_525),
                ..Lockout::default()
            },
            Lockout {
                kind: Some(LockoutKind::Manual),
                frequency: Some(24_150),
                ..Lockout::default()
            },
        ]));
        app.selected_lockout_index = 1;

        app.lockout_filter_cursor = 1;
        app.toggle_lockout_filter();

        assert_eq!(app.visible_lockouts().len(), 1);
        assert_eq!(app.selected_lockout_index, 0);
    }

    #[test]
    fn buffer_export_lands_in_the_export_dir() {
        let dir = std::env::temp_dir().join(format!("v1-export-{}", std::process::id()));
        let mut app = App::new(dir.clone());
        app.apply_event(DeviceEvent::Buffer(entries(2)));

        app.export_buffer();

        assert!(app.status_message.starts_with("Exported"));
        let written = std::fs::read_dir(&dir)
            .map(|files| files.count())
            .unwrap_or_default();
        assert_eq!(written, 1);
        let _ = std::fs::remove_dir_all(dir);
    }
}
