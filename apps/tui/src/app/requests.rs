use crate::device::models::{
    AlertEntry, BoardInfo, GpsInfo, Lockout, LogFileInfo, StorageStatus, SystemStats,
};
use crate::device::{DeviceClient, DeviceError};
use std::collections::HashMap;

/// Polled data sources. Responses of one feed are applied in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Buffer,
    Storage,
    Stats,
    Gps,
    Board,
    Lockouts,
    LogFiles,
    LogFile,
}

/// User-initiated device commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Flush,
    ClearBuffer,
    DeleteLog(String),
}

impl Command {
    pub const fn needs_confirmation(&self) -> bool {
        matches!(self, Self::ClearBuffer | Self::DeleteLog(_))
    }

    pub fn prompt(&self) -> String {
        match self {
            Self::Flush => "Flush the buffer to a log file?".to_string(),
            Self::ClearBuffer => {
                "Clear PSRAM buffer without saving? This will delete all unsaved entries!"
                    .to_string()
            }
            Self::DeleteLog(name) => format!("Delete {name}?"),
        }
    }

    /// Feed whose device-side data this command changes. Responses to polls
    /// issued before the command finished no longer describe the device.
    pub const fn invalidates(&self) -> Feed {
        match self {
            Self::Flush | Self::ClearBuffer => Feed::Buffer,
            Self::DeleteLog(_) => Feed::LogFiles,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Flush => "Flush",
            Self::ClearBuffer => "Clear buffer",
            Self::DeleteLog(_) => "Delete log",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Buffer,
    Storage,
    Stats,
    Gps,
    Board,
    Lockouts,
    LogFiles,
    LogFile(String),
    Run(Command),
}

impl Request {
    pub const fn feed(&self) -> Option<Feed> {
        match self {
            Self::Buffer => Some(Feed::Buffer),
            Self::Storage => Some(Feed::Storage),
            Self::Stats => Some(Feed::Stats),
            Self::Gps => Some(Feed::Gps),
            Self::Board => Some(Feed::Board),
            Self::Lockouts => Some(Feed::Lockouts),
            Self::LogFiles => Some(Feed::LogFiles),
            Self::LogFile(_) => Some(Feed::LogFile),
            Self::Run(_) => None,
        }
    }

    pub async fn execute(&self, client: &DeviceClient) -> Result<DeviceEvent, DeviceError> {
        let event = match self {
            Self::Buffer => DeviceEvent::Buffer(client.buffer().await?),
            Self::Storage => DeviceEvent::Storage(client.storage_status().await?),
            Self::Stats => DeviceEvent::Stats(client.stats().await?),
            Self::Gps => DeviceEvent::Gps(client.gps_info().await?),
            Self::Board => DeviceEvent::Board(client.board_info().await?),
            Self::Lockouts => DeviceEvent::Lockouts(client.lockouts().await?),
            Self::LogFiles => DeviceEvent::LogFiles(client.log_files().await?),
            Self::LogFile(name) => DeviceEvent::LogFile {
                name: name.clone(),
                text: client.log_file(name).await?,
            },
            Self::Run(command) => {
                let message = match command {
                    Command::Flush => client.flush().await?,
                    Command::ClearBuffer => client.clear_buffer().await?,
                    Command::DeleteLog(name) => {
                        client.delete_log(name).await?;
                        format!("Deleted {name}")
                    }
                };
                DeviceEvent::CommandDone {
                    command: command.clone(),
                    message,
                }
            }
        };
        Ok(event)
    }
}

#[derive(Debug, Clone)]
pub enum DeviceEvent {
    Buffer(Vec<AlertEntry>),
    Storage(StorageStatus),
    Stats(SystemStats),
    Gps(GpsInfo),
    Board(BoardInfo),
    Lockouts(Vec<Lockout>),
    LogFiles(Vec<LogFileInfo>),
    LogFile { name: String, text: String },
    CommandDone { command: Command, message: String },
}

/// Outcome of one request, delivered back to the event loop.
#[derive(Debug)]
pub struct Response {
    pub seq: u64,
    pub request: Request,
    pub outcome: Result<DeviceEvent, DeviceError>,
}

/// Drops responses that were overtaken by a newer response of the same feed.
#[derive(Debug, Default)]
pub struct FeedSequencer {
    applied: HashMap<Feed, u64>,
}

impl FeedSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `seq` for `feed` unless a later sequence number was applied.
    pub fn accept(&mut self, feed: Feed, seq: u64) -> bool {
        match self.applied.get(&feed) {
            Some(&last) if last >= seq => false,
            _ => {
                self.applied.insert(feed, seq);
                true
            }
        }
    }

    /// Raises the floor of `feed` to `seq` so older responses are dropped.
    pub fn advance(&mut self, feed: Feed, seq: u64) {
        let applied = self.applied.entry(feed).or_insert(seq);
        *applied = (*applied).max(seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_responses_are_dropped_per_feed() {
        let mut sequencer = FeedSequencer::new();

        assert!(sequencer.accept(Feed::Buffer, 3));
        assert!(!sequencer.accept(Feed::Buffer, 2));
        assert!(!sequencer.accept(Feed::Buffer, 3));
        assert!(sequencer.accept(Feed::Stats, 1));
        assert!(sequencer.accept(Feed::Buffer, 4));
    }

    #[test]
    fn advancing_a_feed_drops_responses_issued_before() {
        let mut sequencer = FeedSequencer::new();
        assert!(sequencer.accept(Feed::Buffer, 1));

        sequencer.advance(Feed::Buffer, 5);
        sequencer.advance(Feed::Buffer, 3);

        assert!(!sequencer.accept(Feed::Buffer, 4));
        assert!(!sequencer.accept(Feed::Buffer, 5));
        assert!(sequencer.accept(Feed::Buffer, 6));
        assert_eq!(Command::DeleteLog("a".into()).invalidates(), Feed::LogFiles);
    }

    #[test]
    fn only_destructive_commands_ask_first() {
        assert!(!Command::Flush.needs_confirmation());
        assert!(Command::ClearBuffer.needs_confirmation());
        assert!(Command::DeleteLog("a.jsonl".into()).needs_confirmation());
        assert_eq!(Command::DeleteLog("a.jsonl".into()).prompt(), "Delete a.jsonl?");
    }

    #[test]
    fn commands_are_not_sequenced() {
        assert_eq!(Request::Run(Command::Flush).feed(), None);
        assert_eq!(Request::LogFile("x".into()).feed(), Some(Feed::LogFile));
    }
}
