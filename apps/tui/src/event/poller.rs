use crate::app::{AppScreen, Request};
use crate::config::DashboardConfig;
use std::time::{Duration, Instant};

/// Fixed-interval timer driven by the event loop's clock.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True on the first call and whenever `interval` has passed since the
    /// last firing. Firing restarts the interval.
    pub fn due(&mut self, now: Instant) -> bool {
        let fire = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if fire {
            self.last = Some(now);
        }
        fire
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Which feeds are polled, and how often, for the visible screen.
#[derive(Debug)]
pub struct PollSchedule {
    buffer: Ticker,
    storage: Ticker,
    stats: Ticker,
    gps: Ticker,
}

impl PollSchedule {
    pub const fn new(config: &DashboardConfig) -> Self {
        Self {
            buffer: Ticker::new(config.buffer_poll),
            storage: Ticker::new(config.status_poll),
            stats: Ticker::new(config.stats_poll),
            gps: Ticker::new(config.gps_poll),
        }
    }

    /// Storage is polled everywhere; the buffer only on the live screen and
    /// stats and GPS only on the status screen.
    pub fn due_requests(&mut self, screen: AppScreen, now: Instant) -> Vec<Request> {
        let mut requests = Vec::new();

        if self.storage.due(now) {
            requests.push(Request::Storage);
        }

        if screen == AppScreen::Live {
            if self.buffer.due(now) {
                requests.push(Request::Buffer);
            }
        } else {
            self.buffer.reset();
        }

        if screen == AppScreen::Status {
            if self.stats.due(now) {
                requests.push(Request::Stats);
            }
            if self.gps.due(now) {
                requests.push(Request::Gps);
            }
        } else {
            self.stats.reset();
            self.gps.reset();
        }

        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DashboardConfig {
        DashboardConfig {
            buffer_poll: Duration::from_millis(2000),
            status_poll: Duration::from_millis(5000),
            stats_poll: Duration::from_millis(2000),
            gps_poll: Duration::from_millis(5000),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn ticker_fires_immediately_then_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_secs(2));

        assert!(ticker.due(start));
        assert!(!ticker.due(start + Duration::from_millis(1999)));
        assert!(ticker.due(start + Duration::from_secs(2)));
    }

    #[test]
    fn live_screen_polls_buffer_and_storage() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(&config());

        assert_eq!(
            schedule.due_requests(AppScreen::Live, start),
            vec![Request::Storage, Request::Buffer]
        );
        assert_eq!(
            schedule.due_requests(AppScreen::Live, start + Duration::from_secs(2)),
            vec![Request::Buffer]
        );
        assert_eq!(
            schedule.due_requests(AppScreen::Live, start + Duration::from_secs(5)),
            vec![Request::Storage, Request::Buffer]
        );
    }

    #[test]
    fn status_screen_polls_stats_and_gps_only() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(&config());

        let first = schedule.due_requests(AppScreen::Status, start);
        assert_eq!(first, vec![Request::Storage, Request::Stats, Request::Gps]);

        let later = schedule.due_requests(AppScreen::Status, start + Duration::from_secs(2));
        assert_eq!(later, vec![Request::Stats]);
    }

    #[test]
    fn returning_to_live_polls_the_buffer_at_once() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(&config());
        schedule.due_requests(AppScreen::Live, start);
        schedule.due_requests(AppScreen::Board, start + Duration::from_millis(500));

        let back = schedule.due_requests(AppScreen::Live, start + Duration::from_millis(600));

        assert!(back.contains(&Request::Buffer));
    }
}
