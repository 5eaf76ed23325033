use crate::alerts::table::{AlertTable, RenderOutcome};
use crate::device::models::AlertEntry;

/// A log line that could not be decoded. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLineError {
    pub line: usize,
    pub message: String,
}

/// Parses newline-delimited JSON. Bad lines are skipped and reported, blank
/// lines ignored, and missing coordinates default to 0.
pub fn parse_log_lines(text: &str) -> (Vec<AlertEntry>, Vec<LogLineError>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<AlertEntry>(line) {
            Ok(mut entry) => {
                entry.latitude.get_or_insert(0.0);
                entry.longitude.get_or_insert(0.0);
                entries.push(entry);
            }
            Err(err) => {
                tracing::error!(line = index + 1, error = %err, "skipping malformed log line");
                errors.push(LogLineError {
                    line: index + 1,
                    message: err.to_string(),
                });
            }
        }
    }

    (entries, errors)
}

/// An archived log file opened for viewing.
#[derive(Debug, Default)]
pub struct LogViewer {
    file: Option<String>,
    table: AlertTable,
    errors: Vec<LogLineError>,
}

impl LogViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the viewer contents. Always rebuilds from scratch, even at the
    /// same count; rows of a freshly opened file start collapsed.
    pub fn open(&mut self, file: &str, text: &str) -> RenderOutcome {
        self.table.clear();
        let (entries, errors) = parse_log_lines(text);
        tracing::info!(
            file,
            entries = entries.len(),
            skipped = errors.len(),
            "log file opened"
        );
        self.file = Some(file.to_string());
        self.errors = errors;
        self.table.rebuild(entries)
    }

    /// Disposes every map of the viewer and forgets the file.
    pub fn close(&mut self) {
        self.table.clear();
        self.errors.clear();
        self.file = None;
    }

    pub fn current_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub const fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub const fn table(&self) -> &AlertTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut AlertTable {
        &mut self.table
    }

    pub fn errors(&self) -> &[LogLineError] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::table::RenderState;

    const THREE_LINES: &str = concat!(
        r#"{"ts":1700000000,"lat":40.1,"lon":-74.2,"freq":24150,"cnt":1}"#,
        "\n",
        r#"{"ts":1700000001,"lat":"#,
        "\n",
        r#"{"ts":1700000002,"freq":3012,"cnt":2}"#,
        "\n"
    );

    #[test]
    fn malformed_line_is_skipped_and_reported() {
        let (entries, errors) = parse_log_lines(THREE_LINES);

        assert_eq!(entries.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn missing_coordinates_default_to_zero() {
        let (entries, _) = parse_log_lines(THREE_LINES);

        assert_eq!(entries[1].latitude, Some(0.0));
        assert_eq!(entries[1].longitude, Some(0.0));
        assert_eq!(entries[0].latitude, Some(40.1));
    }

    #[test]
    fn blank_lines_are_not_errors() {
        let (entries, errors) = parse_log_lines("\n  \n{\"ts\":1}\n\n");
        assert_eq!(entries.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn opening_always_rebuilds() {
        let mut viewer = LogViewer::new();
        viewer.open("a.jsonl", THREE_LINES);
        viewer.table_mut().toggle(0);

        let outcome = viewer.open("b.jsonl", THREE_LINES);

        assert!(matches!(outcome, RenderOutcome::Rebuilt { .. }));
        assert_eq!(viewer.current_file(), Some("b.jsonl"));
        assert_eq!(viewer.table().state(), RenderState::Rendered(2));
        assert_eq!(viewer.table().maps().disposed(), 1);
        assert_eq!(viewer.table().maps().live_count(), 0);
        assert!(!viewer.table().rows()[0].expanded);
    }

    #[test]
    fn close_disposes_maps_and_forgets_the_file() {
        let mut viewer = LogViewer::new();
        viewer.open("a.jsonl", THREE_LINES);
        viewer.table_mut().toggle(1);

        viewer.close();

        assert!(!viewer.is_open());
        assert_eq!(viewer.table().maps().live_count(), 0);
        assert_eq!(viewer.table().maps().disposed(), 1);
        assert!(viewer.errors().is_empty());
    }
}
