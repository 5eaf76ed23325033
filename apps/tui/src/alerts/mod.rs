// Alerts module for v1_dashboard
// Row state, map widgets, log parsing and CSV export for alert tables

pub mod export;
pub mod log_viewer;
pub mod maps;
pub mod table;

pub use log_viewer::LogViewer;
pub use table::{AlertTable, RenderOutcome, RenderState, RowKey};
