pub mod alert_table;
pub mod popup;
pub mod radar;
pub mod tables;
