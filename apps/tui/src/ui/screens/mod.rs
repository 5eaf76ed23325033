pub mod board;
pub mod help;
pub mod live;
pub mod lockouts;
pub mod logs;
pub mod status;
