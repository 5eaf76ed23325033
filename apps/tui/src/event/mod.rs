mod loop_handler;
pub mod poller;

pub use loop_handler::{run, run_headless};
