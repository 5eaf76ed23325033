// Application state, device requests and key handling

pub mod actions;
pub mod commands;
pub mod input;
pub mod requests;
pub mod state;

pub use actions::AppActions;
pub use input::handle_input;
pub use requests::{Command, Request, Response};
pub use state::{App, AppScreen, LinkState};
