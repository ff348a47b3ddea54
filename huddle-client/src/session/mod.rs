mod call_session;
mod session_command;
mod session_config;
mod session_context;
mod ui_event;

pub use call_session::*;
pub use session_command::*;
pub use session_config::*;
pub use session_context::*;
pub use ui_event::*;
