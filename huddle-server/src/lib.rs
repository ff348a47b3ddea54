pub mod api;
mod app;
mod app_state;
mod config;
mod relay;
mod room;

pub use app::*;
pub use app_state::*;
pub use config::*;
pub use relay::*;
pub use room::*;
