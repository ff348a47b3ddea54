mod chat;
mod media;
mod relay;
mod room;
mod session;
mod signaling;
mod transport;

pub use chat::*;
pub use media::*;
pub use relay::*;
pub use room::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;

pub use huddle_core::{CallError, model};
