mod relay_channel;
mod ws_relay;

pub use relay_channel::*;
pub use ws_relay::*;
