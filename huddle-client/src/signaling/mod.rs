mod peer_link;
mod signaling_coordinator;

pub use peer_link::*;
pub use signaling_coordinator::*;
