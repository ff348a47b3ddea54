mod peer_transport;
mod transport_config;
mod transport_event;
mod webrtc_connector;

pub use peer_transport::*;
pub use transport_config::*;
pub use transport_event::*;
pub use webrtc_connector::*;
