pub mod api;

mod ice;
mod media;
mod relay;
mod room_code;
mod signaling;
mod username;

pub use ice::IceServerConfig;
pub use media::MediaState;
pub use relay::RelayEvent;
pub use room_code::{MAX_ROOM_CODE_LEN, ROOM_CODE_LEN, RoomCode};
pub use signaling::{CandidateBlob, IceCandidate, SdpBlob, SdpKind, SessionDescription};
pub use username::Username;
