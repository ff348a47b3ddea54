pub mod model;

mod error;

pub use error::CallError;
pub use model::{
    CandidateBlob, IceCandidate, IceServerConfig, MediaState, RelayEvent, RoomCode, SdpBlob,
    SdpKind, SessionDescription, Username,
};
