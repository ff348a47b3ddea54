use huddle_core::{IceCandidate, Username};

/// Lifecycle of the underlying peer connection, as reported by the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events a peer transport produces for the session loop.
///
/// `generation` identifies the link incarnation that produced the event;
/// the coordinator drops events from links it has since closed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A local ICE candidate that must reach the remote side through the relay.
    CandidateGenerated {
        peer: Username,
        generation: u64,
        candidate: IceCandidate,
    },

    StateChanged {
        peer: Username,
        generation: u64,
        state: PeerConnectionState,
    },
}
