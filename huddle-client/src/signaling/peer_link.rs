use crate::transport::PeerTransport;
use huddle_core::{CallError, IceCandidate, Username};
use std::collections::VecDeque;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Negotiation progress of one [`PeerLink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalingState {
    Idle,
    OfferSent,
    OfferReceived,
    AnswerSent,
    AnswerReceived,
    Connected,
    Closed,
}

impl SignalingState {
    /// Whether a local offer or answer has been produced and the link now waits on the network.
    pub fn is_negotiated(&self) -> bool {
        matches!(
            self,
            Self::AnswerSent | Self::AnswerReceived | Self::Connected
        )
    }
}

/// A remote candidate waiting for the remote description, with the sender's
/// link generation when it was tagged.
#[derive(Debug, Clone)]
pub(crate) struct BufferedCandidate {
    pub(crate) candidate: IceCandidate,
    pub(crate) generation: Option<u64>,
}

/// One negotiated (or negotiating) connection to a remote participant.
///
/// A link with no transport is a placeholder holding candidates that arrived
/// before the peer's offer.
pub struct PeerLink {
    pub(crate) peer: Username,
    pub(crate) generation: u64,
    pub(crate) state: SignalingState,
    pub(crate) transport: Option<Box<dyn PeerTransport>>,
    pub(crate) remote_description_set: bool,
    remote_generation: Option<u64>,
    pending_candidates: VecDeque<BufferedCandidate>,
    cap: usize,
    pub(crate) opened_at: Instant,
}

impl PeerLink {
    pub(crate) fn idle(peer: Username, cap: usize) -> Self {
        Self {
            peer,
            generation: 0,
            state: SignalingState::Idle,
            transport: None,
            remote_description_set: false,
            remote_generation: None,
            pending_candidates: VecDeque::new(),
            cap,
            opened_at: Instant::now(),
        }
    }

    pub(crate) fn open(
        peer: Username,
        generation: u64,
        state: SignalingState,
        transport: Box<dyn PeerTransport>,
        cap: usize,
    ) -> Self {
        Self {
            peer,
            generation,
            state,
            transport: Some(transport),
            remote_description_set: false,
            remote_generation: None,
            pending_candidates: VecDeque::new(),
            cap,
            opened_at: Instant::now(),
        }
    }

    pub fn peer(&self) -> &Username {
        &self.peer
    }

    pub fn state(&self) -> SignalingState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_len(&self) -> usize {
        self.pending_candidates.len()
    }

    /// Generation of the remote link whose offer or answer we applied.
    pub fn remote_generation(&self) -> Option<u64> {
        self.remote_generation
    }

    /// Untagged candidates, or any candidate before the remote side is known, are accepted.
    pub(crate) fn accepts(&self, generation: Option<u64>) -> bool {
        same_incarnation(self.remote_generation, generation)
    }

    /// Pins the remote incarnation and drops buffered candidates from any other.
    pub(crate) fn set_remote_generation(&mut self, generation: Option<u64>) {
        self.remote_generation = generation;
        let before = self.pending_candidates.len();
        self.pending_candidates
            .retain(|buffered| same_incarnation(generation, buffered.generation));
        let dropped = before - self.pending_candidates.len();
        if dropped > 0 {
            debug!(
                "Dropped {} buffered candidates from a replaced link of {}",
                dropped, self.peer
            );
        }
    }

    pub(crate) fn transport(&self) -> Result<&dyn PeerTransport, CallError> {
        self.transport
            .as_deref()
            .ok_or_else(|| CallError::PeerConnection(format!("no transport for {}", self.peer)))
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state == SignalingState::Closed
    }

    /// Queues a candidate until the remote description is applied. Oldest is dropped at capacity.
    pub(crate) fn buffer_candidate(&mut self, candidate: IceCandidate, generation: Option<u64>) {
        if self.pending_candidates.len() >= self.cap {
            warn!(
                "Candidate buffer for {} full ({}), dropping oldest",
                self.peer, self.cap
            );
            self.pending_candidates.pop_front();
        }
        self.pending_candidates.push_back(BufferedCandidate {
            candidate,
            generation,
        });
    }

    pub(crate) fn take_pending(&mut self) -> VecDeque<BufferedCandidate> {
        std::mem::take(&mut self.pending_candidates)
    }

    pub(crate) fn restore_pending(&mut self, pending: VecDeque<BufferedCandidate>) {
        for buffered in pending {
            self.buffer_candidate(buffered.candidate, buffered.generation);
        }
    }

    /// Applies every buffered candidate in arrival order. Failures are logged and skipped.
    pub(crate) async fn flush_pending(&mut self) -> usize {
        if self.transport.is_none() {
            return 0;
        }
        let pending = self.take_pending();
        let count = pending.len();
        let Some(transport) = self.transport.as_deref() else {
            return 0;
        };

        for buffered in pending {
            if let Err(e) = transport.add_ice_candidate(buffered.candidate).await {
                warn!("Failed to apply buffered candidate from {}: {}", self.peer, e);
            }
        }
        if count > 0 {
            debug!("Flushed {} buffered candidates for {}", count, self.peer);
        }
        count
    }

    /// Marks the link closed and shuts its transport. Idempotent.
    pub(crate) async fn close(&mut self) {
        self.state = SignalingState::Closed;
        self.remote_description_set = false;
        self.remote_generation = None;
        self.pending_candidates.clear();

        let Some(transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.close().await {
            warn!("Error closing transport for {}: {}", self.peer, e);
        }
    }
}

fn same_incarnation(remote: Option<u64>, candidate: Option<u64>) -> bool {
    match (remote, candidate) {
        (Some(remote), Some(candidate)) => remote == candidate,
        _ => true,
    }
}
