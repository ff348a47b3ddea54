use crate::media::LocalTracks;
use crate::session::SessionContext;
use crate::signaling::{BufferedCandidate, PeerLink, SignalingState};
use crate::transport::{PeerConnectionState, PeerConnector, TransportEvent};
use huddle_core::{
    CallError, CandidateBlob, IceCandidate, RelayEvent, RoomCode, SdpBlob, SdpKind, Username,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Drives the offer/answer/ICE exchange for every remote participant of one room.
///
/// The member already present when someone joins sends the offer. On glare the
/// larger username keeps its offer and the smaller one answers.
pub struct SignalingCoordinator {
    ctx: SessionContext,
    room_code: RoomCode,
    tracks: LocalTracks,
    connector: Arc<dyn PeerConnector>,
    events_tx: mpsc::Sender<TransportEvent>,
    links: HashMap<Username, PeerLink>,
    next_generation: u64,
}

impl SignalingCoordinator {
    pub fn new(
        ctx: SessionContext,
        room_code: RoomCode,
        tracks: LocalTracks,
        connector: Arc<dyn PeerConnector>,
        events_tx: mpsc::Sender<TransportEvent>,
    ) -> Self {
        Self {
            ctx,
            room_code,
            tracks,
            connector,
            events_tx,
            links: HashMap::new(),
            next_generation: 0,
        }
    }

    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    pub fn state_of(&self, peer: &Username) -> Option<SignalingState> {
        self.links.get(peer).map(PeerLink::state)
    }

    pub fn link(&self, peer: &Username) -> Option<&PeerLink> {
        self.links.get(peer)
    }

    /// A participant joined after us: we are the initiator.
    pub async fn on_participant_joined(
        &mut self,
        peer: &Username,
    ) -> Result<SignalingState, CallError> {
        let pending = self.retire(peer).await;
        let mut link = self.open_link(peer, SignalingState::OfferSent).await?;
        link.restore_pending(pending);

        let offer = link.transport()?.create_offer().await;
        let offer = match offer {
            Ok(offer) => offer,
            Err(e) => return Err(self.fail(link, e).await),
        };
        let event = RelayEvent::Offer {
            room_code: self.room_code.clone(),
            sender: self.ctx.username().clone(),
            offer: SdpBlob::from(offer),
            target: Some(peer.clone()),
            generation: Some(link.generation),
        };
        if let Err(e) = self.ctx.publish(event).await {
            return Err(self.fail(link, e).await);
        }

        info!("Sent offer to {} (generation {})", peer, link.generation);
        self.links.insert(peer.clone(), link);
        Ok(SignalingState::OfferSent)
    }

    /// `generation` is the sender's link generation, when the offer was tagged with one.
    pub async fn on_offer_received(
        &mut self,
        sender: &Username,
        offer: SdpBlob,
        generation: Option<u64>,
    ) -> Result<SignalingState, CallError> {
        let desc = match offer.into_description(SdpKind::Offer) {
            Ok(desc) => desc,
            Err(reason) => {
                warn!("Malformed offer from {}: {}", sender, reason);
                self.close_peer(sender).await;
                return Err(CallError::protocol(sender, reason));
            }
        };

        let existing = self.state_of(sender);
        if existing == Some(SignalingState::OfferSent) && self.ctx.username() > sender {
            info!("Glare with {}: keeping our offer", sender);
            return Ok(SignalingState::OfferSent);
        }

        match existing {
            Some(SignalingState::OfferSent) => info!("Glare with {}: answering their offer", sender),
            Some(state) if state.is_negotiated() => {
                info!("{} restarted negotiation from {:?}", sender, state)
            }
            _ => {}
        }

        let pending = self.retire(sender).await;
        let mut link = self.open_link(sender, SignalingState::OfferReceived).await?;
        link.restore_pending(pending);
        link.set_remote_generation(generation);

        let applied = link.transport()?.set_remote_description(desc).await;
        if let Err(e) = applied {
            return Err(self
                .fail(link, CallError::protocol(sender, e.to_string()))
                .await);
        }
        link.remote_description_set = true;
        link.flush_pending().await;

        let answer = link.transport()?.create_answer().await;
        let answer = match answer {
            Ok(answer) => answer,
            Err(e) => return Err(self.fail(link, e).await),
        };
        let event = RelayEvent::Answer {
            room_code: self.room_code.clone(),
            sender: self.ctx.username().clone(),
            answer: SdpBlob::from(answer),
            target: Some(sender.clone()),
            generation: Some(link.generation),
        };
        if let Err(e) = self.ctx.publish(event).await {
            return Err(self.fail(link, e).await);
        }

        link.state = SignalingState::AnswerSent;
        info!("Answered {} (generation {})", sender, link.generation);
        self.links.insert(sender.clone(), link);
        Ok(SignalingState::AnswerSent)
    }

    /// Only valid while our offer is outstanding. An out-of-place answer is
    /// reported but leaves the link alone.
    pub async fn on_answer_received(
        &mut self,
        sender: &Username,
        answer: SdpBlob,
        generation: Option<u64>,
    ) -> Result<SignalingState, CallError> {
        let Some(link) = self.links.get_mut(sender) else {
            return Err(CallError::protocol(sender, "answer without an offer"));
        };
        if link.state != SignalingState::OfferSent {
            warn!("Ignoring answer from {} in state {:?}", sender, link.state);
            return Err(CallError::protocol(
                sender,
                format!("unexpected answer in state {:?}", link.state),
            ));
        }

        let desc = match answer.into_description(SdpKind::Answer) {
            Ok(desc) => desc,
            Err(reason) => {
                warn!("Malformed answer from {}: {}", sender, reason);
                link.close().await;
                return Err(CallError::protocol(sender, reason));
            }
        };

        let applied = link.transport()?.set_remote_description(desc).await;
        if let Err(e) = applied {
            link.close().await;
            return Err(CallError::protocol(sender, e.to_string()));
        }

        link.remote_description_set = true;
        link.state = SignalingState::AnswerReceived;
        link.set_remote_generation(generation);
        link.flush_pending().await;
        info!("Applied answer from {}", sender);
        Ok(SignalingState::AnswerReceived)
    }

    /// Candidates tagged with a generation other than the one our link negotiated
    /// with belong to a link the sender has since replaced, and are dropped.
    pub async fn on_ice_candidate_received(
        &mut self,
        sender: &Username,
        candidate: CandidateBlob,
        generation: Option<u64>,
    ) -> Result<SignalingState, CallError> {
        let candidate = match candidate.into_candidate() {
            Ok(candidate) => candidate,
            Err(reason) => {
                warn!("Malformed candidate from {}: {}", sender, reason);
                self.close_peer(sender).await;
                return Err(CallError::protocol(sender, reason));
            }
        };

        let cap = self.buffer_cap();
        let link = self.links.entry(sender.clone()).or_insert_with(|| {
            debug!("Parking early candidate from {}", sender);
            PeerLink::idle(sender.clone(), cap)
        });

        if link.is_closed() {
            debug!("Dropping candidate for closed link to {}", sender);
            return Ok(SignalingState::Closed);
        }
        if !link.accepts(generation) {
            debug!(
                "Dropping candidate from replaced link of {} (generation {:?})",
                sender, generation
            );
            return Ok(link.state);
        }
        if !link.remote_description_set {
            link.buffer_candidate(candidate, generation);
            return Ok(link.state);
        }

        if let Err(e) = link.transport()?.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate from {}: {}", sender, e);
        }
        Ok(link.state)
    }

    /// Forwards a candidate gathered by our side of the link, unless it belongs
    /// to a closed or replaced incarnation.
    pub async fn on_local_ice_candidate(
        &mut self,
        peer: &Username,
        generation: u64,
        candidate: IceCandidate,
    ) -> Result<(), CallError> {
        let Some(link) = self.links.get(peer) else {
            return Ok(());
        };
        if link.generation != generation || link.is_closed() {
            debug!("Dropping stale local candidate for {}", peer);
            return Ok(());
        }

        self.ctx
            .publish(RelayEvent::IceCandidate {
                room_code: self.room_code.clone(),
                sender: self.ctx.username().clone(),
                candidate: candidate.into(),
                target: Some(peer.clone()),
                generation: Some(generation),
            })
            .await
    }

    /// Returns the new link state when the change is relevant to this incarnation.
    pub async fn on_connection_state_changed(
        &mut self,
        peer: &Username,
        generation: u64,
        state: PeerConnectionState,
    ) -> Option<SignalingState> {
        let link = self.links.get_mut(peer)?;
        if link.generation != generation || link.is_closed() {
            return None;
        }

        match state {
            PeerConnectionState::Connected => {
                info!("Connected to {}", peer);
                link.state = SignalingState::Connected;
                Some(SignalingState::Connected)
            }
            PeerConnectionState::Disconnected
            | PeerConnectionState::Failed
            | PeerConnectionState::Closed => {
                warn!("Connection to {} went {:?}", peer, state);
                link.close().await;
                Some(SignalingState::Closed)
            }
            PeerConnectionState::New | PeerConnectionState::Connecting => None,
        }
    }

    /// Closes links that have not connected within the configured timeout.
    pub async fn check_timeouts(&mut self, now: Instant) -> Vec<Username> {
        let timeout = self.ctx.config().connect_timeout;
        let mut expired = Vec::new();

        for link in self.links.values_mut() {
            if link.transport.is_none()
                || matches!(
                    link.state,
                    SignalingState::Connected | SignalingState::Closed
                )
            {
                continue;
            }
            if now.saturating_duration_since(link.opened_at) >= timeout {
                warn!("Connection to {} timed out in {:?}", link.peer, link.state);
                link.close().await;
                expired.push(link.peer.clone());
            }
        }

        expired.sort();
        expired
    }

    pub async fn close_peer(&mut self, peer: &Username) {
        if let Some(link) = self.links.get_mut(peer) {
            link.close().await;
        }
    }

    /// Closes the link and forgets it, so a later join starts from scratch.
    pub async fn remove_peer(&mut self, peer: &Username) {
        if let Some(mut link) = self.links.remove(peer) {
            link.close().await;
        }
    }

    pub async fn close_all(&mut self) {
        for link in self.links.values_mut() {
            link.close().await;
        }
        info!("Closed all peer links in {}", self.room_code);
    }

    fn buffer_cap(&self) -> usize {
        self.ctx.config().candidate_buffer_cap
    }

    async fn open_link(
        &mut self,
        peer: &Username,
        state: SignalingState,
    ) -> Result<PeerLink, CallError> {
        self.next_generation += 1;
        let generation = self.next_generation;

        let transport = self
            .connector
            .open(peer, generation, &self.tracks, self.events_tx.clone())
            .await
            .inspect_err(|e| warn!("Failed to open connection to {}: {}", peer, e))?;

        debug!("Opened link to {} (generation {})", peer, generation);
        Ok(PeerLink::open(
            peer.clone(),
            generation,
            state,
            transport,
            self.buffer_cap(),
        ))
    }

    /// Drops the current link to `peer`, handing back candidates it was still holding.
    async fn retire(&mut self, peer: &Username) -> VecDeque<BufferedCandidate> {
        let Some(mut link) = self.links.remove(peer) else {
            return VecDeque::new();
        };
        let pending = link.take_pending();
        link.close().await;
        pending
    }

    /// Closes a half-built link and keeps it as the peer's closed link.
    async fn fail(&mut self, mut link: PeerLink, err: CallError) -> CallError {
        warn!("Negotiation with {} failed: {}", link.peer, err);
        link.close().await;
        self.links.insert(link.peer.clone(), link);
        err
    }
}
