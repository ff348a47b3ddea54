use crate::chat::ChatStream;
use crate::media::{MediaController, MediaDevices};
use crate::relay::RelayChannel;
use crate::room::{ConnectionStatus, IdentityProvider, RoomAllocator, RoomSession};
use crate::session::{SessionCommand, SessionConfig, SessionContext, SessionHandle, UiEvent};
use crate::signaling::{SignalingCoordinator, SignalingState};
use crate::transport::{PeerConnector, TransportEvent};
use huddle_core::{CallError, MediaState, RelayEvent, RoomCode, Username};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const TRANSPORT_CHANNEL_CAPACITY: usize = 256;
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// External capabilities a [`CallSession`] is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub relay: Arc<dyn RelayChannel>,
    pub allocator: Arc<dyn RoomAllocator>,
    pub devices: Arc<dyn MediaDevices>,
    pub connector: Arc<dyn PeerConnector>,
}

/// One logged-in participant's call: room membership, local media, chat and
/// the peer links of the active room.
///
/// Every event is handled to completion before the next one, so a peer link
/// never has two negotiations in flight.
pub struct CallSession {
    ctx: SessionContext,
    room: RoomSession,
    media: MediaController,
    chat: ChatStream,
    connector: Arc<dyn PeerConnector>,
    signaling: Option<SignalingCoordinator>,
    transport_tx: mpsc::Sender<TransportEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
}

impl CallSession {
    /// Fails with `Unauthenticated` when the identity provider has nobody logged in.
    pub fn new(
        collaborators: Collaborators,
        config: SessionConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<UiEvent>), CallError> {
        let username = collaborators
            .identity
            .current_identity()
            .ok_or(CallError::Unauthenticated)?;

        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let ctx = SessionContext::new(username, collaborators.relay, ui_tx, config);
        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_CHANNEL_CAPACITY);

        info!("Call session started for {}", ctx.username());

        let session = Self {
            room: RoomSession::new(ctx.clone(), collaborators.allocator),
            media: MediaController::new(ctx.clone(), collaborators.devices),
            chat: ChatStream::new(ctx.clone()),
            connector: collaborators.connector,
            signaling: None,
            transport_tx,
            transport_rx,
            ctx,
        };
        Ok((session, ui_rx))
    }

    pub fn username(&self) -> &Username {
        self.ctx.username()
    }

    pub fn room(&self) -> &RoomSession {
        &self.room
    }

    pub fn media(&self) -> &MediaController {
        &self.media
    }

    pub fn chat(&self) -> &ChatStream {
        &self.chat
    }

    pub fn signaling(&self) -> Option<&SignalingCoordinator> {
        self.signaling.as_ref()
    }

    pub async fn create_room(&mut self) -> Result<RoomCode, CallError> {
        self.ensure_idle()?;
        self.media
            .acquire_local_media(self.ctx.config().constraints)
            .await?;

        match self.room.create_room().await {
            Ok(code) => {
                self.enter(&code);
                Ok(code)
            }
            Err(e) => {
                self.media.release();
                Err(e)
            }
        }
    }

    pub async fn join_room(&mut self, code: &str) -> Result<RoomCode, CallError> {
        let code = RoomCode::new(code)?;
        self.ensure_idle()?;
        self.media
            .acquire_local_media(self.ctx.config().constraints)
            .await?;

        match self.room.join_room(code.as_str()).await {
            Ok(code) => {
                self.enter(&code);
                Ok(code)
            }
            Err(e) => {
                self.media.release();
                Err(e)
            }
        }
    }

    /// Tears down every peer link and local media, then leaves the room.
    /// The session is idle afterwards even if the network calls fail.
    pub async fn leave_room(&mut self) -> Result<(), CallError> {
        let Some(code) = self.room.room_code().cloned() else {
            return Err(CallError::NotInRoom);
        };

        if let Some(mut signaling) = self.signaling.take() {
            signaling.close_all().await;
        }
        self.media.detach();
        self.media.release();
        self.chat.detach();

        let result = self.room.leave_room().await;
        self.ctx.emit(UiEvent::RoomLeft { room_code: code });
        result
    }

    pub async fn set_audio_enabled(&mut self, enabled: bool) -> Result<MediaState, CallError> {
        self.media.set_audio_enabled(enabled).await
    }

    pub async fn set_video_enabled(&mut self, enabled: bool) -> Result<MediaState, CallError> {
        self.media.set_video_enabled(enabled).await
    }

    pub async fn send_chat(&mut self, text: &str) -> Result<(), CallError> {
        self.chat.send(text).await
    }

    /// Dispatches one inbound relay event. Events for other rooms, for other
    /// targets, or our own echoes (chat aside) are dropped.
    pub async fn handle_relay_event(&mut self, event: RelayEvent) {
        let Some(code) = self.room.room_code() else {
            debug!("Dropping {} event: not in a room", event.name());
            return;
        };
        if event.room_code() != code {
            debug!("Dropping {} event for room {}", event.name(), event.room_code());
            return;
        }
        let me = self.ctx.username();
        if event.origin() == me && !event.echoes_to_sender() {
            return;
        }
        if event.target().is_some_and(|target| target != me) {
            return;
        }

        match event {
            RelayEvent::Join { username, .. } => {
                self.room.on_participant_joined(&username);
                let Some(signaling) = self.signaling.as_mut() else {
                    return;
                };
                let result = signaling.on_participant_joined(&username).await;
                self.after_signaling(&username, result);
            }
            RelayEvent::Leave { username, .. } => {
                if let Some(signaling) = self.signaling.as_mut() {
                    signaling.remove_peer(&username).await;
                }
                self.room.on_participant_left(&username);
            }
            RelayEvent::Offer {
                sender,
                offer,
                generation,
                ..
            } => {
                self.room.on_participant_joined(&sender);
                let Some(signaling) = self.signaling.as_mut() else {
                    return;
                };
                let result = signaling
                    .on_offer_received(&sender, offer, generation)
                    .await;
                self.after_signaling(&sender, result);
            }
            RelayEvent::Answer {
                sender,
                answer,
                generation,
                ..
            } => {
                let Some(signaling) = self.signaling.as_mut() else {
                    return;
                };
                let result = signaling
                    .on_answer_received(&sender, answer, generation)
                    .await;
                self.after_signaling(&sender, result);
            }
            RelayEvent::IceCandidate {
                sender,
                candidate,
                generation,
                ..
            } => {
                let Some(signaling) = self.signaling.as_mut() else {
                    return;
                };
                let result = signaling
                    .on_ice_candidate_received(&sender, candidate, generation)
                    .await;
                self.after_signaling(&sender, result);
            }
            RelayEvent::MediaState {
                username,
                audio_enabled,
                video_enabled,
                ..
            } => {
                self.room
                    .on_media_state(&username, MediaState::new(audio_enabled, video_enabled));
            }
            chat @ RelayEvent::Chat { .. } => {
                self.chat.on_message_received(chat);
            }
        }
    }

    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        let Some(signaling) = self.signaling.as_mut() else {
            return;
        };

        match event {
            TransportEvent::CandidateGenerated {
                peer,
                generation,
                candidate,
            } => {
                if let Err(e) = signaling
                    .on_local_ice_candidate(&peer, generation, candidate)
                    .await
                {
                    self.ctx.emit(UiEvent::Error(e));
                }
            }
            TransportEvent::StateChanged {
                peer,
                generation,
                state,
            } => {
                if let Some(new_state) = signaling
                    .on_connection_state_changed(&peer, generation, state)
                    .await
                {
                    self.room.set_status(&peer, new_state.into());
                }
            }
        }
    }

    /// Handles every transport event already queued, without waiting for more.
    pub async fn drain_transport_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.transport_rx.try_recv() {
            self.handle_transport_event(event).await;
            handled += 1;
        }
        handled
    }

    pub async fn check_timeouts(&mut self, now: Instant) -> Vec<Username> {
        let Some(signaling) = self.signaling.as_mut() else {
            return Vec::new();
        };

        let expired = signaling.check_timeouts(now).await;
        for peer in &expired {
            self.room.set_status(peer, ConnectionStatus::Disconnected);
            self.ctx
                .emit(UiEvent::Error(CallError::ConnectionTimeout(peer.clone())));
        }
        expired
    }

    /// Leaves any active room and releases local media.
    pub async fn logout(mut self) {
        if self.room.is_active()
            && let Err(e) = self.leave_room().await
        {
            warn!("Leave during logout failed: {}", e);
        }
        self.media.release();
        info!("Call session for {} ended", self.ctx.username());
    }

    /// Runs the session as a task and returns a handle to drive it.
    pub fn spawn(self, relay_rx: mpsc::Receiver<RelayEvent>) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        tokio::spawn(self.run(relay_rx, command_rx));
        SessionHandle::new(command_tx)
    }

    pub async fn run(
        mut self,
        mut relay_rx: mpsc::Receiver<RelayEvent>,
        mut command_rx: mpsc::Receiver<SessionCommand>,
    ) {
        info!("Session event loop started");
        let mut tick = tokio::time::interval(self.ctx.config().timeout_tick);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Logout) | None => {
                            info!("Logout requested. Shutting down session.");
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                    }
                }

                evt = relay_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_relay_event(e).await,
                        None => {
                            warn!("Relay channel closed");
                            self.ctx.emit(UiEvent::Error(CallError::RelayClosed));
                            break;
                        }
                    }
                }

                Some(evt) = self.transport_rx.recv() => {
                    self.handle_transport_event(evt).await;
                }

                _ = tick.tick() => {
                    self.check_timeouts(Instant::now()).await;
                }
            }
        }

        self.logout().await;
        info!("Session event loop finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::CreateRoom { reply } => {
                let _ = reply.send(self.create_room().await);
            }
            SessionCommand::JoinRoom { code, reply } => {
                let _ = reply.send(self.join_room(&code).await);
            }
            SessionCommand::LeaveRoom { reply } => {
                let _ = reply.send(self.leave_room().await);
            }
            SessionCommand::SetAudio { enabled, reply } => {
                let _ = reply.send(self.set_audio_enabled(enabled).await);
            }
            SessionCommand::SetVideo { enabled, reply } => {
                let _ = reply.send(self.set_video_enabled(enabled).await);
            }
            SessionCommand::SendChat { text, reply } => {
                let _ = reply.send(self.send_chat(&text).await);
            }
            SessionCommand::Participants { reply } => {
                let _ = reply.send(self.room.participants().to_vec());
            }
            SessionCommand::ChatLog { reply } => {
                let _ = reply.send(self.chat.messages().to_vec());
            }
            SessionCommand::Logout => {}
        }
    }

    fn ensure_idle(&self) -> Result<(), CallError> {
        match self.room.room_code() {
            Some(code) => Err(CallError::AlreadyInRoom(code.clone())),
            None => Ok(()),
        }
    }

    /// Wires media, chat and a fresh coordinator to the room just entered.
    fn enter(&mut self, code: &RoomCode) {
        let tracks = self.media.tracks().cloned().unwrap_or_default();

        // A fresh channel per room keeps late events of old links out.
        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_CHANNEL_CAPACITY);
        self.transport_tx = transport_tx;
        self.transport_rx = transport_rx;

        self.signaling = Some(SignalingCoordinator::new(
            self.ctx.clone(),
            code.clone(),
            tracks,
            self.connector.clone(),
            self.transport_tx.clone(),
        ));
        self.media.attach(code.clone());
        self.chat.attach(code.clone());

        info!("Entered room {}", code);
        self.ctx.emit(UiEvent::RoomEntered {
            room_code: code.clone(),
            participants: self.room.usernames(),
        });
    }

    /// Mirrors the link state onto the participant and surfaces any error.
    fn after_signaling(&mut self, peer: &Username, result: Result<SignalingState, CallError>) {
        if let Err(e) = result {
            self.ctx.emit(UiEvent::Error(e));
        }
        let state = self.signaling.as_ref().and_then(|s| s.state_of(peer));
        if let Some(state) = state {
            self.room.set_status(peer, state.into());
        }
    }
}
