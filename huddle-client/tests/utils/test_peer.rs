use huddle_client::model::RelayEvent;
use huddle_client::{
    CallSession, Collaborators, SessionConfig, SignalingState, StaticIdentity, UiEvent,
};
use huddle_core::Username;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::utils::{FakeConnector, FakeDevices, MemoryAllocator, MockRelay};

/// One participant driven directly through its CallSession, with every
/// collaborator replaced by a recording double.
pub struct TestPeer {
    pub name: Username,
    pub session: CallSession,
    pub ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    pub relay: MockRelay,
    pub outbox: mpsc::UnboundedReceiver<RelayEvent>,
    pub connector: FakeConnector,
    pub devices: FakeDevices,
}

impl TestPeer {
    pub fn new(name: &str, allocator: &MemoryAllocator) -> Self {
        Self::with(name, allocator, FakeDevices::granting(), SessionConfig::default())
    }

    pub fn with(
        name: &str,
        allocator: &MemoryAllocator,
        devices: FakeDevices,
        config: SessionConfig,
    ) -> Self {
        let (relay, outbox) = MockRelay::new();
        let connector = FakeConnector::new(name);

        let collaborators = Collaborators {
            identity: Arc::new(StaticIdentity::new(name)),
            relay: Arc::new(relay.clone()),
            allocator: Arc::new(allocator.clone()),
            devices: Arc::new(devices.clone()),
            connector: Arc::new(connector.clone()),
        };
        let (session, ui_rx) =
            CallSession::new(collaborators, config).expect("identity is present");

        Self {
            name: Username::from(name),
            session,
            ui_rx,
            relay,
            outbox,
            connector,
            devices,
        }
    }

    pub fn link_state(&self, peer: &str) -> Option<SignalingState> {
        self.session
            .signaling()
            .and_then(|s| s.state_of(&Username::from(peer)))
    }

    /// UI events emitted since the last call.
    pub fn ui_events(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.ui_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Relay events published since the last call, without delivering them.
    pub fn take_outbox(&mut self) -> Vec<RelayEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.outbox.try_recv() {
            events.push(event);
        }
        events
    }

    pub async fn deliver(&mut self, event: RelayEvent) {
        self.session.handle_relay_event(event).await;
    }
}

/// Delivers queued relay and transport events between `peers` until none are
/// left, routing like the server: chat goes to everyone, the rest to the others.
pub async fn pump(peers: &mut [&mut TestPeer]) {
    for _ in 0..64 {
        let mut moved = false;

        for i in 0..peers.len() {
            if peers[i].session.drain_transport_events().await > 0 {
                moved = true;
            }

            while let Ok(event) = peers[i].outbox.try_recv() {
                moved = true;
                for j in 0..peers.len() {
                    if j == i && !event.echoes_to_sender() {
                        continue;
                    }
                    peers[j].session.handle_relay_event(event.clone()).await;
                }
            }
        }

        if !moved {
            return;
        }
    }
    panic!("relay traffic did not settle");
}
