use huddle_client::{
    CallSession, Collaborators, HttpRoomAllocator, SessionConfig, SessionHandle, StaticIdentity,
    UiEvent, WsRelayChannel,
};
use huddle_core::Username;
use huddle_server::{AppState, ServerConfig, router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::utils::{FakeConnector, FakeDevices};

/// A real huddle-server on an ephemeral localhost port.
pub struct LiveServer {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl LiveServer {
    pub async fn start() -> Self {
        let state = AppState::new(ServerConfig::default());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = router(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// A session wired to this server over HTTP and WebSocket, with fake
    /// media and peer connections.
    pub async fn spawn_session(
        &self,
        name: &str,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<UiEvent>) {
        let username = Username::from(name);
        let (relay, relay_rx) = WsRelayChannel::connect(&format!("ws://{}", self.addr), &username)
            .await
            .expect("relay connect");

        let collaborators = Collaborators {
            identity: Arc::new(StaticIdentity::new(name)),
            relay: Arc::new(relay),
            allocator: Arc::new(HttpRoomAllocator::new(format!("http://{}", self.addr))),
            devices: Arc::new(FakeDevices::granting()),
            connector: Arc::new(FakeConnector::new(name)),
        };
        let (session, ui_rx) =
            CallSession::new(collaborators, SessionConfig::default()).expect("identity is present");
        (session.spawn(relay_rx), ui_rx)
    }

    /// Waits until `count` relay connections are subscribed to `code`.
    pub async fn wait_for_subscribers(&self, code: &huddle_core::RoomCode, count: usize) -> bool {
        for _ in 0..200 {
            if self.state.hub.subscribers(code) == count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
