use crate::relay::RelayChannel;
use crate::session::{SessionConfig, UiEvent};
use huddle_core::{CallError, RelayEvent, Username};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Per-session collaborators shared by every component.
///
/// Cheap to clone; one exists per authenticated [`CallSession`](crate::CallSession).
#[derive(Clone)]
pub struct SessionContext {
    username: Username,
    relay: Arc<dyn RelayChannel>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    config: Arc<SessionConfig>,
}

impl SessionContext {
    pub fn new(
        username: Username,
        relay: Arc<dyn RelayChannel>,
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        config: SessionConfig,
    ) -> Self {
        Self {
            username,
            relay,
            ui_tx,
            config: Arc::new(config),
        }
    }

    /// The local identity, used as sender/username on every relay event.
    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub async fn publish(&self, event: RelayEvent) -> Result<(), CallError> {
        let name = event.name();
        self.relay.publish(event).await.inspect_err(|e| {
            warn!("Failed to publish {} event: {}", name, e);
        })
    }

    pub fn emit(&self, event: UiEvent) {
        if self.ui_tx.send(event).is_err() {
            debug!("UI receiver dropped, event discarded");
        }
    }
}
