use async_trait::async_trait;
use huddle_client::RelayChannel;
use huddle_client::model::RelayEvent;
use huddle_client::UiEvent;
use huddle_core::{CallError, Username};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// In-process stand-in for the relay server: every published event is fanned
/// out to the other connected sessions, chat to the sender as well.
#[derive(Clone, Default)]
pub struct LoopbackHub {
    peers: Arc<Mutex<Vec<(Username, mpsc::Sender<RelayEvent>)>>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, name: &str) -> (HubRelay, mpsc::Receiver<RelayEvent>) {
        let (tx, rx) = mpsc::channel(256);
        let username = Username::from(name);
        if let Ok(mut peers) = self.peers.lock() {
            peers.push((username.clone(), tx));
        }
        let relay = HubRelay {
            hub: self.clone(),
            username,
        };
        (relay, rx)
    }

    fn recipients(&self, sender: &Username, echo: bool) -> Vec<mpsc::Sender<RelayEvent>> {
        let Ok(peers) = self.peers.lock() else {
            return Vec::new();
        };
        peers
            .iter()
            .filter(|(name, _)| echo || name != sender)
            .map(|(_, tx)| tx.clone())
            .collect()
    }
}

#[derive(Clone)]
pub struct HubRelay {
    hub: LoopbackHub,
    username: Username,
}

#[async_trait]
impl RelayChannel for HubRelay {
    async fn publish(&self, event: RelayEvent) -> Result<(), CallError> {
        for tx in self.hub.recipients(&self.username, event.echoes_to_sender()) {
            let _ = tx.send(event.clone()).await;
        }
        Ok(())
    }
}

/// Waits for the first UI event matching `pred`, discarding the others.
pub async fn wait_for_ui(
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    timeout_ms: u64,
    pred: impl Fn(&UiEvent) -> bool,
) -> Option<UiEvent> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        while let Some(event) = rx.recv().await {
            if pred(&event) {
                return Some(event);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}
