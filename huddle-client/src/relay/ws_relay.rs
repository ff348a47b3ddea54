use crate::relay::RelayChannel;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::{CallError, RelayEvent, Username};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

const INBOUND_CAPACITY: usize = 256;

/// [`RelayChannel`] over a WebSocket to `huddle-server`'s `/ws/{username}` route.
#[derive(Clone)]
pub struct WsRelayChannel {
    tx: mpsc::UnboundedSender<Message>,
}

impl WsRelayChannel {
    /// Connects to `{base_url}/ws/{username}` (`base_url` is `ws://` or `wss://`).
    ///
    /// Returns the channel and the receiver of every event the relay delivers.
    /// The receiver yields `None` once the socket is gone.
    pub async fn connect(
        base_url: &str,
        username: &Username,
    ) -> Result<(Self, mpsc::Receiver<RelayEvent>), CallError> {
        let url = format!("{}/ws/{}", base_url.trim_end_matches('/'), username);
        info!("Connecting to relay at {}", url);

        let (socket, _) = connect_async(url.as_str()).await.map_err(|e| {
            error!("Relay connection to {} failed: {}", url, e);
            CallError::RelayClosed
        })?;

        let (mut sender, mut receiver) = socket.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = sender.send(msg).await {
                    warn!("Relay send failed: {}", e);
                    break;
                }
            }
            let _ = sender.close().await;
            debug!("Relay sender task finished");
        });

        tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<RelayEvent>(&text) {
                        Ok(event) => {
                            if inbound_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid relay event: {:?}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay socket error: {}", e);
                        break;
                    }
                }
            }
            info!("Relay connection closed");
        });

        Ok((Self { tx }, inbound_rx))
    }
}

#[async_trait]
impl RelayChannel for WsRelayChannel {
    async fn publish(&self, event: RelayEvent) -> Result<(), CallError> {
        let json = serde_json::to_string(&event).map_err(|e| {
            error!("Failed to serialize relay event: {}", e);
            CallError::RelayClosed
        })?;

        self.tx
            .send(Message::Text(json.into()))
            .map_err(|_| CallError::RelayClosed)
    }
}
