use async_trait::async_trait;
use huddle_core::{CallError, RelayEvent};

/// Outbound half of the persistent channel to the server-side relay.
///
/// Publishing is fire-and-forget: `Ok` means the event was handed to the
/// channel, not that anyone received it. Inbound events arrive on the
/// `mpsc::Receiver<RelayEvent>` returned next to the channel when it is opened.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    async fn publish(&self, event: RelayEvent) -> Result<(), CallError>;
}
