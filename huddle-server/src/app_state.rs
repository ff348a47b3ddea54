use crate::{RelayHub, RoomRegistry, ServerConfig};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: RoomRegistry,
    pub hub: RelayHub,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let registry = RoomRegistry::new(config.max_participants);
        let hub = RelayHub::new(registry.clone());

        Self {
            registry,
            hub,
            config: Arc::new(config),
        }
    }
}
