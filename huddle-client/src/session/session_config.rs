use crate::media::MediaConstraints;
use std::time::Duration;

/// Tunables of one call session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// ICE candidates kept per peer while its remote description is unset.
    pub candidate_buffer_cap: usize,
    /// How long a peer link may negotiate before `ConnectionTimeout`.
    pub connect_timeout: Duration,
    /// Interval at which the event loop checks for timed out links.
    pub timeout_tick: Duration,
    pub constraints: MediaConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            candidate_buffer_cap: 64,
            connect_timeout: Duration::from_secs(15),
            timeout_tick: Duration::from_secs(1),
            constraints: MediaConstraints::default(),
        }
    }
}
