use crate::media::{LocalTracks, MediaTrack, SampleTrack, TrackKind};
use async_trait::async_trait;
use huddle_core::CallError;
use std::sync::Arc;

/// What to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// The capture capability: camera and microphone access.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Fails with `MediaAccessDenied` or `DeviceUnavailable`.
    async fn acquire(&self, constraints: MediaConstraints) -> Result<LocalTracks, CallError>;
}

/// Devices whose tracks are fed by the application through [`SampleTrack::write`].
#[derive(Debug, Clone)]
pub struct SampleDevices {
    stream_id: String,
}

impl SampleDevices {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

impl Default for SampleDevices {
    fn default() -> Self {
        Self::new("huddle")
    }
}

#[async_trait]
impl MediaDevices for SampleDevices {
    async fn acquire(&self, constraints: MediaConstraints) -> Result<LocalTracks, CallError> {
        let mut tracks: Vec<Arc<dyn MediaTrack>> = Vec::new();
        if constraints.audio {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Audio, &self.stream_id)));
        }
        if constraints.video {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Video, &self.stream_id)));
        }

        if tracks.is_empty() {
            return Err(CallError::DeviceUnavailable(
                "neither audio nor video was requested".to_owned(),
            ));
        }
        Ok(LocalTracks::new(tracks))
    }
}
