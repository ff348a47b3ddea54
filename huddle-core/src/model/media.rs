use serde::{Deserialize, Serialize};

/// Local audio/video enablement. Both flags start enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaState {
    pub audio_enabled: bool,
    pub video_enabled: bool,
}

impl MediaState {
    pub const fn new(audio_enabled: bool, video_enabled: bool) -> Self {
        Self {
            audio_enabled,
            video_enabled,
        }
    }

    pub const fn with_audio(self, enabled: bool) -> Self {
        Self {
            audio_enabled: enabled,
            ..self
        }
    }

    pub const fn with_video(self, enabled: bool) -> Self {
        Self {
            video_enabled: enabled,
            ..self
        }
    }

    pub const fn is_muted(&self) -> bool {
        !self.audio_enabled
    }

    pub const fn is_video_off(&self) -> bool {
        !self.video_enabled
    }
}

impl Default for MediaState {
    fn default() -> Self {
        Self::new(true, true)
    }
}
