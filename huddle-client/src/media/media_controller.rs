use crate::media::{LocalTracks, MediaConstraints, MediaDevices, TrackKind};
use crate::session::{SessionContext, UiEvent};
use huddle_core::{CallError, MediaState, RelayEvent, RoomCode};
use std::sync::Arc;
use tracing::{info, warn};

/// Owner of local capture and of the local [`MediaState`].
///
/// Tracks are acquired once per call and shared by every peer link. Toggling
/// audio or video only flips the tracks' enabled flag, so it never causes a
/// renegotiation. Dropping the controller releases the devices.
pub struct MediaController {
    ctx: SessionContext,
    devices: Arc<dyn MediaDevices>,
    tracks: Option<LocalTracks>,
    state: MediaState,
    room: Option<RoomCode>,
}

impl MediaController {
    pub fn new(ctx: SessionContext, devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            ctx,
            devices,
            tracks: None,
            state: MediaState::default(),
            room: None,
        }
    }

    pub fn state(&self) -> MediaState {
        self.state
    }

    pub fn tracks(&self) -> Option<&LocalTracks> {
        self.tracks.as_ref()
    }

    /// Captures camera and microphone, or returns the tracks already held.
    pub async fn acquire_local_media(
        &mut self,
        constraints: MediaConstraints,
    ) -> Result<LocalTracks, CallError> {
        if let Some(tracks) = &self.tracks {
            return Ok(tracks.clone());
        }

        let tracks = self.devices.acquire(constraints).await.inspect_err(|e| {
            warn!("Local media acquisition failed: {}", e);
        })?;

        tracks.set_enabled(TrackKind::Audio, self.state.audio_enabled);
        tracks.set_enabled(TrackKind::Video, self.state.video_enabled);
        info!("Acquired local media: {:?}", tracks);

        self.tracks = Some(tracks.clone());
        Ok(tracks)
    }

    pub async fn set_audio_enabled(&mut self, enabled: bool) -> Result<MediaState, CallError> {
        self.apply(self.state.with_audio(enabled)).await
    }

    pub async fn set_video_enabled(&mut self, enabled: bool) -> Result<MediaState, CallError> {
        self.apply(self.state.with_video(enabled)).await
    }

    /// Starts echoing state changes to `room`.
    pub fn attach(&mut self, room: RoomCode) {
        self.room = Some(room);
    }

    pub fn detach(&mut self) {
        self.room = None;
    }

    /// Stops every local track and resets the state. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(tracks) = self.tracks.take() {
            tracks.stop_all();
            info!("Released local media");
        }
        self.state = MediaState::default();
    }

    /// The local change always sticks; a failed broadcast is returned to the caller.
    async fn apply(&mut self, state: MediaState) -> Result<MediaState, CallError> {
        self.state = state;
        if let Some(tracks) = &self.tracks {
            tracks.set_enabled(TrackKind::Audio, state.audio_enabled);
            tracks.set_enabled(TrackKind::Video, state.video_enabled);
        }
        self.ctx.emit(UiEvent::LocalMediaState(state));

        if let Some(room) = &self.room {
            self.ctx
                .publish(RelayEvent::media_state(
                    room.clone(),
                    self.ctx.username().clone(),
                    state,
                ))
                .await?;
        }
        Ok(state)
    }
}

impl Drop for MediaController {
    fn drop(&mut self) {
        if let Some(tracks) = self.tracks.take() {
            tracks.stop_all();
        }
    }
}
