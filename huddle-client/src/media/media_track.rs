use std::fmt;
use std::sync::Arc;
use webrtc::track::track_local::TrackLocal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A captured local track.
///
/// Disabling a track keeps it attached to every peer connection; it only stops
/// carrying media. A stopped track releases its capture device for good.
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    fn set_enabled(&self, enabled: bool);

    fn is_enabled(&self) -> bool;

    fn stop(&self);

    fn is_stopped(&self) -> bool;

    /// The webrtc-rs track to attach to peer connections, if this track has one.
    fn rtc_track(&self) -> Option<Arc<dyn TrackLocal + Send + Sync>> {
        None
    }
}

/// The single set of local tracks shared by every peer link of a room.
#[derive(Clone, Default)]
pub struct LocalTracks {
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl LocalTracks {
    pub fn new(tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self { tracks }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.tracks.iter()
    }

    pub fn of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.tracks.iter().filter(move |t| t.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn set_enabled(&self, kind: TrackKind, enabled: bool) {
        for track in self.of_kind(kind) {
            track.set_enabled(enabled);
        }
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

impl fmt::Debug for LocalTracks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTracks")
            .field("audio", &self.of_kind(TrackKind::Audio).count())
            .field("video", &self.of_kind(TrackKind::Video).count())
            .finish()
    }
}
