//! Engine-boundary types: commands in, snapshot and events out.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Where the transport currently is.
///
/// `Loading` covers the window between asking the backend for a source and
/// its load-complete notification; a superseding command during that window
/// simply discards the pending output.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TransportState {
    /// No track loaded.
    #[default]
    Empty,
    Loading,
    Playing,
    Paused,
    /// Halted with the playhead at zero; the track stays loaded (or stays
    /// current-but-unplayable after a load failure).
    Stopped,
}

/// Transport commands accepted by the engine.
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the playlist with one file and start playing it.
    LoadSingle(PathBuf),
    /// Replace the playlist with a folder scan and start playing the first
    /// track. Ignored when the folder holds nothing playable.
    LoadFolder(PathBuf),
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    /// Set the volume, clamped to `[0, 1]`. Persists even with no track.
    SetVolume(f32),
    /// Seek within the loaded track, clamped to `[0, duration]`.
    Seek(Duration),
    /// Wind down the engine thread.
    Quit,
}

/// Discrete notifications emitted to the presentation layer. Best-effort: a
/// disconnected receiver never disturbs the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TrackStarted { index: usize, display: String },
    TransportChanged(TransportState),
    ModeChanged { shuffle: bool, repeat: bool },
    PlaylistReplaced { len: usize },
    /// A source could not be played. Recoverable; the engine is `Stopped`
    /// with the track still current.
    LoadFailed { path: PathBuf, message: String },
}

/// Runtime state shared with the presentation layer.
///
/// Refreshed after every command and on every engine tick; reading it always
/// observes the latest published values, which coalesces progress updates
/// for free.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub state: TransportState,
    /// Playlist position of the current track, if any.
    pub index: Option<usize>,
    pub display: Option<String>,
    pub elapsed: Duration,
    /// Total duration, once the backend or the track metadata reports one.
    pub duration: Option<Duration>,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            state: TransportState::Empty,
            index: None,
            display: None,
            elapsed: Duration::ZERO,
            duration: None,
            volume: 0.5,
            shuffle: false,
            repeat: false,
        }
    }
}

pub type SnapshotHandle = Arc<Mutex<EngineSnapshot>>;
