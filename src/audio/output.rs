//! Traits and small types at the audio output seam.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// A source could not be brought to a playable state.
///
/// Recoverable: the engine lands in `Stopped` with the faulty track still
/// current, and the embedder decides how loudly to surface it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Asynchronous notifications from the active output, drained on the engine
/// thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The source finished loading and playback may start. Carries the total
    /// duration when the backend knows it.
    Loaded(Option<Duration>),
    /// The current track played to its end.
    EndOfStream,
    /// The output failed after loading (device lost, source vanished).
    Failed(String),
}

/// One loaded audio stream.
///
/// Commands are fire-and-forget; completion and failure arrive through
/// [`AudioOutput::poll_event`]. Progress is pulled via
/// [`AudioOutput::elapsed`] rather than queued, so it coalesces for free.
pub trait AudioOutput {
    fn play(&mut self);
    fn pause(&mut self);
    /// Halt and reset the playhead to zero, keeping the source loaded.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn elapsed(&self) -> Duration;
    /// Drain the next pending notification, if any.
    fn poll_event(&mut self) -> Option<AudioEvent>;
}

/// Constructs outputs. The engine drops the previous output before calling
/// [`AudioBackend::load`], so at most one stream is ever alive.
pub trait AudioBackend {
    fn load(&mut self, source: &Path) -> Result<Box<dyn AudioOutput>, LoadError>;
}
