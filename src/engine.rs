//! The playback engine: transport state machine, worker thread and the
//! public [`Player`] handle.
//!
//! Commands and audio notifications are interleaved on one engine thread, so
//! the state machine never sees two things happen at once. Presentation
//! layers poll the shared snapshot for progress and listen on the event
//! channel for discrete changes.

mod controller;
mod player;
mod thread;
mod types;


pub use controller::PlaybackController;
pub use player::{EngineDeps, Player};
pub use types::{Command, EngineEvent, EngineSnapshot, SnapshotHandle, TransportState};
