//! The transport state machine.
//!
//! All mutation happens through [`PlaybackController::handle`] and
//! [`PlaybackController::poll`], both called from a single thread; that is
//! the serialization point for user commands and audio notifications alike.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::{AudioBackend, AudioEvent, AudioOutput};
use crate::config::{LibrarySettings, Settings};
use crate::library::{self, Track};
use crate::playlist::Playlist;
use crate::session::SessionStore;

use super::types::{Command, EngineEvent, EngineSnapshot, SnapshotHandle, TransportState};

/// Owns the playlist, the (at most one) active audio output and the session
/// contract, and runs the transport state machine over them.
pub struct PlaybackController {
    playlist: Playlist,
    backend: Box<dyn AudioBackend>,
    output: Option<Box<dyn AudioOutput>>,
    session: Box<dyn SessionStore>,
    events: Sender<EngineEvent>,
    snapshot: SnapshotHandle,
    library: LibrarySettings,
    state: TransportState,
    volume: f32,
    elapsed: Duration,
    duration: Option<Duration>,
}

impl PlaybackController {
    /// Build an idle controller. The persisted volume applies immediately,
    /// before anything loads; restoring the last source is a separate,
    /// optional step ([`PlaybackController::restore`]).
    pub fn new(
        settings: &Settings,
        backend: Box<dyn AudioBackend>,
        session: Box<dyn SessionStore>,
        events: Sender<EngineEvent>,
        snapshot: SnapshotHandle,
    ) -> Self {
        let mut playlist = Playlist::new();
        playlist.set_shuffle(settings.playback.shuffle);
        playlist.set_repeat(settings.playback.repeat);

        let volume = session
            .load_last_volume()
            .unwrap_or(settings.playback.default_volume)
            .clamp(0.0, 1.0);

        let controller = Self {
            playlist,
            backend,
            output: None,
            session,
            events,
            snapshot,
            library: settings.library.clone(),
            state: TransportState::Empty,
            volume,
            elapsed: Duration::ZERO,
            duration: None,
        };
        controller.publish();
        controller
    }

    /// Reload whatever the session remembers: a file becomes a one-track
    /// playlist, a folder becomes a full scan. Restoring never re-persists
    /// the source.
    pub fn restore(&mut self) {
        if let Some(path) = self.session.load_last_source() {
            debug!("restoring last source {}", path.display());
            self.load_source(&path, false);
        }
        self.publish();
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::LoadSingle(path) | Command::LoadFolder(path) => {
                self.load_source(&path, true)
            }
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Stop => self.stop(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::ToggleShuffle => self.toggle_shuffle(),
            Command::ToggleRepeat => self.toggle_repeat(),
            Command::SetVolume(volume) => self.set_volume(volume),
            Command::Seek(position) => self.seek(position),
            // Quit is the thread loop's concern.
            Command::Quit => {}
        }
        self.publish();
    }

    /// Drain pending audio notifications and refresh progress. Called on
    /// every engine tick and after every command.
    pub fn poll(&mut self) {
        loop {
            let Some(event) = self.output.as_mut().and_then(|o| o.poll_event()) else {
                break;
            };
            match event {
                AudioEvent::Loaded(total) => self.on_loaded(total),
                AudioEvent::EndOfStream => self.on_end_of_stream(),
                AudioEvent::Failed(message) => {
                    let path = self
                        .playlist
                        .current()
                        .map(|t| t.path.clone())
                        .unwrap_or_default();
                    self.fail_load(path, message);
                }
            }
        }

        if self.state == TransportState::Playing {
            if let Some(out) = self.output.as_ref() {
                self.elapsed = out.elapsed();
            }
        }
        self.publish();
    }

    /// Release the output so the audio device closes before the thread exits.
    pub fn shutdown(&mut self) {
        self.output = None;
        if matches!(self.state, TransportState::Playing | TransportState::Paused) {
            self.elapsed = Duration::ZERO;
            self.transition(TransportState::Stopped);
        }
        self.publish();
    }

    fn play(&mut self) {
        if !matches!(self.state, TransportState::Paused | TransportState::Stopped) {
            return;
        }
        let Some(out) = self.output.as_mut() else {
            return;
        };
        out.play();
        self.transition(TransportState::Playing);
    }

    fn pause(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        if let Some(out) = self.output.as_mut() {
            out.pause();
            self.transition(TransportState::Paused);
        }
    }

    fn stop(&mut self) {
        if !matches!(self.state, TransportState::Playing | TransportState::Paused) {
            return;
        }
        if let Some(out) = self.output.as_mut() {
            out.stop();
        }
        self.elapsed = Duration::ZERO;
        self.transition(TransportState::Stopped);
    }

    fn next(&mut self) {
        if self.playlist.advance().is_none() {
            self.clear();
            return;
        }
        self.load_current();
    }

    fn previous(&mut self) {
        if self.playlist.retreat().is_none() {
            self.clear();
            return;
        }
        self.load_current();
    }

    fn toggle_shuffle(&mut self) {
        let on = !self.playlist.shuffle();
        self.playlist.set_shuffle(on);
        self.emit_mode();
    }

    fn toggle_repeat(&mut self) {
        let on = !self.playlist.repeat();
        self.playlist.set_repeat(on);
        self.emit_mode();
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        if let Some(out) = self.output.as_mut() {
            out.set_volume(volume);
        }
        // Persisted regardless of whether anything is loaded.
        self.session.save_last_volume(volume);
    }

    fn seek(&mut self, position: Duration) {
        // Only meaningful once a track has finished loading.
        if matches!(self.state, TransportState::Empty | TransportState::Loading) {
            return;
        }
        let Some(out) = self.output.as_mut() else {
            return;
        };
        let position = match self.duration {
            Some(total) => position.min(total),
            None => position,
        };
        out.seek(position);
        self.elapsed = position;
    }

    /// Resolve `path` into a track list and swap it in. Empty results leave
    /// the current playlist untouched; non-empty results reset to the first
    /// track and start loading it.
    fn load_source(&mut self, path: &Path, persist: bool) {
        let tracks: Vec<Track> = if path.is_file() {
            vec![Track::from_path(path)]
        } else if path.is_dir() {
            library::scan(path, &self.library)
        } else {
            warn!("source {} does not exist, ignoring", path.display());
            return;
        };

        if tracks.is_empty() {
            debug!(
                "no playable tracks under {}, keeping current playlist",
                path.display()
            );
            return;
        }

        if persist {
            // The chosen path, not the individual track: a folder restores
            // as a folder.
            self.session.save_last_source(path);
        }

        let len = tracks.len();
        self.playlist.replace(tracks);
        let _ = self.events.send(EngineEvent::PlaylistReplaced { len });
        self.load_current();
    }

    /// Tear down the active output and start loading the playlist's current
    /// track. Dropping the old output first guarantees at most one live
    /// stream, and makes a superseded load's completion unobservable.
    fn load_current(&mut self) {
        self.output = None;

        let Some(track) = self.playlist.current() else {
            self.clear();
            return;
        };
        let path = track.path.clone();

        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.transition(TransportState::Loading);

        match self.backend.load(&path) {
            Ok(out) => self.output = Some(out),
            Err(e) => self.fail_load(path, e.to_string()),
        }
    }

    fn on_loaded(&mut self, total: Option<Duration>) {
        // A completion that arrives outside `Loading` belongs to a load that
        // was since superseded or stopped; ignore it.
        if self.state != TransportState::Loading {
            return;
        }

        self.duration = total.or_else(|| self.playlist.current().and_then(|t| t.duration));
        if let Some(out) = self.output.as_mut() {
            out.set_volume(self.volume);
            out.play();
        }
        self.transition(TransportState::Playing);

        if let (Some(index), Some(track)) = (self.playlist.current_index(), self.playlist.current())
        {
            let _ = self.events.send(EngineEvent::TrackStarted {
                index,
                display: track.display.clone(),
            });
        }
    }

    fn on_end_of_stream(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }

        if self.playlist.repeat() {
            // Loop the current track in place; repeat outranks shuffle and
            // must not touch the playlist position.
            if let Some(out) = self.output.as_mut() {
                out.seek(Duration::ZERO);
                out.play();
            }
            self.elapsed = Duration::ZERO;
        } else {
            self.next();
        }
    }

    fn fail_load(&mut self, path: PathBuf, message: String) {
        warn!("load failed for {}: {message}", path.display());
        self.output = None;
        self.elapsed = Duration::ZERO;
        // The track stays current-but-unplayable; the embedder decides how
        // loudly to surface this.
        self.transition(TransportState::Stopped);
        let _ = self.events.send(EngineEvent::LoadFailed { path, message });
    }

    fn clear(&mut self) {
        self.output = None;
        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.transition(TransportState::Empty);
    }

    fn transition(&mut self, state: TransportState) {
        if self.state == state {
            return;
        }
        debug!("transport {:?} -> {:?}", self.state, state);
        self.state = state;
        let _ = self.events.send(EngineEvent::TransportChanged(state));
    }

    fn emit_mode(&self) {
        let _ = self.events.send(EngineEvent::ModeChanged {
            shuffle: self.playlist.shuffle(),
            repeat: self.playlist.repeat(),
        });
    }

    fn publish(&self) {
        if let Ok(mut snap) = self.snapshot.lock() {
            *snap = EngineSnapshot {
                state: self.state,
                index: self.playlist.current_index(),
                display: self.playlist.current().map(|t| t.display.clone()),
                elapsed: self.elapsed,
                duration: self.duration,
                volume: self.volume,
                shuffle: self.playlist.shuffle(),
                repeat: self.playlist.repeat(),
            };
        }
    }
}
