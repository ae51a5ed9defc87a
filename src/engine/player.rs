use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::audio::{AudioBackend, RodioBackend};
use crate::config::Settings;
use crate::session::{
    NullSessionStore, SessionSaver, SessionStore, TomlSessionStore, resolve_session_path,
};

use super::thread::spawn_engine_thread;
use super::types::{Command, EngineEvent, EngineSnapshot, SnapshotHandle};

/// The capabilities the engine thread owns. Constructed on the engine thread
/// via the factory passed to [`Player::spawn_with`].
pub struct EngineDeps {
    pub backend: Box<dyn AudioBackend>,
    pub session: Box<dyn SessionStore>,
}

/// Handle to a running engine thread.
pub struct Player {
    tx: Sender<Command>,
    snapshot: SnapshotHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Spawn the engine wired for production: rodio output on the default
    /// device and the TOML session store behind a background saver.
    pub fn spawn(settings: Settings) -> (Self, Receiver<EngineEvent>) {
        let session_path = settings.session.path.clone().or_else(resolve_session_path);
        Self::spawn_with(settings, move || {
            let session: Box<dyn SessionStore> = match session_path {
                Some(path) => Box::new(SessionSaver::spawn(TomlSessionStore::at(path))),
                None => Box::new(NullSessionStore),
            };
            EngineDeps {
                backend: Box::new(RodioBackend::open_default()),
                session,
            }
        })
    }

    /// Spawn the engine with caller-provided capabilities. The factory runs
    /// on the engine thread, so its products do not need to be `Send`.
    pub fn spawn_with<F>(settings: Settings, deps: F) -> (Self, Receiver<EngineEvent>)
    where
        F: FnOnce() -> EngineDeps + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let snapshot: SnapshotHandle = Arc::new(Mutex::new(EngineSnapshot::default()));

        let join = spawn_engine_thread(settings, rx, event_tx, snapshot.clone(), deps);

        (
            Self {
                tx,
                snapshot,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    pub fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.tx.send(command)
    }

    /// A copy of the latest published engine state.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    /// Ask the engine to wind down and wait for the thread to finish.
    pub fn quit(&self) {
        let _ = self.send(Command::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
