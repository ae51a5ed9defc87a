use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::Settings;

use super::controller::PlaybackController;
use super::player::EngineDeps;
use super::types::{Command, EngineEvent, SnapshotHandle};

/// Run the engine loop on its own thread.
///
/// The receive timeout doubles as the poll tick: between commands the loop
/// wakes to drain audio notifications (load completion, end-of-stream) and
/// refresh the snapshot. Capabilities are built by `deps` inside the thread
/// because the audio stream is not `Send`.
pub(super) fn spawn_engine_thread<F>(
    settings: Settings,
    rx: Receiver<Command>,
    events: Sender<EngineEvent>,
    snapshot: SnapshotHandle,
    deps: F,
) -> JoinHandle<()>
where
    F: FnOnce() -> EngineDeps + Send + 'static,
{
    thread::spawn(move || {
        let EngineDeps { backend, session } = deps();
        let mut controller =
            PlaybackController::new(&settings, backend, session, events, snapshot);
        if settings.session.restore {
            controller.restore();
        }
        controller.poll();

        let tick = Duration::from_millis(settings.engine.tick_ms.max(1));
        loop {
            match rx.recv_timeout(tick) {
                Ok(Command::Quit) => break,
                Ok(cmd) => {
                    controller.handle(cmd);
                    controller.poll();
                }
                Err(RecvTimeoutError::Timeout) => controller.poll(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        controller.shutdown();
    })
}
