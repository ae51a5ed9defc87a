use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::store::SessionStore;

#[derive(Debug)]
enum SaveTask {
    Source(PathBuf),
    Volume(f32),
}

/// Decorates a [`SessionStore`] with a worker thread that performs the
/// writes, so transport commands never wait on the filesystem.
///
/// Loads stay synchronous against the inner store. Dropping the saver closes
/// the queue and joins the worker, which drains any pending writes first.
pub struct SessionSaver<S> {
    store: Arc<S>,
    tx: Option<Sender<SaveTask>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SessionStore + Send + Sync + 'static> SessionSaver<S> {
    pub fn spawn(store: S) -> Self {
        let store = Arc::new(store);
        let (tx, rx) = mpsc::channel::<SaveTask>();

        let worker_store = store.clone();
        let join = thread::spawn(move || {
            for task in rx {
                match task {
                    SaveTask::Source(path) => worker_store.save_last_source(&path),
                    SaveTask::Volume(volume) => worker_store.save_last_volume(volume),
                }
            }
        });

        Self {
            store,
            tx: Some(tx),
            join: Mutex::new(Some(join)),
        }
    }
}

impl<S: SessionStore> SessionStore for SessionSaver<S> {
    fn load_last_source(&self) -> Option<PathBuf> {
        self.store.load_last_source()
    }

    fn load_last_volume(&self) -> Option<f32> {
        self.store.load_last_volume()
    }

    fn save_last_source(&self, path: &Path) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(SaveTask::Source(path.to_path_buf()));
        }
    }

    fn save_last_volume(&self, volume: f32) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(SaveTask::Volume(volume));
        }
    }
}

impl<S> Drop for SessionSaver<S> {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish its queue and exit.
        self.tx.take();
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
