use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("session encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// What survives across runs. Both keys are independent; there is no
/// transactional guarantee between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub last_source: Option<PathBuf>,
    pub volume: Option<f32>,
}

/// The persistence contract the engine consumes.
///
/// Loads run once at startup; saves fire on every relevant state change.
/// Implementations are best-effort: failures must be swallowed, never
/// surfaced to the transport state machine.
pub trait SessionStore {
    fn load_last_source(&self) -> Option<PathBuf>;
    fn load_last_volume(&self) -> Option<f32>;
    fn save_last_source(&self, path: &Path);
    fn save_last_volume(&self, volume: f32);
}

/// `SessionStore` over a single TOML document on disk.
pub struct TomlSessionStore {
    path: PathBuf,
}

impl TomlSessionStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<SessionData, SessionError> {
        if !self.path.exists() {
            return Ok(SessionData::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn write(&self, data: &SessionData) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Read-modify-write one field; the other key keeps whatever value the
    /// file already holds.
    fn update(&self, apply: impl FnOnce(&mut SessionData)) {
        let mut data = match self.read() {
            Ok(d) => d,
            Err(e) => {
                warn!("session read failed, starting fresh: {e}");
                SessionData::default()
            }
        };
        apply(&mut data);
        if let Err(e) = self.write(&data) {
            warn!("session save failed: {e}");
        }
    }
}

impl SessionStore for TomlSessionStore {
    fn load_last_source(&self) -> Option<PathBuf> {
        match self.read() {
            Ok(data) => data.last_source,
            Err(e) => {
                warn!("session read failed: {e}");
                None
            }
        }
    }

    fn load_last_volume(&self) -> Option<f32> {
        match self.read() {
            Ok(data) => data.volume,
            Err(e) => {
                warn!("session read failed: {e}");
                None
            }
        }
    }

    fn save_last_source(&self, path: &Path) {
        self.update(|data| data.last_source = Some(path.to_path_buf()));
    }

    fn save_last_volume(&self, volume: f32) {
        self.update(|data| data.volume = Some(volume));
    }
}

/// Store used when no session path can be resolved (no home directory, no
/// override): loads nothing, saves nowhere.
pub struct NullSessionStore;

impl SessionStore for NullSessionStore {
    fn load_last_source(&self) -> Option<PathBuf> {
        None
    }

    fn load_last_volume(&self) -> Option<f32> {
        None
    }

    fn save_last_source(&self, _path: &Path) {}

    fn save_last_volume(&self, _volume: f32) {}
}

/// Resolve the session file path from `DACAPO_SESSION_PATH` or XDG defaults.
pub fn resolve_session_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("DACAPO_SESSION_PATH") {
        return Some(PathBuf::from(p));
    }
    default_session_path()
}

/// Compute the default session path under `$XDG_STATE_HOME/dacapo/session.toml`
/// or `~/.local/state/dacapo/session.toml` when `XDG_STATE_HOME` is not set.
pub fn default_session_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("dacapo").join("session.toml"))
}
