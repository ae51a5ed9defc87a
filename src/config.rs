//! Engine settings: file + environment layering with struct defaults.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::{EngineSettings, LibrarySettings, PlaybackSettings, SessionSettings, Settings};
