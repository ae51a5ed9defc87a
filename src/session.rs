//! Best-effort persistence of the last-used source and volume.
//!
//! The engine consumes the [`SessionStore`] contract and never learns about
//! persistence failures; they are logged and swallowed. [`TomlSessionStore`]
//! keeps a small `session.toml` under the XDG state directory, and
//! [`SessionSaver`] moves writes onto a worker thread so saving never blocks
//! transport commands.

mod saver;
mod store;
#[cfg(test)]
mod tests;

pub use saver::SessionSaver;
pub use store::{
    NullSessionStore, SessionData, SessionError, SessionStore, TomlSessionStore,
    default_session_path, resolve_session_path,
};
