//! Location of the session blob.

use crate::core::session::SessionStore;

/// Session file used when `SESSION_PATH` is not set.
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";

/// Gets the session file path from `SESSION_PATH` or the default.
#[must_use]
pub fn session_path() -> String {
    std::env::var("SESSION_PATH").unwrap_or_else(|_| DEFAULT_SESSION_PATH.to_string())
}

/// Session store at [`session_path`].
#[must_use]
pub fn session_store() -> SessionStore {
    SessionStore::new(session_path())
}
