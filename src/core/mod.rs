//! Core module - Configuration, persistence and infrastructure errors
//!
//! Everything the game session needs from its surroundings but that is not
//! shogi itself:
//!
//! - [`ClientConfig`] - Collaborator endpoint, request timeout and state directory
//! - [`SessionStore`] - Where the active game identifier survives restarts
//!   ([`FileSessionStore`] on disk, [`MemorySessionStore`] for tests and embedding)
//! - [`StoreError`] / [`ConfigError`] - Failures of the two above

pub mod config;
pub mod error;
pub mod session_store;

pub use config::ClientConfig;
pub use error::{ConfigError, StoreError, StoreResult};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};
