//! Networking - Talking to the rules collaborator
//!
//! - [`GameService`] - One async method per remote operation
//! - [`HttpGameService`] - The callable-function HTTP transport
//! - [`RemoteGameSession`] - Active game, re-fetch discipline and stale-result ordering

pub mod client;
pub mod http;
pub mod service;

pub use client::{ErrorCallback, RemoteGameSession};
pub use http::HttpGameService;
pub use service::GameService;
