//! Wire records exchanged with the shogi rules collaborator.
//!
//! Both the client and any collaborator implementation (including the fake
//! used by the integration tests) depend on this crate so the two sides agree
//! on field names and operation names.

pub mod protocol;

pub use protocol::*;
