//! Shogi game module - Client-side view of a remotely ruled game
//!
//! The rules live in a remote collaborator. This module holds what the client
//! needs to show a game and turn clicks into requests, and nothing more: it
//! never validates or predicts a move.
//!
//! # Module Organization
//!
//! - `types` - Squares, sides, piece kinds and piece codes
//! - `board` - The 9x9 board and legal-destination masks
//! - `session` - One fetched game snapshot
//! - `resources` - Pieces in hand, selection state machine, loading gate
//! - `controller` - Binds selection to the remote session
//! - `error` - [`ClientError`]
//!
//! # Data Flow
//!
//! 1. A click reaches [`GameController`], which asks the selection for an intent
//! 2. The intent becomes a remote call through [`crate::networking`]
//! 3. Answers fold back into the selection; moves trigger a re-fetch

pub mod board;
pub mod controller;
pub mod error;
pub mod resources;
pub mod session;
pub mod types;

pub use board::{Board, Destinations};
pub use controller::{BoardView, ClickOutcome, GameController};
pub use error::{ClientError, ClientResult};
pub use session::{GameSession, SessionId};
pub use types::{PieceCode, PieceKind, Side, Square};
