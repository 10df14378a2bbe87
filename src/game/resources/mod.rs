//! Game resources - Shared state around the active game
//!
//! - [`PiecesInHand`] - The captured-piece pool and each side's view of it
//! - [`SelectionState`] - Which origin is selected and where it may go
//! - [`LoadingGate`] - Whether any remote request is in flight

pub mod captured;
pub mod loading;
pub mod selection;

pub use captured::PiecesInHand;
pub use loading::{LoadingGate, LoadingGuard, OperationStatus};
pub use selection::{Intent, Origin, SelectionPhase, SelectionState, Ticket};
