//! Selection state machine
//!
//! Turns clicks on the board (or on a piece in hand) into intents for the
//! remote session, and folds the answers back in.
//!
//! # States
//!
//! ```text
//! Idle ──click──▶ AwaitingLegalMoves ──answer──▶ Selected
//!  ▲                                               │
//!  │                          click on destination │
//!  └──── move finished ◀── AwaitingMoveResult ◀────┘
//! ```
//!
//! Clicks are never refused while a request is outstanding. Each intent
//! carries a [`Ticket`]; only the answer for the most recently issued ticket
//! is applied, so a slow answer to an earlier click cannot overwrite the
//! selection made by a later one.

use crate::game::board::Destinations;
use crate::game::error::ClientError;
use crate::game::types::{PieceKind, Square};
use shared::{hand_sentinel, HAND_SENTINEL_SUFFIX};
use std::fmt;
use std::str::FromStr;

/// Where a selected piece comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Board(Square),
    /// A captured piece about to be dropped
    Hand(PieceKind),
}

impl Origin {
    /// Label sent as `from_square`: `7g`, or `P*` for a drop
    pub fn wire(self) -> String {
        match self {
            Origin::Board(square) => square.to_string(),
            Origin::Hand(kind) => hand_sentinel(kind.letter()),
        }
    }

    pub fn square(self) -> Option<Square> {
        match self {
            Origin::Board(square) => Some(square),
            Origin::Hand(_) => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire())
    }
}

/// Accepts what [`Origin::wire`] produces; the sentinel letter may be either case
impl FromStr for Origin {
    type Err = ClientError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let mut chars = label.chars();
        if let (Some(letter), Some(HAND_SENTINEL_SUFFIX), None) =
            (chars.next(), chars.next(), chars.next())
        {
            return PieceKind::from_letter(letter)
                .filter(|kind| *kind != PieceKind::King)
                .map(Origin::Hand)
                .ok_or_else(|| ClientError::InvalidPiece {
                    code: label.to_string(),
                });
        }
        Square::parse(label).map(Origin::Board)
    }
}

impl From<Square> for Origin {
    fn from(square: Square) -> Self {
        Origin::Board(square)
    }
}

/// Monotonic stamp attached to every issued intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What the session should do in response to a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    QueryLegalMoves { origin: Origin, ticket: Ticket },
    SubmitMove { from: Origin, to: Square, ticket: Ticket },
}

impl Intent {
    pub fn ticket(&self) -> Ticket {
        match self {
            Intent::QueryLegalMoves { ticket, .. } | Intent::SubmitMove { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    AwaitingLegalMoves { origin: Origin, ticket: Ticket },
    Selected { origin: Origin, destinations: Destinations },
    AwaitingMoveResult { from: Origin, to: Square, ticket: Ticket },
}

/// Selection plus the ticket counter that orders its answers
#[derive(Debug, Default)]
pub struct SelectionState {
    phase: SelectionPhase,
    issued: u64,
    /// Answers to tickets at or below this value are stale
    invalidated_through: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState::default()
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// The origin highlighted on the board, if any
    pub fn selected(&self) -> Option<Origin> {
        match self.phase {
            SelectionPhase::AwaitingLegalMoves { origin, .. }
            | SelectionPhase::Selected { origin, .. } => Some(origin),
            SelectionPhase::AwaitingMoveResult { from, .. } => Some(from),
            SelectionPhase::Idle => None,
        }
    }

    /// Current legal destinations; empty unless a piece is selected
    pub fn destinations(&self) -> Destinations {
        match self.phase {
            SelectionPhase::Selected { destinations, .. } => destinations,
            _ => Destinations::none(),
        }
    }

    pub fn is_destination(&self, square: Square) -> bool {
        self.destinations().contains(square)
    }

    /// A click on a board square.
    ///
    /// Landing on a current destination submits the move; anything else
    /// starts a new legal-moves query for the clicked square.
    pub fn click(&mut self, square: Square) -> Intent {
        if let SelectionPhase::Selected {
            origin,
            destinations,
        } = self.phase
        {
            if destinations.contains(square) {
                let ticket = self.issue();
                self.phase = SelectionPhase::AwaitingMoveResult {
                    from: origin,
                    to: square,
                    ticket,
                };
                tracing::debug!("[SELECTION] {} -> {} submitted", origin, square);
                return Intent::SubmitMove {
                    from: origin,
                    to: square,
                    ticket,
                };
            }
        }
        self.query(Origin::Board(square))
    }

    /// A click on a piece in hand; its destinations are the drop squares
    pub fn select_hand(&mut self, kind: PieceKind) -> Intent {
        self.query(Origin::Hand(kind))
    }

    fn query(&mut self, origin: Origin) -> Intent {
        let ticket = self.issue();
        self.phase = SelectionPhase::AwaitingLegalMoves { origin, ticket };
        tracing::debug!("[SELECTION] querying {} (ticket {})", origin, ticket.0);
        Intent::QueryLegalMoves { origin, ticket }
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued && ticket.0 > self.invalidated_through
    }

    /// Fold in a legal-moves answer.
    ///
    /// `None` stands for "nothing to move from here" (or a failed query) and
    /// selects the origin with no destinations. Returns `false` when the
    /// answer was stale and dropped.
    pub fn resolve_legal_moves(&mut self, ticket: Ticket, answer: Option<Destinations>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("[SELECTION] dropping stale answer for ticket {}", ticket.0);
            return false;
        }
        let SelectionPhase::AwaitingLegalMoves { origin, .. } = self.phase else {
            return false;
        };
        self.phase = SelectionPhase::Selected {
            origin,
            destinations: answer.unwrap_or_default(),
        };
        true
    }

    /// A submitted move finished, successfully or not
    pub fn resolve_move(&mut self) {
        tracing::debug!("[SELECTION] move finished, clearing selection");
        self.reset();
    }

    /// Back to `Idle`; every outstanding query is now stale
    pub fn reset(&mut self) {
        self.phase = SelectionPhase::Idle;
        self.invalidated_through = self.issued;
    }
}
