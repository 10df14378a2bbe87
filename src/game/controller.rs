//! Click-to-RPC glue
//!
//! [`GameController`] is what a front end talks to. It owns the selection
//! state machine and the remote session and runs the data flow:
//!
//! 1. a click becomes an [`Intent`]
//! 2. the session performs the matching remote call with the gate held
//! 3. the answer is folded back into the selection, and after a move the
//!    game is re-fetched and the selection reset
//!
//! Methods take `&self` so a front end can have several calls in flight at
//! once; the selection lock is never held across an `.await`.

use crate::game::board::{Board, Destinations};
use crate::game::error::{ClientError, ClientResult};
use crate::game::resources::selection::{Intent, Origin, SelectionState};
use crate::game::session::{GameSession, SessionId};
use crate::game::types::{PieceKind, Side, Square};
use crate::networking::client::RemoteGameSession;
use crate::networking::service::GameService;
use parking_lot::Mutex;
use shared::Operation;

/// What a click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// `origin` is selected with these destinations
    Selected {
        origin: Origin,
        destinations: Destinations,
    },
    /// The answer arrived after a newer click and was dropped
    Superseded,
    /// A move was submitted and the game re-fetched
    Moved { from: Origin, to: Square },
}

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub session: Option<SessionId>,
    pub board: Board,
    /// Pieces in hand per side, grouped by kind
    pub lower_hand: Vec<(PieceKind, usize)>,
    pub upper_hand: Vec<(PieceKind, usize)>,
    pub selected: Option<Origin>,
    pub destinations: Destinations,
    pub busy: bool,
    pub move_count: usize,
}

pub struct GameController<S> {
    session: RemoteGameSession<S>,
    selection: Mutex<SelectionState>,
    auto_promote: bool,
}

impl<S: GameService> GameController<S> {
    pub fn new(session: RemoteGameSession<S>) -> Self {
        GameController {
            session,
            selection: Mutex::new(SelectionState::new()),
            auto_promote: false,
        }
    }

    /// Request promotion on every move; the collaborator ignores it where
    /// promotion is impossible
    pub fn with_auto_promote(mut self, auto_promote: bool) -> Self {
        self.auto_promote = auto_promote;
        self
    }

    pub fn session(&self) -> &RemoteGameSession<S> {
        &self.session
    }

    pub async fn new_game(&self) -> ClientResult<SessionId> {
        let result = self.session.create_game().await;
        self.selection.lock().reset();
        result
    }

    pub async fn resume(&self) -> ClientResult<Option<GameSession>> {
        let result = self.session.resume().await;
        self.selection.lock().reset();
        result
    }

    /// Click on a board square
    pub async fn click(&self, square: Square) -> ClientResult<ClickOutcome> {
        let intent = self.selection.lock().click(square);
        self.dispatch(intent).await
    }

    /// Click on a piece in hand
    pub async fn select_hand(&self, kind: PieceKind) -> ClientResult<ClickOutcome> {
        let intent = self.selection.lock().select_hand(kind);
        self.dispatch(intent).await
    }

    /// Let the engine move. Refused while another call is in flight.
    pub async fn use_ai(&self) -> ClientResult<()> {
        if self.session.is_busy() {
            return Err(ClientError::Busy {
                operation: Operation::AiMove,
            });
        }
        let result = self.session.request_ai_move().await;
        self.selection.lock().reset();
        result
    }

    async fn dispatch(&self, intent: Intent) -> ClientResult<ClickOutcome> {
        match intent {
            Intent::QueryLegalMoves { origin, ticket } => {
                let answer = self.session.query_legal_moves(origin).await;
                let applied = self
                    .selection
                    .lock()
                    .resolve_legal_moves(ticket, answer.as_ref().ok().copied());
                let destinations = answer?;
                Ok(if applied {
                    ClickOutcome::Selected {
                        origin,
                        destinations,
                    }
                } else {
                    ClickOutcome::Superseded
                })
            }
            Intent::SubmitMove { from, to, .. } => {
                let result = self.session.submit_move(from, to, self.auto_promote).await;
                self.selection.lock().resolve_move();
                result.map(|()| ClickOutcome::Moved { from, to })
            }
        }
    }

    /// Snapshot for rendering
    pub fn view(&self) -> BoardView {
        let current = self.session.current();
        let selection = self.selection.lock();
        BoardView {
            session: self.session.active_id(),
            board: current.as_ref().map(|game| game.board).unwrap_or_default(),
            lower_hand: current
                .as_ref()
                .map(|game| game.hand.counts_for(Side::Lower))
                .unwrap_or_default(),
            upper_hand: current
                .as_ref()
                .map(|game| game.hand.counts_for(Side::Upper))
                .unwrap_or_default(),
            selected: selection.selected(),
            destinations: selection.destinations(),
            busy: self.session.is_busy(),
            move_count: current.as_ref().map_or(0, GameSession::move_count),
        }
    }
}
