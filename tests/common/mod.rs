//! Shared test doubles
//!
//! `FakeRules` is a tiny in-memory rules collaborator: one-step moves only,
//! captures go to the pool, drops land on any empty square. Good enough to
//! drive the client through every remote operation.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{GameRecord, LegalMovesGrid, Operation};
use shogi_client::game::resources::Origin;
use shogi_client::game::{Board, ClientError, ClientResult, PieceCode, Side, Square};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
pub struct FakeRules {
    games: Mutex<HashMap<String, GameRecord>>,
    calls: Mutex<Vec<Operation>>,
    failures: Mutex<HashSet<Operation>>,
    fetch_delays: Mutex<HashMap<String, Duration>>,
    legal_delays: Mutex<HashMap<String, Duration>>,
    move_delay: Mutex<Option<Duration>>,
    create_delays: Mutex<Vec<Duration>>,
}

impl FakeRules {
    pub fn new() -> Self {
        FakeRules::default()
    }

    /// Store a record as-is, bypassing create_game
    pub fn insert(&self, record: GameRecord) {
        self.games.lock().insert(record.uid.clone(), record);
    }

    pub fn record(&self, uid: &str) -> Option<GameRecord> {
        self.games.lock().get(uid).cloned()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls.lock().iter().filter(|op| **op == operation).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// The next call to `operation` fails with a remote error
    pub fn fail_next(&self, operation: Operation) {
        self.failures.lock().insert(operation);
    }

    pub fn delay_fetch(&self, uid: &str, delay: Duration) {
        self.fetch_delays.lock().insert(uid.to_string(), delay);
    }

    pub fn delay_legal_moves(&self, origin: &str, delay: Duration) {
        self.legal_delays.lock().insert(origin.to_string(), delay);
    }

    /// Every make_move and ai_move answers after `delay`
    pub fn delay_moves(&self, delay: Duration) {
        *self.move_delay.lock() = Some(delay);
    }

    /// The next create_game answers after `delay`; queued in call order
    pub fn delay_next_create(&self, delay: Duration) {
        self.create_delays.lock().push(delay);
    }

    async fn move_pause(&self) {
        let delay = *self.move_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn enter(&self, operation: Operation) -> ClientResult<()> {
        self.calls.lock().push(operation);
        if self.failures.lock().remove(&operation) {
            return Err(ClientError::remote(operation, "injected failure"));
        }
        Ok(())
    }

    fn game(&self, uid: &str) -> ClientResult<GameRecord> {
        self.record(uid).ok_or_else(|| ClientError::NotFound {
            uid: uid.to_string(),
        })
    }
}

pub fn starting_record(uid: &str) -> GameRecord {
    GameRecord {
        uid: uid.to_string(),
        board: Board::starting().flatten(),
        pieces_in_hand: Vec::new(),
        moves: Vec::new(),
    }
}

pub fn sq(label: &str) -> Square {
    Square::parse(label).unwrap()
}

/// Upper-case moves first
fn side_to_move(record: &GameRecord) -> Side {
    if record.moves.len() % 2 == 0 {
        Side::Upper
    } else {
        Side::Lower
    }
}

fn piece_at(record: &GameRecord, square: Square) -> Option<PieceCode> {
    record.board[square.index()]
        .as_deref()
        .and_then(|code| PieceCode::parse(code).ok())
}

fn one_step(record: &GameRecord, from: Square) -> Option<Square> {
    let piece = piece_at(record, from)?;
    let row = match piece.side {
        Side::Upper => from.row().checked_sub(1)?,
        Side::Lower => from.row() + 1,
    };
    let to = Square::try_from_grid(row, from.col())?;
    match piece_at(record, to) {
        Some(other) if other.side == piece.side => None,
        _ => Some(to),
    }
}

fn destinations(record: &GameRecord, origin: Origin) -> Vec<Square> {
    match origin {
        Origin::Board(from) => one_step(record, from).into_iter().collect(),
        Origin::Hand(_) => Square::all()
            .filter(|square| record.board[square.index()].is_none())
            .collect(),
    }
}

fn hand_code(piece: PieceCode, side: Side) -> String {
    let letter = piece.kind.letter();
    match side {
        Side::Upper => letter.to_ascii_uppercase().to_string(),
        Side::Lower => letter.to_string(),
    }
}

#[async_trait]
impl shogi_client::networking::GameService for FakeRules {
    async fn create_game(&self) -> ClientResult<String> {
        self.enter(Operation::CreateGame)?;
        let delay = {
            let mut delays = self.create_delays.lock();
            (!delays.is_empty()).then(|| delays.remove(0))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let uid = uuid::Uuid::new_v4().to_string();
        self.insert(starting_record(&uid));
        Ok(uid)
    }

    async fn fetch_game(&self, uid: &str) -> ClientResult<Option<GameRecord>> {
        self.enter(Operation::ReadGame)?;
        let delay = self.fetch_delays.lock().get(uid).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.record(uid))
    }

    async fn read_legal_moves(&self, uid: &str, from_square: &str) -> ClientResult<LegalMovesGrid> {
        self.enter(Operation::ReadLegalMoves)?;
        let delay = self.legal_delays.lock().get(from_square).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let record = self.game(uid)?;
        let origin: Origin = from_square.parse()?;

        let mut grid = vec![vec![None; 9]; 9];
        for square in destinations(&record, origin) {
            grid[square.row()][square.col()] = Some(square.to_string());
        }
        Ok(grid)
    }

    async fn make_move(
        &self,
        uid: &str,
        from_square: &str,
        to_square: &str,
        promotion: bool,
    ) -> ClientResult<()> {
        self.enter(Operation::MakeMove)?;
        self.move_pause().await;
        let mut record = self.game(uid)?;
        let origin: Origin = from_square.parse()?;
        let to: Square = to_square.parse()?;
        if !destinations(&record, origin).contains(&to) {
            return Err(ClientError::remote(Operation::MakeMove, "illegal move"));
        }
        let mover = side_to_move(&record);

        let placed = match origin {
            Origin::Board(from) => {
                let mut piece = piece_at(&record, from)
                    .ok_or_else(|| ClientError::remote(Operation::MakeMove, "empty origin"))?;
                if let Some(captured) = piece_at(&record, to) {
                    record.pieces_in_hand.push(hand_code(captured, mover));
                }
                if promotion && piece.kind.can_promote() {
                    piece.promoted = true;
                }
                record.board[from.index()] = None;
                piece
            }
            Origin::Hand(kind) => {
                let code = hand_code(PieceCode::new(kind, mover), mover);
                let slot = record
                    .pieces_in_hand
                    .iter()
                    .position(|held| *held == code)
                    .ok_or_else(|| ClientError::remote(Operation::MakeMove, "piece not in hand"))?;
                record.pieces_in_hand.remove(slot);
                PieceCode::new(kind, mover)
            }
        };
        record.board[to.index()] = Some(placed.to_string());
        record
            .moves
            .push(serde_json::json!(format!("{from_square}{to_square}")));
        self.insert(record);
        Ok(())
    }

    async fn ai_move(&self, uid: &str) -> ClientResult<()> {
        self.enter(Operation::AiMove)?;
        self.move_pause().await;
        let mut record = self.game(uid)?;
        let mover = side_to_move(&record);
        let step = Square::all().find_map(|from| {
            let piece = piece_at(&record, from)?;
            if piece.side != mover {
                return None;
            }
            one_step(&record, from).map(|to| (from, piece, to))
        });
        let Some((from, piece, to)) = step else {
            return Err(ClientError::remote(Operation::AiMove, "no move available"));
        };
        if let Some(captured) = piece_at(&record, to) {
            record.pieces_in_hand.push(hand_code(captured, mover));
        }
        record.board[from.index()] = None;
        record.board[to.index()] = Some(piece.to_string());
        record.moves.push(serde_json::json!(format!("{from}{to}")));
        self.insert(record);
        Ok(())
    }
}
