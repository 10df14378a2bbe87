//! Local copy of one in-progress game
//!
//! A [`GameSession`] is always built whole from a collaborator record and is
//! never patched in place; a state change means fetching a new record and
//! replacing the old value.

use crate::game::board::Board;
use crate::game::error::{ClientError, ClientResult};
use crate::game::resources::captured::PiecesInHand;
use crate::game::types::{PieceCode, Side};
use serde::{Deserialize, Serialize};
use shared::GameRecord;
use std::fmt;

/// Opaque handle naming one game on the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        SessionId(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: SessionId,
    pub board: Board,
    pub hand: PiecesInHand,
    /// Move history as delivered; only its length is interpreted
    pub moves: Vec<serde_json::Value>,
}

impl GameSession {
    /// Reshape a collaborator record into a session
    pub fn from_record(record: GameRecord) -> ClientResult<Self> {
        let board = Board::reshape(&record.board)?;
        let hand = PiecesInHand::from_wire(&record.pieces_in_hand)
            .map_err(|err| ClientError::malformed(format!("pieces in hand: {err}")))?;
        Ok(GameSession {
            id: SessionId(record.uid),
            board,
            hand,
            moves: record.moves,
        })
    }

    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            uid: self.id.0.clone(),
            board: self.board.flatten(),
            pieces_in_hand: self.hand.to_wire(),
            moves: self.moves.clone(),
        }
    }

    pub fn has_moves(&self) -> bool {
        !self.moves.is_empty()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn captured_for(&self, side: Side) -> Vec<PieceCode> {
        self.hand.captured_for(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameRecord {
        GameRecord {
            uid: "game-1".to_string(),
            board: Board::starting().flatten(),
            pieces_in_hand: vec!["p".to_string(), "B".to_string()],
            moves: vec![],
        }
    }

    #[test]
    fn test_from_record_builds_full_session() {
        let session = GameSession::from_record(record()).unwrap();
        assert_eq!(session.id.as_str(), "game-1");
        assert_eq!(session.board, Board::starting());
        assert_eq!(session.captured_for(Side::Lower).len(), 1);
        assert_eq!(session.captured_for(Side::Upper).len(), 1);
        assert!(!session.has_moves());
    }

    #[test]
    fn test_from_record_rejects_short_board() {
        let mut record = record();
        record.board.truncate(80);
        assert!(matches!(
            GameSession::from_record(record),
            Err(ClientError::MalformedBoard { .. })
        ));
    }

    #[test]
    fn test_from_record_rejects_unknown_hand_code() {
        let mut record = record();
        record.pieces_in_hand.push("x".to_string());
        let err = GameSession::from_record(record).unwrap_err();
        assert!(matches!(err, ClientError::MalformedBoard { .. }), "got {err:?}");
    }

    #[test]
    fn test_record_round_trip() {
        let mut record = record();
        record.moves.push(serde_json::json!({"from_square": "7g", "to_square": "7f"}));
        let session = GameSession::from_record(record.clone()).unwrap();
        assert_eq!(session.move_count(), 1);
        assert_eq!(session.to_record(), record);
    }

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        let id = SessionId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
