use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of squares delivered in a flat board payload.
pub const BOARD_SQUARES: usize = 81;

/// Side length of the board and of the legal-moves grid.
pub const BOARD_SIDE: usize = 9;

/// Suffix that turns a piece letter into a hand (drop) origin, `P*` style.
pub const HAND_SENTINEL_SUFFIX: char = '*';

/// Remote operations exposed by the rules collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateGame,
    ReadGame,
    ReadLegalMoves,
    MakeMove,
    AiMove,
}

impl Operation {
    /// Callable function name, used as the last path segment of the endpoint.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateGame => "create_game",
            Operation::ReadGame => "read_game",
            Operation::ReadLegalMoves => "read_legal_moves",
            Operation::MakeMove => "make_move",
            Operation::AiMove => "ai_move",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request envelope: every callable wraps its payload in `data`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallRequest<T> {
    pub data: T,
}

/// Response envelope: successful callables answer with `result`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallResponse<T> {
    pub result: T,
}

/// Error envelope returned instead of [`CallResponse`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallError {
    pub error: ErrorBody,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    /// Canonical status code, e.g. `NOT_FOUND` or `INVALID_ARGUMENT`
    pub status: String,
    pub message: String,
}

impl ErrorBody {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";

    pub fn is_not_found(&self) -> bool {
        self.status == Self::NOT_FOUND
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct CreateGameRequest {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReadGameRequest {
    pub uid: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LegalMovesRequest {
    /// Square label (`7g`) or hand sentinel (`P*`)
    pub from_square: String,
    pub uid: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MakeMoveRequest {
    pub from_square: String,
    pub to_square: String,
    pub uid: String,
    #[serde(default)]
    pub promotion: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AiMoveRequest {
    pub uid: String,
}

/// Game document as stored by the collaborator.
///
/// `board` is row-major, rank `a` first, 81 entries. `moves` is carried
/// through untouched; the client only cares whether it is empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameRecord {
    pub uid: String,
    pub board: Vec<Option<String>>,
    #[serde(default)]
    pub pieces_in_hand: Vec<String>,
    #[serde(default)]
    pub moves: Vec<serde_json::Value>,
}

/// 9x9 answer to a legal-moves query; a cell is a destination iff it is `Some`
pub type LegalMovesGrid = Vec<Vec<Option<String>>>;

/// Builds the drop origin for a piece letter: `p` -> `P*`
pub fn hand_sentinel(letter: char) -> String {
    let mut sentinel = String::with_capacity(2);
    sentinel.push(letter.to_ascii_uppercase());
    sentinel.push(HAND_SENTINEL_SUFFIX);
    sentinel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_match_callables() {
        assert_eq!(Operation::CreateGame.name(), "create_game");
        assert_eq!(Operation::ReadGame.name(), "read_game");
        assert_eq!(Operation::ReadLegalMoves.name(), "read_legal_moves");
        assert_eq!(Operation::MakeMove.name(), "make_move");
        assert_eq!(Operation::AiMove.name(), "ai_move");
    }

    #[test]
    fn test_make_move_request_wire_shape() {
        let request = CallRequest {
            data: MakeMoveRequest {
                from_square: "7g".to_string(),
                to_square: "7f".to_string(),
                uid: "abc".to_string(),
                promotion: false,
            },
        };
        let json = serde_json::to_value(&request).expect("Should serialize");
        assert_eq!(json["data"]["from_square"], "7g");
        assert_eq!(json["data"]["to_square"], "7f");
        assert_eq!(json["data"]["uid"], "abc");
        assert_eq!(json["data"]["promotion"], false);
    }

    #[test]
    fn test_game_record_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "uid": "g1",
            "board": vec![serde_json::Value::Null; BOARD_SQUARES],
        });
        let record: GameRecord = serde_json::from_value(json).expect("Should deserialize");
        assert_eq!(record.uid, "g1");
        assert_eq!(record.board.len(), BOARD_SQUARES);
        assert!(record.pieces_in_hand.is_empty());
        assert!(record.moves.is_empty());
    }

    #[test]
    fn test_error_envelope_not_found() {
        let json = r#"{"error": {"status": "NOT_FOUND", "message": "Invalid game id"}}"#;
        let error: CallError = serde_json::from_str(json).expect("Should deserialize");
        assert!(error.error.is_not_found());
        assert_eq!(error.error.message, "Invalid game id");
    }

    #[test]
    fn test_hand_sentinel_is_uppercase_drop_prefix() {
        assert_eq!(hand_sentinel('p'), "P*");
        assert_eq!(hand_sentinel('R'), "R*");
    }
}
