//! Type definitions for squares and piece codes
//!
//! Provides newtype patterns for the board coordinate system and the piece
//! codes exchanged with the rules collaborator.
//!
//! # Coordinates
//!
//! A [`Square`] is addressed internally by `(row, col)` with row 0 at the top
//! (rank `a`) and col 0 at the left. Its label counts files right-to-left, so
//! the top-left cell is `9a` and the bottom-right cell is `1i`.

use crate::game::error::{ClientError, ClientResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared::BOARD_SIDE;
use std::fmt;
use std::str::FromStr;

const SIDE: u8 = BOARD_SIDE as u8;

/// One of the 81 board positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Encode a grid cell.
    ///
    /// Both coordinates must be in `0..9`; anything else is a caller bug.
    ///
    /// ```
    /// use shogi_client::game::types::Square;
    ///
    /// assert_eq!(Square::from_grid(0, 0).to_string(), "9a");
    /// assert_eq!(Square::from_grid(6, 2).to_string(), "7g");
    /// ```
    pub fn from_grid(row: usize, col: usize) -> Self {
        assert!(
            row < BOARD_SIDE && col < BOARD_SIDE,
            "grid cell ({row}, {col}) is off the board"
        );
        Square {
            row: row as u8,
            col: col as u8,
        }
    }

    /// Checked variant of [`Square::from_grid`]
    pub fn try_from_grid(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIDE && col < BOARD_SIDE).then(|| Square::from_grid(row, col))
    }

    /// Decode a label such as `7g`
    pub fn parse(label: &str) -> ClientResult<Self> {
        let invalid = || ClientError::InvalidSquare {
            label: label.to_string(),
        };
        match label.as_bytes() {
            [file @ b'1'..=b'9', rank @ b'a'..=b'i'] => Ok(Square {
                row: rank - b'a',
                col: SIDE - (file - b'0'),
            }),
            _ => Err(invalid()),
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row and column pair
    pub fn grid(self) -> (usize, usize) {
        (self.row(), self.col())
    }

    /// File number, 1..=9 counted from the right edge
    pub fn file(self) -> u8 {
        SIDE - self.col
    }

    /// Rank letter, `a` at the top
    pub fn rank(self) -> char {
        (b'a' + self.row) as char
    }

    /// Row-major index into a flat 81-element board
    pub fn index(self) -> usize {
        self.row() * BOARD_SIDE + self.col()
    }

    /// All squares in row-major order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIDE).flat_map(|row| (0..BOARD_SIDE).map(move |col| Square::from_grid(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Square::parse(&label).map_err(serde::de::Error::custom)
    }
}

/// Which player owns a piece, told apart by letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Lower-case codes, drawn as the black side
    Lower,
    /// Upper-case codes, drawn as the white side
    Upper,
}

impl Side {
    pub fn of_letter(letter: char) -> Self {
        if letter.is_ascii_uppercase() {
            Side::Upper
        } else {
            Side::Lower
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Lower => "Black",
            Side::Upper => "White",
        }
    }
}

/// The eight base piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    King,
    Rook,
    Bishop,
}

impl PieceKind {
    /// Lower-case code letter
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Lance => 'l',
            PieceKind::Knight => 'n',
            PieceKind::Silver => 's',
            PieceKind::Gold => 'g',
            PieceKind::King => 'k',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
        }
    }

    /// Case-insensitive lookup
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'l' => Some(PieceKind::Lance),
            'n' => Some(PieceKind::Knight),
            's' => Some(PieceKind::Silver),
            'g' => Some(PieceKind::Gold),
            'k' => Some(PieceKind::King),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            _ => None,
        }
    }

    /// King and gold never promote
    pub fn can_promote(self) -> bool {
        !matches!(self, PieceKind::King | PieceKind::Gold)
    }
}

/// A piece as the collaborator encodes it: `p`, `R`, `+b`...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCode {
    pub kind: PieceKind,
    pub side: Side,
    pub promoted: bool,
}

impl PieceCode {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        PieceCode {
            kind,
            side,
            promoted: false,
        }
    }

    pub fn promoted(kind: PieceKind, side: Side) -> Self {
        PieceCode {
            kind,
            side,
            promoted: true,
        }
    }

    /// Parse a wire code.
    ///
    /// A promoted king or gold is accepted; the collaborator never sends one
    /// and the client does not second-guess it.
    pub fn parse(code: &str) -> ClientResult<Self> {
        let invalid = || ClientError::InvalidPiece {
            code: code.to_string(),
        };
        let (promoted, rest) = match code.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, code),
        };
        let mut chars = rest.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let kind = PieceKind::from_letter(letter).ok_or_else(invalid)?;
        Ok(PieceCode {
            kind,
            side: Side::of_letter(letter),
            promoted,
        })
    }

    /// Code letter with the case of the owning side
    pub fn letter(self) -> char {
        match self.side {
            Side::Lower => self.kind.letter(),
            Side::Upper => self.kind.letter().to_ascii_uppercase(),
        }
    }

    /// Kanji glyph used when drawing the board
    pub fn symbol(self) -> &'static str {
        match (self.kind, self.promoted) {
            (PieceKind::Pawn, false) => "歩",
            (PieceKind::Lance, false) => "香",
            (PieceKind::Knight, false) => "桂",
            (PieceKind::Silver, false) => "銀",
            (PieceKind::Gold, _) => "金",
            (PieceKind::King, _) => match self.side {
                Side::Lower => "王",
                Side::Upper => "玉",
            },
            (PieceKind::Rook, false) => "飛",
            (PieceKind::Bishop, false) => "角",
            (PieceKind::Pawn, true) => "と",
            (PieceKind::Lance, true) => "杏",
            (PieceKind::Knight, true) => "圭",
            (PieceKind::Silver, true) => "全",
            (PieceKind::Rook, true) => "龍",
            (PieceKind::Bishop, true) => "馬",
        }
    }
}

impl fmt::Display for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.promoted {
            f.write_str("+")?;
        }
        write!(f, "{}", self.letter())
    }
}

impl FromStr for PieceCode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceCode::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_square_round_trip_over_whole_board() {
        //! Every grid cell survives encode then decode, and no two cells
        //! share a label
        let mut labels = HashSet::new();
        for row in 0..9 {
            for col in 0..9 {
                let square = Square::from_grid(row, col);
                let label = square.to_string();
                assert_eq!(Square::parse(&label).unwrap().grid(), (row, col));
                assert!(labels.insert(label), "duplicate label at ({row}, {col})");
            }
        }
        assert_eq!(labels.len(), 81);
    }

    #[test]
    fn test_square_known_labels() {
        assert_eq!(Square::from_grid(0, 0).to_string(), "9a");
        assert_eq!(Square::from_grid(6, 2).to_string(), "7g");
        assert_eq!(Square::from_grid(8, 8).to_string(), "1i");
        assert_eq!(Square::parse("5e").unwrap().grid(), (4, 4));
    }

    #[test]
    fn test_square_rejects_bad_labels() {
        for label in ["", "0a", "9j", "a9", "10a", "5E", "5", "5ee"] {
            assert_eq!(
                Square::parse(label),
                Err(ClientError::InvalidSquare {
                    label: label.to_string()
                }),
                "{label:?} should not parse"
            );
        }
    }

    #[test]
    fn test_square_index_is_row_major() {
        let indices: Vec<usize> = Square::all().map(Square::index).collect();
        assert_eq!(indices, (0..81).collect::<Vec<_>>());
    }

    #[test]
    fn test_try_from_grid_bounds() {
        assert!(Square::try_from_grid(8, 8).is_some());
        assert!(Square::try_from_grid(9, 0).is_none());
        assert!(Square::try_from_grid(0, 9).is_none());
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_from_grid_out_of_range_panics() {
        let _ = Square::from_grid(9, 0);
    }

    #[test]
    fn test_square_serde_uses_label() {
        let json = serde_json::to_string(&Square::from_grid(6, 2)).unwrap();
        assert_eq!(json, "\"7g\"");
        assert!(serde_json::from_str::<Square>("\"0z\"").is_err());
    }

    #[test]
    fn test_piece_code_parsing() {
        let pawn = PieceCode::parse("p").unwrap();
        assert_eq!(pawn, PieceCode::new(PieceKind::Pawn, Side::Lower));

        let dragon = PieceCode::parse("+R").unwrap();
        assert_eq!(dragon, PieceCode::promoted(PieceKind::Rook, Side::Upper));
        assert_eq!(dragon.to_string(), "+R");

        for bad in ["", "+", "x", "pp", "++p", "P+"] {
            assert!(PieceCode::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_piece_code_case_is_side_only() {
        //! Promotion marker and case are independent
        assert_eq!(PieceCode::parse("+p").unwrap().side, Side::Lower);
        assert_eq!(PieceCode::parse("+P").unwrap().side, Side::Upper);
    }

    #[test]
    fn test_promoted_king_is_not_rejected() {
        let code = PieceCode::parse("+k").unwrap();
        assert!(code.promoted);
        assert!(!code.kind.can_promote());
        assert_eq!(code.symbol(), "王");
    }

    #[test]
    fn test_piece_symbols() {
        assert_eq!(PieceCode::parse("p").unwrap().symbol(), "歩");
        assert_eq!(PieceCode::parse("+P").unwrap().symbol(), "と");
        assert_eq!(PieceCode::parse("K").unwrap().symbol(), "玉");
        assert_eq!(PieceCode::parse("+b").unwrap().symbol(), "馬");
    }
}
