//! Board model built from collaborator payloads
//!
//! The collaborator delivers the board as a flat, row-major sequence of 81
//! optional piece codes and legal destinations as a 9x9 grid of optional
//! markers. Both are reshaped here into fixed-size grids addressed by
//! [`Square`]. Nothing in this module is updated incrementally: every new
//! payload produces a new value.

use crate::game::error::{ClientError, ClientResult};
use crate::game::types::{PieceCode, PieceKind, Side, Square};
use shared::{LegalMovesGrid, BOARD_SIDE, BOARD_SQUARES};
use std::fmt;

/// 9x9 grid of optional pieces, row 0 = rank `a`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<PieceCode>; BOARD_SIDE]; BOARD_SIDE],
}

impl Board {
    pub fn empty() -> Self {
        Board::default()
    }

    /// Partition a flat payload into 9 rows of 9, preserving order
    pub fn reshape(flat: &[Option<String>]) -> ClientResult<Self> {
        if flat.len() != BOARD_SQUARES {
            return Err(ClientError::malformed(format!(
                "expected {BOARD_SQUARES} squares, got {}",
                flat.len()
            )));
        }

        let mut board = Board::empty();
        for (square, entry) in Square::all().zip(flat) {
            let piece = entry
                .as_deref()
                .map(PieceCode::parse)
                .transpose()
                .map_err(|err| ClientError::malformed(format!("square {square}: {err}")))?;
            board.set(square, piece);
        }
        Ok(board)
    }

    /// Inverse of [`Board::reshape`]
    pub fn flatten(&self) -> Vec<Option<String>> {
        Square::all()
            .map(|square| self.at(square).map(|piece| piece.to_string()))
            .collect()
    }

    /// Standard opening layout, lower-case side on top
    pub fn starting() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; BOARD_SIDE] =
            [Lance, Knight, Silver, Gold, King, Gold, Silver, Knight, Lance];

        let mut board = Board::empty();
        for col in 0..BOARD_SIDE {
            board.cells[0][col] = Some(PieceCode::new(BACK_RANK[col], Side::Lower));
            board.cells[2][col] = Some(PieceCode::new(Pawn, Side::Lower));
            board.cells[6][col] = Some(PieceCode::new(Pawn, Side::Upper));
            board.cells[8][col] = Some(PieceCode::new(BACK_RANK[col], Side::Upper));
        }
        board.cells[1][1] = Some(PieceCode::new(Rook, Side::Lower));
        board.cells[1][7] = Some(PieceCode::new(Bishop, Side::Lower));
        board.cells[7][1] = Some(PieceCode::new(Bishop, Side::Upper));
        board.cells[7][7] = Some(PieceCode::new(Rook, Side::Upper));
        board
    }

    pub fn at(&self, square: Square) -> Option<PieceCode> {
        self.cells[square.row()][square.col()]
    }

    pub fn set(&mut self, square: Square, piece: Option<PieceCode>) {
        self.cells[square.row()][square.col()] = piece;
    }

    pub fn rows(&self) -> &[[Option<PieceCode>; BOARD_SIDE]; BOARD_SIDE] {
        &self.cells
    }

    /// Occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, PieceCode)> + '_ {
        Square::all().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |piece| piece.to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Legal-destinations mask, one bit per square, all-false by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destinations {
    cells: [[bool; BOARD_SIDE]; BOARD_SIDE],
}

impl Destinations {
    pub fn none() -> Self {
        Destinations::default()
    }

    /// A cell is a destination iff the collaborator sent a non-null entry
    pub fn from_wire(grid: &LegalMovesGrid) -> ClientResult<Self> {
        if grid.len() != BOARD_SIDE || grid.iter().any(|row| row.len() != BOARD_SIDE) {
            return Err(ClientError::malformed(format!(
                "legal-moves grid must be {BOARD_SIDE}x{BOARD_SIDE}"
            )));
        }

        let mut destinations = Destinations::none();
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                destinations.cells[row][col] = cell.is_some();
            }
        }
        Ok(destinations)
    }

    pub fn from_squares(squares: impl IntoIterator<Item = Square>) -> Self {
        let mut destinations = Destinations::none();
        for square in squares {
            destinations.cells[square.row()][square.col()] = true;
        }
        destinations
    }

    pub fn contains(&self, square: Square) -> bool {
        self.cells[square.row()][square.col()]
    }

    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(|square| self.contains(*square))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn rows(&self) -> &[[bool; BOARD_SIDE]; BOARD_SIDE] {
        &self.cells
    }
}
