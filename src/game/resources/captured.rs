//! Pieces-in-hand pool and its per-side views
//!
//! The collaborator sends one flat pool of captured piece codes for both
//! players. Each side's view is derived from that pool on demand by letter
//! case alone; the views are never stored, so they cannot drift from the
//! pool they come from.
//!
//! # Example
//!
//! ```rust
//! use shogi_client::game::resources::PiecesInHand;
//! use shogi_client::game::types::Side;
//!
//! let hand = PiecesInHand::from_wire(&["P".to_string(), "p".to_string(), "+R".to_string()]).unwrap();
//! let upper: Vec<String> = hand.captured_for(Side::Upper).iter().map(|p| p.to_string()).collect();
//! assert_eq!(upper, ["P", "+R"]);
//! ```
//!
//! Promotion markers are kept as delivered. The rules of the game demote a
//! captured piece, so a `+` in the pool points at the collaborator, not at
//! this code.

use crate::game::error::ClientResult;
use crate::game::types::{PieceCode, PieceKind, Side};

/// Authoritative pool of captured pieces, in collaborator order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PiecesInHand {
    pool: Vec<PieceCode>,
}

impl PiecesInHand {
    pub fn new(pool: Vec<PieceCode>) -> Self {
        PiecesInHand { pool }
    }

    /// Parse the wire pool; an unknown code is an error
    pub fn from_wire(codes: &[String]) -> ClientResult<Self> {
        let pool = codes
            .iter()
            .map(|code| PieceCode::parse(code))
            .collect::<ClientResult<Vec<_>>>()?;
        Ok(PiecesInHand { pool })
    }

    pub fn to_wire(&self) -> Vec<String> {
        self.pool.iter().map(|piece| piece.to_string()).collect()
    }

    pub fn pool(&self) -> &[PieceCode] {
        &self.pool
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Pieces held by `side`
    pub fn captured_for(&self, side: Side) -> Vec<PieceCode> {
        captured_for(&self.pool, side)
    }

    /// Side view grouped by kind, in order of first appearance
    pub fn counts_for(&self, side: Side) -> Vec<(PieceKind, usize)> {
        let mut counts: Vec<(PieceKind, usize)> = Vec::new();
        for piece in self.captured_for(side) {
            match counts.iter_mut().find(|(kind, _)| *kind == piece.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((piece.kind, 1)),
            }
        }
        counts
    }
}

/// Filter `pool` down to the entries whose letter case matches `side`.
///
/// Order is preserved and duplicates are kept; the promotion marker plays no
/// part in the match.
pub fn captured_for(pool: &[PieceCode], side: Side) -> Vec<PieceCode> {
    pool.iter()
        .copied()
        .filter(|piece| piece.side == side)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(codes: &[&str]) -> PiecesInHand {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        PiecesInHand::from_wire(&codes).unwrap()
    }

    fn codes(pieces: &[PieceCode]) -> Vec<String> {
        pieces.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_empty_pool() {
        //! Verifies that a fresh pool has no pieces for either side
        let hand = PiecesInHand::default();
        assert!(hand.is_empty());
        assert!(hand.captured_for(Side::Lower).is_empty());
        assert!(hand.captured_for(Side::Upper).is_empty());
    }

    #[test]
    fn test_case_only_filtering() {
        //! `+R` is upper case, so it belongs to the upper side even though
        //! it carries a promotion marker
        let hand = hand(&["P", "p", "+R"]);
        assert_eq!(codes(&hand.captured_for(Side::Upper)), ["P", "+R"]);
        assert_eq!(codes(&hand.captured_for(Side::Lower)), ["p"]);
    }

    #[test]
    fn test_views_partition_the_pool() {
        //! Every element appears in exactly one view, order kept per view
        let hand = hand(&["p", "B", "p", "+s", "G", "P", "p"]);
        let lower = hand.captured_for(Side::Lower);
        let upper = hand.captured_for(Side::Upper);
        assert_eq!(lower.len() + upper.len(), hand.pool().len());
        assert_eq!(codes(&lower), ["p", "p", "+s", "p"]);
        assert_eq!(codes(&upper), ["B", "G", "P"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let hand = hand(&["p", "p", "p"]);
        assert_eq!(hand.captured_for(Side::Lower).len(), 3);
    }

    #[test]
    fn test_counts_for_groups_by_kind() {
        let hand = hand(&["p", "s", "p", "P", "p"]);
        assert_eq!(
            hand.counts_for(Side::Lower),
            vec![(PieceKind::Pawn, 3), (PieceKind::Silver, 1)]
        );
        assert_eq!(hand.counts_for(Side::Upper), vec![(PieceKind::Pawn, 1)]);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let codes = vec!["p".to_string(), "z".to_string()];
        assert!(PiecesInHand::from_wire(&codes).is_err());
    }

    #[test]
    fn test_wire_round_trip_keeps_promotion_marker() {
        let hand = hand(&["+p", "R"]);
        assert_eq!(hand.to_wire(), ["+p", "R"]);
    }
}
