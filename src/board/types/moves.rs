//! Move types and move lists.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::{castling_path, CastleSide};
use super::piece::{Color, Piece};
use super::square::Square;

/// How a move changes the board beyond moving one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    /// Ordinary move or capture, including promotions
    Normal,
    DoublePawnPush,
    Castle(CastleSide),
    EnPassant,
}

/// A fully described move.
///
/// Carries the moving piece and the captured piece so make/unmake never has to look
/// them up on the board. `captured` is `Some` exactly when the move is a capture,
/// `promotion` exactly when a pawn reaches the back rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: Option<Piece>,
    kind: MoveKind,
}

impl Move {
    /// Filler value for uninitialised list slots; never generated
    pub(crate) const PLACEHOLDER: Move = Move {
        from: Square::A1,
        to: Square::A1,
        piece: Piece::Pawn,
        captured: None,
        promotion: None,
        kind: MoveKind::Normal,
    };

    /// Ordinary move or capture
    #[inline]
    #[must_use]
    pub const fn normal(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            captured: None,
            promotion: None,
            kind: MoveKind::DoublePawnPush,
        }
    }

    /// En passant capture; `to` is the empty target square
    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            captured: Some(Piece::Pawn),
            promotion: None,
            kind: MoveKind::EnPassant,
        }
    }

    /// Castling, encoded as the king's move
    #[inline]
    #[must_use]
    pub const fn castle(color: Color, side: CastleSide) -> Self {
        let path = castling_path(color, side);
        Move {
            from: path.king_from,
            to: path.king_to,
            piece: Piece::King,
            captured: None,
            promotion: None,
            kind: MoveKind::Castle(side),
        }
    }

    #[inline]
    #[must_use]
    pub const fn promotion(
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promoted: Piece,
    ) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            captured,
            promotion: Some(promoted),
            kind: MoveKind::Normal,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The piece that moves (the pawn, for promotions)
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    #[must_use]
    pub const fn promoted(self) -> Option<Piece> {
        self.promotion
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.kind, MoveKind::DoublePawnPush)
    }

    #[inline]
    #[must_use]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    /// Capture or promotion
    #[inline]
    #[must_use]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Compact from/to/promotion form stored in transposition table slots
    #[inline]
    #[must_use]
    pub const fn packed(self) -> PackedMove {
        let promo: u16 = match self.promotion {
            None => 0,
            Some(Piece::Knight) => 1,
            Some(Piece::Bishop) => 2,
            Some(Piece::Rook) => 3,
            Some(_) => 4,
        };
        PackedMove(self.from.0 as u16 | ((self.to.0 as u16) << 6) | (promo << 12))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{} {:?}", self.from, self.to, self.piece)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if let Some(captured) = self.captured {
            write!(f, " x{captured:?}")?;
        }
        match self.kind {
            MoveKind::Castle(side) => write!(f, " castle {side:?}")?,
            MoveKind::EnPassant => write!(f, " ep")?,
            MoveKind::DoublePawnPush => write!(f, " dpp")?,
            MoveKind::Normal => {}
        }
        write!(f, ")")
    }
}

/// Coordinate notation (`e2e4`, `e7e8q`, `e1g1`)
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// 16-bit move identity: from (6 bits), to (6 bits), promotion (3 bits).
///
/// Not a playable move on its own; it is matched against generated moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PackedMove(pub u16);

impl PackedMove {
    pub const NONE: PackedMove = PackedMove(0);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub fn matches(self, mv: Move) -> bool {
        !self.is_none() && mv.packed() == self
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::PLACEHOLDER; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        if idx < self.len {
            Some(self.moves[idx])
        } else {
            None
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Keep only the moves for which `keep` returns true, preserving order
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves to avoid heap allocation.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::PLACEHOLDER,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    /// Partial sort: find the best move from index `start` onwards and swap it to position `start`.
    /// Incremental selection sort, so moves after a cutoff are never sorted.
    #[inline]
    pub fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }

        let mut best_idx = start;
        let mut best_score = self.moves[start].score;
        for i in (start + 1)..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }

        if best_idx != start {
            self.moves.swap(start, best_idx);
        }

        Some(self.moves[start])
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}
