//! Castling rights and castling geometry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Which wing a castling move goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit_for(color, side) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit_for(color, side);
    }

    /// Clear every right whose bit is in `mask`
    #[inline]
    pub(crate) fn clear_mask(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    /// Get the raw bitmask value (for Zobrist hashing)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & ALL_CASTLING_RIGHTS)
    }

    /// Rights with colors swapped (white kingside <-> black kingside, ...)
    #[must_use]
    pub const fn swap_colors(self) -> Self {
        CastlingRights(((self.0 & 0b0011) << 2) | ((self.0 & 0b1100) >> 2))
    }

    #[inline]
    pub(crate) const fn bit_for(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => CASTLE_WHITE_K,
            (Color::White, CastleSide::Queen) => CASTLE_WHITE_Q,
            (Color::Black, CastleSide::King) => CASTLE_BLACK_K,
            (Color::Black, CastleSide::Queen) => CASTLE_BLACK_Q,
        }
    }
}

/// Squares involved in one castling move.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CastlingPath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between king and rook; must be empty
    pub between: Bitboard,
    /// Square the king passes over; must not be attacked
    pub transit: Square,
    /// King from/to bits, XORed in one step
    pub king_mask: Bitboard,
    /// Rook from/to bits, XORed in one step
    pub rook_mask: Bitboard,
}

const fn path(
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    rook_to: Square,
    between: u64,
    transit: Square,
) -> CastlingPath {
    CastlingPath {
        king_from,
        king_to,
        rook_from,
        rook_to,
        between: Bitboard(between),
        transit,
        king_mask: Bitboard((1u64 << king_from.0) | (1u64 << king_to.0)),
        rook_mask: Bitboard((1u64 << rook_from.0) | (1u64 << rook_to.0)),
    }
}

const WHITE_KINGSIDE: CastlingPath =
    path(Square::E1, Square::G1, Square::H1, Square::F1, 0x60, Square::F1);
const WHITE_QUEENSIDE: CastlingPath =
    path(Square::E1, Square::C1, Square::A1, Square::D1, 0x0E, Square::D1);
const BLACK_KINGSIDE: CastlingPath = path(
    Square::E8,
    Square::G8,
    Square::H8,
    Square::F8,
    0x6000_0000_0000_0000,
    Square::F8,
);
const BLACK_QUEENSIDE: CastlingPath = path(
    Square::E8,
    Square::C8,
    Square::A8,
    Square::D8,
    0x0E00_0000_0000_0000,
    Square::D8,
);

#[inline]
pub(crate) const fn castling_path(color: Color, side: CastleSide) -> &'static CastlingPath {
    match (color, side) {
        (Color::White, CastleSide::King) => &WHITE_KINGSIDE,
        (Color::White, CastleSide::Queen) => &WHITE_QUEENSIDE,
        (Color::Black, CastleSide::King) => &BLACK_KINGSIDE,
        (Color::Black, CastleSide::Queen) => &BLACK_QUEENSIDE,
    }
}

/// Rights lost when a piece moves from or to each square.
pub(crate) const CASTLING_SPOILERS: [u8; 64] = {
    let mut table = [0u8; 64];
    table[Square::A1.0 as usize] = CASTLE_WHITE_Q;
    table[Square::H1.0 as usize] = CASTLE_WHITE_K;
    table[Square::E1.0 as usize] = CASTLE_WHITE_K | CASTLE_WHITE_Q;
    table[Square::A8.0 as usize] = CASTLE_BLACK_Q;
    table[Square::H8.0 as usize] = CASTLE_BLACK_K;
    table[Square::E8.0 as usize] = CASTLE_BLACK_K | CASTLE_BLACK_Q;
    table
};
