//! Attack tables for move generation.
//!
//! Leaper attacks (knight, king, pawns) are plain 64-entry lookups. Slider
//! attacks (bishop, rook, queen) go through magic bitboards. Everything is
//! built lazily on first use and immutable afterwards; [`init`] forces the
//! build up front.

mod magic;
mod tables;

#[cfg(test)]
pub(crate) use magic::{slow_bishop_attacks, slow_rook_attacks};
pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use magic::{BISHOP_TABLE, ROOK_TABLE};

use super::types::{Bitboard, Color, Piece, Square};

/// Build every table now instead of on first lookup.
pub fn init() {
    once_cell::sync::Lazy::force(&KNIGHT_ATTACKS);
    once_cell::sync::Lazy::force(&KING_ATTACKS);
    once_cell::sync::Lazy::force(&PAWN_ATTACKS);
    once_cell::sync::Lazy::force(&BISHOP_TABLE);
    once_cell::sync::Lazy::force(&ROOK_TABLE);
}

/// Get bishop attacks (diagonals only) for a combined occupancy
#[inline]
#[must_use]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    Bitboard(BISHOP_TABLE.attack(square.index(), occupancy.0))
}

/// Get rook attacks (ranks and files only) for a combined occupancy
#[inline]
#[must_use]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    Bitboard(ROOK_TABLE.attack(square.index(), occupancy.0))
}

/// Get queen attacks (all 8 directions)
#[inline]
#[must_use]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

/// Rook targets: attacked squares minus those holding own pieces.
#[inline]
#[must_use]
pub fn magic_rook_attacks(square: Square, own: Bitboard, enemy: Bitboard) -> Bitboard {
    rook_attacks(square, own | enemy) & !own
}

/// Bishop targets: attacked squares minus those holding own pieces.
#[inline]
#[must_use]
pub fn magic_bishop_attacks(square: Square, own: Bitboard, enemy: Bitboard) -> Bitboard {
    bishop_attacks(square, own | enemy) & !own
}

#[inline]
#[must_use]
pub fn magic_queen_attacks(square: Square, own: Bitboard, enemy: Bitboard) -> Bitboard {
    magic_rook_attacks(square, own, enemy) | magic_bishop_attacks(square, own, enemy)
}

#[inline]
#[must_use]
pub fn knight_attacks(square: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[square.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(square: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[square.index()])
}

/// Squares a pawn of `color` on `square` captures on
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][square.index()])
}

/// Attacks of one piece standing on `square`, ignoring piece colors on the board
#[inline]
#[must_use]
pub fn piece_attacks(piece: Piece, color: Color, square: Square, occupancy: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(color, square),
        Piece::Knight => knight_attacks(square),
        Piece::Bishop => bishop_attacks(square, occupancy),
        Piece::Rook => rook_attacks(square, occupancy),
        Piece::Queen => queen_attacks(square, occupancy),
        Piece::King => king_attacks(square),
    }
}
