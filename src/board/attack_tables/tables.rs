//! Precomputed attack tables for leaper pieces (knights, kings, pawns).
//!
//! Built with bit shifts from each square's single-bit board; file masks stop
//! moves from wrapping around the a/h edges.

use once_cell::sync::Lazy;

const NOT_A: u64 = !0x0101_0101_0101_0101;
const NOT_AB: u64 = !0x0303_0303_0303_0303;
const NOT_H: u64 = !0x8080_8080_8080_8080;
const NOT_GH: u64 = !0xC0C0_C0C0_C0C0_C0C0;

const fn knight_mask(b: u64) -> u64 {
    ((b << 17) & NOT_A)
        | ((b << 15) & NOT_H)
        | ((b << 10) & NOT_AB)
        | ((b << 6) & NOT_GH)
        | ((b >> 17) & NOT_H)
        | ((b >> 15) & NOT_A)
        | ((b >> 10) & NOT_GH)
        | ((b >> 6) & NOT_AB)
}

const fn king_mask(b: u64) -> u64 {
    let sides = ((b << 1) & NOT_A) | ((b >> 1) & NOT_H);
    let row = b | sides;
    sides | (row << 8) | (row >> 8)
}

const fn white_pawn_mask(b: u64) -> u64 {
    ((b << 7) & NOT_H) | ((b << 9) & NOT_A)
}

const fn black_pawn_mask(b: u64) -> u64 {
    ((b >> 9) & NOT_H) | ((b >> 7) & NOT_A)
}

fn build(f: fn(u64) -> u64) -> [u64; 64] {
    let mut table = [0u64; 64];
    for (sq, slot) in table.iter_mut().enumerate() {
        *slot = f(1u64 << sq);
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| build(knight_mask));

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| build(king_mask));

/// Pawn capture targets indexed by `[color][square]`
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> =
    Lazy::new(|| [build(white_pawn_mask), build(black_pawn_mask)]);
