//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for the transposition table
//! and repetition detection.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{CastlingRights, Color, Piece, Square};

const ZOBRIST_SEED: u64 = 1_234_567_890;

pub(crate) struct ZobristKeys {
    // piece_keys[color][piece][square]
    pub(crate) piece_keys: [[[u64; 64]; 6]; 2],
    pub(crate) black_to_move_key: u64,
    // one key per castling bit: white-k, white-q, black-k, black-q
    pub(crate) castling_keys: [u64; 4],
    // only the file matters for the en passant target
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[[0; 64]; 6]; 2];
        let mut castling_keys = [0; 4];
        let mut en_passant_keys = [0; 8];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    /// XOR of the keys of every right set in `rights`
    #[inline]
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.as_u8();
        let mut key = 0;
        for (i, k) in self.castling_keys.iter().enumerate() {
            if bits & (1 << i) != 0 {
                key ^= k;
            }
        }
        key
    }

    #[inline]
    pub(crate) fn en_passant(&self, file: Option<u8>) -> u64 {
        file.map_or(0, |f| self.en_passant_keys[f as usize])
    }
}

// Initialize Zobrist keys lazily and globally
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in 0..64u8 {
                    assert!(seen.insert(ZOBRIST.piece(color, piece, Square(sq))));
                }
            }
        }
        assert!(seen.insert(ZOBRIST.black_to_move_key));
        for key in ZOBRIST.castling_keys.iter().chain(ZOBRIST.en_passant_keys.iter()) {
            assert!(seen.insert(*key));
        }
    }

    #[test]
    fn test_castling_key_is_xor_of_bits() {
        let all = ZOBRIST.castling(CastlingRights::all());
        let expected = ZOBRIST.castling_keys.iter().fold(0, |acc, k| acc ^ k);
        assert_eq!(all, expected);
        assert_eq!(ZOBRIST.castling(CastlingRights::none()), 0);
        assert_eq!(ZOBRIST.en_passant(None), 0);
    }
}
