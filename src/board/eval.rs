//! Static evaluation.
//!
//! The score is built from material, the tapered piece-square sums kept by make/unmake,
//! the castling bonus, and three terms that grow with the endgame factor: king-zone
//! attacks (shrinking), king centralisation and passed or advanced pawns.

use once_cell::sync::Lazy;

use super::attack_tables::king_attacks;
use super::types::{Bitboard, Color, Piece, Square};
use super::Position;

/// Plies over which the opening piece-square table fades into the endgame table
pub(crate) const TAPER_PLIES: i32 = 40;

/// Non-pawn material of both sides at the start of the game
const START_NPM: i32 = 2 * (2 * 320 + 2 * 330 + 2 * 500 + 900);

/// Endgame factor scale: 0 with all pieces on, `EG_SCALE` with bare kings and pawns
const EG_SCALE: i32 = 256;

const KING_ZONE_ATTACK_PENALTY: i32 = 12;
const KING_CENTER_WEIGHT: i32 = 10;

/// Indexed by the pawn's rank from its own side (0 = first rank)
const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 15, 25, 45, 75, 120, 0];
const ADVANCED_PAWN_BONUS: [i32; 8] = [0, 0, 0, 5, 10, 20, 35, 0];

/// Squares in front of a pawn on its own and adjacent files, `[color][square]`
static PASSED_PAWN_MASKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut masks = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64u8 {
        let square = Square(sq);
        let file = square.file();
        let mut files = Bitboard::file_mask(file);
        if file > 0 {
            files |= Bitboard::file_mask(file - 1);
        }
        if file < 7 {
            files |= Bitboard::file_mask(file + 1);
        }
        let mut ahead_white = Bitboard::EMPTY;
        for rank in square.rank() + 1..8 {
            ahead_white |= Bitboard::rank_mask(rank);
        }
        let mut ahead_black = Bitboard::EMPTY;
        for rank in 0..square.rank() {
            ahead_black |= Bitboard::rank_mask(rank);
        }
        masks[Color::White.index()][sq as usize] = files & ahead_white;
        masks[Color::Black.index()][sq as usize] = files & ahead_black;
    }
    masks
});

#[inline]
fn relative_rank(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.rank() as usize,
        Color::Black => 7 - sq.rank() as usize,
    }
}

/// Manhattan distance to the nearest of d4, e4, d5, e5 (0..=6)
#[inline]
fn center_distance(sq: Square) -> i32 {
    let file = i32::from(sq.file());
    let rank = i32::from(sq.rank());
    let file_dist = (3 - file).max(file - 4);
    let rank_dist = (3 - rank).max(rank - 4);
    file_dist + rank_dist
}

impl Position {
    /// Static score from the side to move's point of view.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        self.side_to_move.sign() * self.evaluate_white()
    }

    /// Static score from White's point of view.
    #[must_use]
    pub fn evaluate_white(&self) -> i32 {
        let eg = self.endgame_factor();
        let mut score = self.material_balance();
        score += self.tapered_pst();
        score += self.castle_bonus;
        for color in Color::BOTH {
            let sign = color.sign();
            score -= sign * self.king_zone_penalty(color) * (EG_SCALE - eg) / EG_SCALE;
            score += sign * self.king_centralisation(color) * eg / EG_SCALE;
            score += sign * self.pawn_advancement(color) * eg / EG_SCALE;
        }
        score
    }

    fn material_balance(&self) -> i32 {
        Piece::ALL
            .iter()
            .map(|&piece| {
                let white = self.pieces(Color::White, piece).popcount() as i32;
                let black = self.pieces(Color::Black, piece).popcount() as i32;
                (white - black) * piece.value()
            })
            .sum()
    }

    /// Piece-square sums blended from the opening table to the endgame table by ply count
    fn tapered_pst(&self) -> i32 {
        let moves = i32::try_from(self.move_count).unwrap_or(i32::MAX);
        let opening_weight = (TAPER_PLIES - moves).max(0);
        (self.pst_opening * opening_weight + self.pst_endgame * (TAPER_PLIES - opening_weight))
            / TAPER_PLIES
    }

    /// 0 at full non-pawn material, `EG_SCALE` when none is left
    pub(crate) fn endgame_factor(&self) -> i32 {
        let npm: i32 = Color::BOTH
            .iter()
            .flat_map(|&color| {
                [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
                    .map(|piece| self.pieces(color, piece).popcount() as i32 * piece.value())
            })
            .sum();
        (START_NPM - npm.min(START_NPM)) * EG_SCALE / START_NPM
    }

    fn king_zone_penalty(&self, color: Color) -> i32 {
        let Some(king) = self.king_square(color) else {
            return 0;
        };
        let zone = king_attacks(king) | Bitboard::from_square(king);
        let attacked = zone & self.attacked_squares(color.opponent());
        attacked.popcount() as i32 * KING_ZONE_ATTACK_PENALTY
    }

    fn king_centralisation(&self, color: Color) -> i32 {
        self.king_square(color)
            .map_or(0, |king| (6 - center_distance(king)) * KING_CENTER_WEIGHT)
    }

    fn pawn_advancement(&self, color: Color) -> i32 {
        let enemy_pawns = self.pieces(color.opponent(), Piece::Pawn);
        self.pieces(color, Piece::Pawn)
            .iter()
            .map(|sq| {
                let rank = relative_rank(color, sq);
                if (PASSED_PAWN_MASKS[color.index()][sq.index()] & enemy_pawns).is_empty() {
                    PASSED_PAWN_BONUS[rank]
                } else {
                    ADVANCED_PAWN_BONUS[rank]
                }
            })
            .sum()
    }
}
