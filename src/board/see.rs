//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square, least valuable attacker first, and
//! reports the material outcome for the side making the first capture.

use super::attack_tables::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use super::types::{Bitboard, Color, Move, Piece, Square};
use super::Position;

/// Piece values for SEE; the king outweighs any exchange
const SEE_VALUES: [i32; 6] = [
    100,   // Pawn
    320,   // Knight
    330,   // Bishop
    500,   // Rook
    900,   // Queen
    20000, // King
];

const MAX_EXCHANGES: usize = 32;

impl Position {
    /// Net material of the exchange started by `mv`, from the mover's point of view.
    ///
    /// Positive = winning, negative = losing, 0 for quiet moves.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let Some(victim) = mv.captured() else {
            return 0;
        };
        let to = mv.to();

        let mut gain = [0i32; MAX_EXCHANGES];
        let mut depth = 0;
        gain[0] = SEE_VALUES[victim.index()];

        let mut occupancy = self.all_occupied;
        if mv.is_en_passant() {
            occupancy ^= Bitboard::from_square(Square::at(mv.from().rank(), to.file()));
        }
        let mut attackers = self.attackers_to(to, occupancy);

        let mut side = self.side_to_move;
        let mut piece_on_target = mv.promoted().unwrap_or(mv.piece());
        let mut from_bb = Bitboard::from_square(mv.from());

        loop {
            depth += 1;
            if depth >= MAX_EXCHANGES {
                break;
            }
            // speculative: what the side to recapture wins if it takes and is not retaken
            gain[depth] = SEE_VALUES[piece_on_target.index()] - gain[depth - 1];

            occupancy ^= from_bb;
            attackers &= !from_bb;
            attackers |= self.xray_attackers(to, occupancy, piece_on_target) & occupancy;

            side = side.opponent();
            match self.least_valuable_attacker(attackers, side) {
                Some((piece, bb)) => {
                    piece_on_target = piece;
                    from_bb = bb;
                }
                None => break,
            }
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
        }
        gain[0]
    }

    /// Every piece of either color attacking `sq` through `occupancy`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let mut attackers = Bitboard::EMPTY;

        // a white pawn attacks sq from the squares a black pawn on sq would attack
        attackers |= pawn_attacks(Color::Black, sq) & self.pieces(Color::White, Piece::Pawn);
        attackers |= pawn_attacks(Color::White, sq) & self.pieces(Color::Black, Piece::Pawn);
        attackers |= knight_attacks(sq) & self.both(Piece::Knight);
        attackers |= king_attacks(sq) & self.both(Piece::King);
        attackers |= bishop_attacks(sq, occupancy) & self.diagonal_sliders();
        attackers |= rook_attacks(sq, occupancy) & self.straight_sliders();

        attackers & occupancy
    }

    /// Sliders behind a piece that just left the square's lines
    fn xray_attackers(&self, sq: Square, occupancy: Bitboard, moved: Piece) -> Bitboard {
        let mut revealed = Bitboard::EMPTY;
        if matches!(moved, Piece::Pawn | Piece::Bishop | Piece::Queen) {
            revealed |= bishop_attacks(sq, occupancy) & self.diagonal_sliders();
        }
        if matches!(moved, Piece::Rook | Piece::Queen) {
            revealed |= rook_attacks(sq, occupancy) & self.straight_sliders();
        }
        revealed
    }

    fn least_valuable_attacker(&self, attackers: Bitboard, side: Color) -> Option<(Piece, Bitboard)> {
        Piece::ALL.into_iter().find_map(|piece| {
            (attackers & self.pieces(side, piece))
                .lsb()
                .map(|sq| (piece, Bitboard::from_square(sq)))
        })
    }

    #[inline]
    fn both(&self, piece: Piece) -> Bitboard {
        self.pieces(Color::White, piece) | self.pieces(Color::Black, piece)
    }

    #[inline]
    fn diagonal_sliders(&self) -> Bitboard {
        self.both(Piece::Bishop) | self.both(Piece::Queen)
    }

    #[inline]
    fn straight_sliders(&self) -> Bitboard {
        self.both(Piece::Rook) | self.both(Piece::Queen)
    }
}
