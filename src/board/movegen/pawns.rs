use super::super::attack_tables::pawn_attacks;
use super::super::types::{Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};
use super::super::Position;

/// One square towards the opponent, or `None` off the board
#[inline]
fn forward(color: Color, sq: Square) -> Option<Square> {
    match color {
        Color::White => (sq.0 < 56).then(|| Square(sq.0 + 8)),
        Color::Black => (sq.0 >= 8).then(|| Square(sq.0 - 8)),
    }
}

#[inline]
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, captured: Option<Piece>, promo_rank: u8) {
    if to.rank() == promo_rank {
        for promoted in PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, captured, promoted));
        }
    } else {
        moves.push(Move::normal(from, to, Piece::Pawn, captured));
    }
}

impl Position {
    /// Pawn pushes, captures, en passant and promotions. With `captures_only`, pushes
    /// (including quiet promotions) are skipped.
    pub(crate) fn generate_pawn_moves(&self, moves: &mut MoveList, captures_only: bool) {
        let color = self.side_to_move;
        let enemy = self.occupancy(color.opponent());
        let start_rank = match color {
            Color::White => 1,
            Color::Black => 6,
        };
        let promo_rank = color.promotion_rank();
        let ep_square = self.en_passant_square();

        for from in self.pieces(color, Piece::Pawn) {
            if !captures_only {
                if let Some(one) = forward(color, from).filter(|&sq| self.is_empty(sq)) {
                    push_pawn_move(moves, from, one, None, promo_rank);
                    if from.rank() == start_rank {
                        if let Some(two) = forward(color, one).filter(|&sq| self.is_empty(sq)) {
                            moves.push(Move::double_pawn_push(from, two));
                        }
                    }
                }
            }

            let attacks = pawn_attacks(color, from);
            for to in attacks & enemy {
                let captured = self.piece_of(color.opponent(), to);
                push_pawn_move(moves, from, to, captured, promo_rank);
            }

            if let Some(ep) = ep_square {
                if attacks.contains(ep) && self.is_empty(ep) {
                    moves.push(Move::en_passant(from, ep));
                }
            }
        }
    }
}
