use super::super::attack_tables::{magic_bishop_attacks, magic_queen_attacks, magic_rook_attacks};
use super::super::types::{Bitboard, MoveList, Piece, Square};
use super::super::Position;

impl Position {
    /// Rook, bishop and queen moves, in that order
    pub(crate) fn generate_slider_moves(&self, moves: &mut MoveList, captures_only: bool) {
        let color = self.side_to_move;
        let own = self.occupancy(color);
        let enemy = self.occupancy(color.opponent());
        let mask = self.target_mask(captures_only);

        let lookups: [(Piece, fn(Square, Bitboard, Bitboard) -> Bitboard); 3] = [
            (Piece::Rook, magic_rook_attacks),
            (Piece::Bishop, magic_bishop_attacks),
            (Piece::Queen, magic_queen_attacks),
        ];
        for (piece, attacks) in lookups {
            for from in self.pieces(color, piece) {
                self.push_piece_moves(moves, from, piece, attacks(from, own, enemy) & mask);
            }
        }
    }
}
