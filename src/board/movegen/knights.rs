use super::super::attack_tables::knight_attacks;
use super::super::types::{MoveList, Piece};
use super::super::Position;

impl Position {
    pub(crate) fn generate_knight_moves(&self, moves: &mut MoveList, captures_only: bool) {
        let color = self.side_to_move;
        let mask = self.target_mask(captures_only);
        for from in self.pieces(color, Piece::Knight) {
            self.push_piece_moves(moves, from, Piece::Knight, knight_attacks(from) & mask);
        }
    }
}
