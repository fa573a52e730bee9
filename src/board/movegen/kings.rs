use super::super::attack_tables::king_attacks;
use super::super::types::{castling_path, CastleSide, Move, MoveList, Piece};
use super::super::Position;

impl Position {
    pub(crate) fn generate_king_moves(&self, moves: &mut MoveList, captures_only: bool) {
        let color = self.side_to_move;
        let mask = self.target_mask(captures_only);
        for from in self.pieces(color, Piece::King) {
            self.push_piece_moves(moves, from, Piece::King, king_attacks(from) & mask);
        }
    }

    /// Castling candidates: rights bit, king and rook on their home squares and an empty
    /// path between them. Attacked squares are left to the legality filter.
    pub(crate) fn generate_castling_moves(&self, moves: &mut MoveList) {
        let color = self.side_to_move;
        for side in [CastleSide::King, CastleSide::Queen] {
            if !self.castling_rights.has(color, side) {
                continue;
            }
            let path = castling_path(color, side);
            if self.pieces(color, Piece::King).contains(path.king_from)
                && self.pieces(color, Piece::Rook).contains(path.rook_from)
                && (path.between & self.all_occupied).is_empty()
            {
                moves.push(Move::castle(color, side));
            }
        }
    }
}
