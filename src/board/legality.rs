//! Check detection and the legality filter.
//!
//! Check tests read the incrementally maintained attack sets, so testing a move costs one
//! make/unmake pair and a few bitboard ORs.

use super::make_unmake::MoveGuard;
use super::types::{castling_path, Bitboard, Color, Move, MoveList, Piece, Square};
use super::Position;

impl Position {
    /// Union of every square attacked by `by`.
    #[inline]
    #[must_use]
    pub fn attacked_squares(&self, by: Color) -> Bitboard {
        self.attacks[by.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    #[inline]
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attacked_squares(by).contains(sq)
    }

    #[inline]
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        (self.attacked_squares(color.opponent()) & self.pieces(color, Piece::King)).any()
    }

    /// Whether a pseudo-legal move keeps the mover's king safe.
    ///
    /// Castling additionally needs the king out of check and the square it passes over
    /// unattacked. The position is unchanged afterwards.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let mover = self.side_to_move;
        if let Some(side) = mv.castle_side() {
            let path = castling_path(mover, side);
            let enemy_attacks = self.attacked_squares(mover.opponent());
            if enemy_attacks.contains(path.king_from) || enemy_attacks.contains(path.transit) {
                return false;
            }
        }
        let after = MoveGuard::new(self, mv);
        !after.is_in_check(mover)
    }

    /// Fill `moves` with the legal moves for the side to move.
    pub fn legal_moves_into(&mut self, moves: &mut MoveList) {
        self.generate_pseudo_moves(moves);
        moves.retain(|mv| self.is_legal(mv));
    }

    #[must_use]
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let mut moves = MoveList::new();
        self.legal_moves_into(&mut moves);
        moves
    }

    /// Legal captures only, for quiescence.
    pub fn legal_captures_into(&mut self, moves: &mut MoveList) {
        self.generate_captures(moves);
        moves.retain(|mv| self.is_legal(mv));
    }

    /// Whether `mv` puts the opponent in check.
    pub fn gives_check(&mut self, mv: Move) -> bool {
        let mover = self.side_to_move;
        let after = MoveGuard::new(self, mv);
        after.is_in_check(mover.opponent())
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check(self.side_to_move) && self.generate_legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check(self.side_to_move) && self.generate_legal_moves().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Color, Position, Square};

    #[test]
    fn test_pinned_piece_cannot_move() {
        // e2 knight is pinned by the e8 rook
        let mut pos = Position::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = pos.generate_legal_moves();
        assert!(moves.iter().all(|m| m.from() != "e2".parse::<Square>().unwrap()));
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        // f8 rook covers f1
        let mut pos = Position::from_fen("5r1k/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<_> = pos
            .generate_legal_moves()
            .iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to())
            .collect();
        assert_eq!(castles, vec![Square::C1]);
    }

    #[test]
    fn test_castling_out_of_check_is_illegal() {
        let mut pos = Position::from_fen("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(pos.is_in_check(Color::White));
        assert!(pos.generate_legal_moves().iter().all(|m| !m.is_castling()));
    }

    #[test]
    fn test_queenside_castling_allowed_with_b1_attacked() {
        // b1 is attacked but the king never crosses it
        let mut pos = Position::from_fen("1r5k/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(pos.generate_legal_moves().iter().any(|m| m.is_castling()));
    }

    #[test]
    fn test_legality_check_leaves_position_unchanged() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = pos.clone();
        for mv in pos.pseudo_legal_moves().iter().copied() {
            let _ = pos.is_legal(mv);
            assert_eq!(pos, before);
        }
    }

    #[test]
    fn test_checkmate_and_stalemate_detection() {
        let mut mate = Position::from_fen("6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(mate.is_checkmate());
        let mut stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.is_stalemate());
    }
}
