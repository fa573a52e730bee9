//! Pseudo-legal move generation.
//!
//! Moves are emitted in a fixed order (pawns, knights, king, rooks, bishops, queens,
//! castling) so that perft counts and search results are reproducible. Whether a move
//! leaves the mover's king in check is decided later by the legality filter.

mod kings;
mod knights;
mod pawns;
mod perft;
mod sliders;

use super::types::{Bitboard, Move, MoveList, Piece, Square};
use super::Position;

impl Position {
    /// Fill `moves` with every pseudo-legal move for the side to move.
    pub fn generate_pseudo_moves(&self, moves: &mut MoveList) {
        moves.clear();
        self.generate_pawn_moves(moves, false);
        self.generate_knight_moves(moves, false);
        self.generate_king_moves(moves, false);
        self.generate_slider_moves(moves, false);
        self.generate_castling_moves(moves);
    }

    /// Pseudo-legal captures only (including en passant and capturing promotions).
    pub fn generate_captures(&self, moves: &mut MoveList) {
        moves.clear();
        self.generate_pawn_moves(moves, true);
        self.generate_knight_moves(moves, true);
        self.generate_king_moves(moves, true);
        self.generate_slider_moves(moves, true);
    }

    #[must_use]
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pseudo_moves(&mut moves);
        moves
    }

    /// Squares a non-pawn piece may land on: not own pieces, and only enemy pieces for
    /// capture generation
    #[inline]
    fn target_mask(&self, captures_only: bool) -> Bitboard {
        let color = self.side_to_move;
        if captures_only {
            self.occupancy(color.opponent())
        } else {
            !self.occupancy(color)
        }
    }

    /// One move per target bit; the captured piece is resolved from the enemy boards.
    #[inline]
    fn push_piece_moves(&self, moves: &mut MoveList, from: Square, piece: Piece, targets: Bitboard) {
        let enemy = self.side_to_move.opponent();
        for to in targets {
            moves.push(Move::normal(from, to, piece, self.piece_of(enemy, to)));
        }
    }
}
