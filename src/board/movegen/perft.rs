use super::super::make_unmake::MoveGuard;
use super::super::types::{Move, MoveList};
use super::super::Position;

impl Position {
    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &mv in &moves {
            let mut child = MoveGuard::new(self, mv);
            nodes += child.perft(depth - 1);
        }
        nodes
    }

    /// Per-root-move perft counts, in generation order.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves: MoveList = self.generate_legal_moves();
        let mut counts = Vec::with_capacity(moves.len());
        for &mv in &moves {
            let mut child = MoveGuard::new(self, mv);
            let nodes = if depth <= 1 { 1 } else { child.perft(depth - 1) };
            counts.push((mv, nodes));
        }
        counts
    }
}
